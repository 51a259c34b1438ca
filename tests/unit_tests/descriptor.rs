use super::{reference_entries, star_entries};
use std::path::Path;
use tensorspec::config::NamePatterns;
use tensorspec::descriptor::{DescriptorSource, DescriptorStore};
use tensorspec::entry::{EntrySet, HintRules, TensorDef};
use tensorspec::layout::{LayoutSpec, MemoryLayout};
use tensorspec::shape::Shape;

fn store() -> DescriptorStore {
    DescriptorStore::new()
        .with_matrices("matrices/matrices_4.xml", reference_entries())
        .with_matrices("matrices/star.xml", star_entries())
        .with_layout("layout.xml", MemoryLayout::new().with_entry("star", LayoutSpec::csc()))
}

#[test]
fn known_descriptors_are_served() {
    let store = store();
    let star = store
        .matrix_file(Path::new("matrices/star.xml"), &HintRules::none())
        .unwrap();
    assert_eq!(star, star_entries());

    let layout = store.memory_layout(Path::new("layout.xml")).unwrap();
    assert_eq!(layout.len(), 1);
    assert!(layout.get("star").is_some());
}

#[test]
fn unknown_paths_are_errors() {
    let store = store();
    let err = store
        .matrix_file(Path::new("matrices/matrices_10.xml"), &HintRules::none())
        .unwrap_err();
    assert!(err.to_string().contains("matrices_10.xml"));
    assert!(store
        .json_matrix_file(Path::new("matrices/sampling_directions.json"), &HintRules::none())
        .is_err());
    assert!(store.memory_layout(Path::new("other.xml")).is_err());
}

#[test]
fn hint_rules_are_applied_on_load() {
    let store = DescriptorStore::new().with_matrices(
        "matrices.xml",
        EntrySet::from_entries([TensorDef::new("fMrT(0)", [4, 9]).into()]).unwrap(),
    );
    let rules = HintRules {
        transpose: NamePatterns::new(["fMrT*"]),
        align_stride: NamePatterns::new(["fMrT(0)"]),
    };
    let entries = store.matrix_file(Path::new("matrices.xml"), &rules).unwrap();
    let tensor = entries.get("fMrT(0)").unwrap().as_tensor().unwrap();
    assert_eq!(tensor.shape(), &Shape::from([9, 4]));
    assert!(tensor.hints().transpose);
    assert!(tensor.hints().align_stride);

    // The stored descriptor itself is not modified
    let plain = store
        .matrix_file(Path::new("matrices.xml"), &HintRules::none())
        .unwrap();
    assert_eq!(plain.get("fMrT(0)").unwrap().shape(), Shape::from([4, 9]));
}
