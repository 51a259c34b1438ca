use super::{config, descriptors, tensors};
use proptest::prelude::*;
use tensorspec::config::{GeneratorConfig, NamePatterns};
use tensorspec::descriptor::DescriptorStore;
use tensorspec::entry::TensorDef;
use tensorspec::expr::Expr;
use tensorspec::generator::{InclusionSet, KernelRegistry};
use tensorspec::label::Labels;
use tensorspec::layout::{LayoutKind, MemoryLayout};
use tensorspec::shape::Shape;
use tensorspec::system::{configure, EquationSystem};
use tensorspec::Error;
use tensorspec_elastic::ElasticAderDg;

#[test]
fn base_database_contents() {
    let system = ElasticAderDg::new(&config("base_layout.xml"), &descriptors()).unwrap();
    let db = system.database();

    let names: Vec<_> = db.names().collect();
    assert_eq!(
        names,
        vec!["kDivM(0)", "kDivM(1)", "kDivM(2)", "star(0)", "star(1)", "star(2)"]
    );
    for star in db.clones("star").unwrap() {
        assert_eq!(star.layout().unwrap().kind, LayoutKind::Csc);
    }
    assert!(db.tensor("kDivM(0)").unwrap().layout().is_some());
    assert!(db.tensor("kDivM(1)").unwrap().layout().is_none());

    assert_eq!(system.q().shape(), &Shape::from([4, 9]));
    assert_eq!(system.i().shape(), &Shape::from([4, 9]));
}

#[test]
fn base_registers_only_the_volume_kernel() {
    let system = ElasticAderDg::new(&config("base_layout.xml"), &descriptors()).unwrap();
    let mut registry = KernelRegistry::new();
    let tensors = configure(&system, &mut registry).unwrap();

    assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["volume"]);
    assert!(tensors.is_empty());

    let volume = registry.get("volume").unwrap();
    assert_eq!(volume.result_shape(), &Shape::from([4, 9]));
    assert_eq!(volume.contracted_labels().to_string(), "lq");
    assert!(volume
        .to_string()
        .starts_with("Q[kp] <= kDivM(0)[kl] * I[lq] * star(0)[qp] + kDivM(1)[kl]"));
    match volume.rhs() {
        Expr::Sum(terms) => assert_eq!(terms.len(), 3),
        other => panic!("expected a sum over directions, got {}", other),
    }
}

#[test]
fn base_layout_must_not_refer_to_anisotropic_entries() {
    let err = ElasticAderDg::new(&config("anisotropic_layout.xml"), &descriptors()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::UnknownTensorReference {
            name: "samplingDirections".to_string(),
            context: "memory layout"
        })
    );
}

#[test]
fn missing_descriptor_is_reported() {
    // Order 3 needs matrices_10.xml, which is not available
    let config = GeneratorConfig::new(3, "matrices", "base_layout.xml");
    let err = ElasticAderDg::new(&config, &descriptors()).unwrap_err();
    assert!(format!("{:?}", err).contains("matrices_10.xml"));

    let invalid = GeneratorConfig::new(0, "matrices", "base_layout.xml");
    assert!(ElasticAderDg::new(&invalid, &descriptors()).is_err());
}

#[test]
fn multiple_simulations_add_the_simulation_axis() {
    let mut config = config("base_layout.xml");
    config.multiple_simulations = 2;
    let system = ElasticAderDg::new(&config, &descriptors()).unwrap();
    assert_eq!(system.q().shape(), &Shape::from([2, 4, 9]));

    let volume = system.volume_equation().unwrap();
    assert_eq!(volume.lhs().labels().to_string(), "skp");
    assert_eq!(volume.result_shape(), &Shape::from([2, 4, 9]));
    assert!(volume.contracted_labels().same_set(&Labels::parse("lq").unwrap()));
}

#[test]
fn transposed_matrices_are_indexed_with_reversed_labels() {
    let mut config = config("base_layout.xml");
    config.transpose = NamePatterns::new(["kDivM*"]);
    let system = ElasticAderDg::new(&config, &descriptors()).unwrap();
    assert!(system.database().tensor("kDivM(2)").unwrap().hints().transpose);

    let volume = system.volume_equation().unwrap();
    let k_div_m_labels: Vec<_> = volume
        .rhs()
        .leaves()
        .into_iter()
        .filter(|leaf| leaf.tensor().name().starts_with("kDivM"))
        .map(|leaf| leaf.labels().to_string())
        .collect();
    assert_eq!(k_div_m_labels, vec!["lk", "lk", "lk"]);
    assert_eq!(volume.contracted_labels().to_string(), "lq");
}

#[test]
fn base_includes_no_tensors() {
    let system = ElasticAderDg::new(&config("base_layout.xml"), &descriptors()).unwrap();
    let mut tensors = InclusionSet::new();
    system.add_include_tensors(&mut tensors).unwrap();
    assert!(tensors.is_empty());
}

proptest! {
    #[test]
    fn volume_kernel_shape_follows_the_configuration(order in 1usize..6, simulations in 1usize..5) {
        let mut config = GeneratorConfig::new(order, "m", "layout.xml");
        config.multiple_simulations = simulations;
        let nb = config.number_of_basis_functions();
        let descriptors = DescriptorStore::new()
            .with_matrices(
                format!("m/matrices_{}.xml", nb),
                tensors((0..3).map(|d| TensorDef::new(format!("kDivM({})", d), [nb, nb]))),
            )
            .with_matrices("m/star.xml", tensors([TensorDef::new("star", [9, 9])]))
            .with_layout("layout.xml", MemoryLayout::new());

        let system = ElasticAderDg::new(&config, &descriptors).unwrap();
        let volume = system.volume_equation().unwrap();
        let expected = if simulations > 1 {
            Shape::from([simulations, nb, 9])
        } else {
            Shape::from([nb, 9])
        };
        prop_assert_eq!(volume.result_shape(), &expected);
        prop_assert_eq!(volume.lhs().labels().len(), expected.rank());
    }
}
