use tensorspec::layout::{LayoutKind, LayoutSpec, MemoryLayout};
use tensorspec::shape::Shape;

#[test]
fn csc_requires_a_matrix() {
    assert!(LayoutSpec::csc().check_against(&Shape::from([9, 9])).is_ok());
    assert!(LayoutSpec::csc().check_against(&Shape::from([9])).is_err());
    assert!(LayoutSpec::csc().check_against(&Shape::from([3, 3, 3])).is_err());
}

#[test]
fn bounding_box_must_fit_the_shape() {
    let shape = Shape::from([4, 9]);
    let fits = LayoutSpec::dense().with_bounding_box(vec![0..4, 2..7]);
    assert!(fits.check_against(&shape).is_ok());

    let too_long = LayoutSpec::dense().with_bounding_box(vec![0..4, 0..10]);
    assert!(too_long.check_against(&shape).is_err());

    let wrong_rank = LayoutSpec::dense().with_bounding_box(vec![0..4]);
    assert!(wrong_rank.check_against(&shape).is_err());

    #[allow(clippy::reversed_empty_ranges)]
    let reversed = LayoutSpec::dense().with_bounding_box(vec![3..1, 0..9]);
    assert!(reversed.check_against(&shape).is_err());
}

#[test]
fn trivial_specs() {
    assert!(LayoutSpec::dense().is_trivial());
    assert!(!LayoutSpec::csc().is_trivial());
    assert!(!LayoutSpec::dense().with_transpose(false).is_trivial());
    assert_eq!(LayoutSpec::default().kind, LayoutKind::Dense);
}

#[test]
fn memory_layout_keeps_entry_order() {
    let layout = MemoryLayout::new()
        .with_entry("star", LayoutSpec::csc())
        .with_entry("kDivM(0)", LayoutSpec::dense().with_align_stride(true));
    let names: Vec<_> = layout.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["star", "kDivM(0)"]);
    assert_eq!(layout.get("kDivM(0)").unwrap().align_stride, Some(true));
}
