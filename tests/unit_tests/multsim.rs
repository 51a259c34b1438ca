use tensorspec::multsim::{OptionalDimTensor, SIMULATION_LABEL};
use tensorspec::shape::Shape;

#[test]
fn single_simulation_is_a_plain_tensor() {
    let q = OptionalDimTensor::new("Q", [4, 9], 1);
    assert!(!q.has_optional_dim());
    assert_eq!(q.shape(), &Shape::from([4, 9]));
    assert_eq!(q.idx("kp").unwrap().labels().to_string(), "kp");
    assert_eq!(q.to_def().shape(), &Shape::from([4, 9]));
}

#[test]
fn multiple_simulations_prepend_the_simulation_axis() {
    let q = OptionalDimTensor::new("Q", [4, 9], 8);
    assert!(q.has_optional_dim());
    assert_eq!(q.shape(), &Shape::from([8, 4, 9]));

    let indexed = q.idx("kp").unwrap();
    assert_eq!(indexed.labels().to_string(), format!("{}kp", SIMULATION_LABEL));
    assert!(indexed.check_label_count().is_ok());
    assert_eq!(q.to_def().name(), "Q");
}
