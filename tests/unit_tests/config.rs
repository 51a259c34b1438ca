use std::path::PathBuf;
use tensorspec::config::{number_of_basis_functions, GeneratorConfig, NamePatterns};
use tensorspec::label::Labels;

#[test]
fn basis_function_counts() {
    assert_eq!(number_of_basis_functions(1), 1);
    assert_eq!(number_of_basis_functions(2), 4);
    assert_eq!(number_of_basis_functions(3), 10);
    assert_eq!(number_of_basis_functions(4), 20);
    assert_eq!(number_of_basis_functions(6), 56);
}

#[test]
fn name_patterns_match_exact_names_and_prefixes() {
    let patterns = NamePatterns::new(["kDivM*", "star(0)"]);
    assert!(patterns.matches("kDivM(0)"));
    assert!(patterns.matches("kDivMT(2)"));
    assert!(patterns.matches("star(0)"));
    assert!(!patterns.matches("star(1)"));
    assert!(!patterns.matches("fMrT"));
    assert!(NamePatterns::default().is_empty());
    assert!(!NamePatterns::default().matches("kDivM(0)"));
}

#[test]
fn config_from_json_uses_defaults() {
    let config = GeneratorConfig::from_json_str(
        r#"{
            "order": 3,
            "matrices_dir": "matrices",
            "memory_layout": "layouts/dense.xml"
        }"#,
    )
    .unwrap();
    assert_eq!(config.order, 3);
    assert_eq!(config.multiple_simulations, 1);
    assert_eq!(config.matrices_dir, PathBuf::from("matrices"));
    assert!(config.transpose.is_empty());
    assert_eq!(config.number_of_basis_functions(), 10);
    assert_eq!(config.matrix_path("star.xml"), PathBuf::from("matrices/star.xml"));
    assert_eq!(config, GeneratorConfig::new(3, "matrices", "layouts/dense.xml"));
}

#[test]
fn config_from_json_rejects_invalid_values() {
    let zero_order = r#"{ "order": 0, "matrices_dir": "m", "memory_layout": "l.xml" }"#;
    assert!(GeneratorConfig::from_json_str(zero_order).is_err());

    let zero_simulations =
        r#"{ "order": 2, "multiple_simulations": 0, "matrices_dir": "m", "memory_layout": "l.xml" }"#;
    assert!(GeneratorConfig::from_json_str(zero_simulations).is_err());

    let missing_dir = r#"{ "order": 2, "memory_layout": "l.xml" }"#;
    assert!(GeneratorConfig::from_json_str(missing_dir).is_err());

    assert!(GeneratorConfig::from_json_file("does/not/exist.json").is_err());
}

#[test]
fn transposed_tensors_get_reversed_labels() {
    let mut config = GeneratorConfig::new(2, "matrices", "layout.xml");
    config.transpose = NamePatterns::new(["kDivM*"]);
    config.align_stride = NamePatterns::new(["star*"]);

    let kl = Labels::parse("kl").unwrap();
    assert_eq!(config.t("kDivM(1)", kl.clone()).to_string(), "lk");
    assert_eq!(config.t("star(1)", kl.clone()), kl);

    let rules = config.hint_rules();
    assert!(rules.hints_for("kDivM(0)").transpose);
    assert!(!rules.hints_for("kDivM(0)").align_stride);
    assert!(rules.hints_for("star(2)").align_stride);
    assert!(config.aligns_stride("star(2)"));
    assert!(!config.transposes("star(2)"));
}
