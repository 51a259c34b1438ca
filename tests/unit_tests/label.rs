use tensorspec::label::{Label, Labels};
use tensorspec::Error;

#[test]
fn parse_single_character_labels() {
    let labels = Labels::parse("ijkl").unwrap();
    assert_eq!(labels.len(), 4);
    assert_eq!(
        labels.as_slice(),
        &[Label::Char('i'), Label::Char('j'), Label::Char('k'), Label::Char('l')]
    );
    assert_eq!(labels.to_string(), "ijkl");

    // Whitespace is ignored
    assert_eq!(Labels::parse(" i j ").unwrap(), Labels::parse("ij").unwrap());
}

#[test]
fn parse_compound_labels() {
    let labels = Labels::parse("q1, q2,k").unwrap();
    assert_eq!(
        labels.as_slice(),
        &[
            Label::Symbol("q1".to_string()),
            Label::Symbol("q2".to_string()),
            Label::Char('k')
        ]
    );
    assert_eq!(labels.to_string(), "q1,q2,k");
}

#[test]
fn parse_rejects_empty_compound_label() {
    assert_eq!(
        Labels::parse("i,,j"),
        Err(Error::InvalidLabel { label: String::new() })
    );
    assert!(Label::new("a b").is_err());
}

#[test]
fn label_set_operations() {
    let ijk = Labels::parse("ijk").unwrap();
    let kji = Labels::parse("kji").unwrap();
    assert!(ijk.same_set(&kji));
    assert!(!ijk.same_set(&Labels::parse("ij").unwrap()));
    assert_eq!(ijk.reversed(), kji);
    assert!(ijk.is_distinct());
    assert!(!Labels::parse("iji").unwrap().is_distinct());
    assert_eq!(ijk.prepended(Label::Char('s')).to_string(), "sijk");
}
