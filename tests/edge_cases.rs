use rsl::parse::MAX_NESTING;
use rsl::{
    parse, property, qualified, Condition, Evaluator, PropertyTree, Quantity, SemanticError,
    Timestamp, UnitPrefix, Value,
};

#[test]
fn empty_tree_only_matches_true() {
    let empty = PropertyTree::new();
    assert_eq!(parse("").unwrap().evaluate(&empty), Ok(true));
    assert!(parse("a == 1").unwrap().evaluate(&empty).is_err());
}

#[test]
fn deeply_nested_qualification() {
    let mut tree = PropertyTree::new().with_value("leaf", 1_i64);
    let mut src = String::from("leaf == 1");
    for i in 0..32 {
        let name = format!("n{i}");
        tree = PropertyTree::new().with_container(name.as_str(), tree);
        src = format!("{name} {{ {src} }}");
    }
    let c = parse(&src).unwrap();
    assert_eq!(c.evaluate(&tree), Ok(true));
    assert_eq!(parse(&c.to_string()).unwrap(), c);
}

#[test]
fn deeply_nested_parentheses() {
    let src = format!("{}a == 1{}", "(".repeat(64), ")".repeat(64));
    assert_eq!(parse(&src).unwrap(), property("a").eq(1_i64));
}

#[test]
fn nesting_up_to_the_limit_parses() {
    let parens = format!("{}a == 1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    assert_eq!(parse(&parens).unwrap(), property("a").eq(1_i64));

    let bodies = format!("{}a == 1{}", "x { ".repeat(MAX_NESTING), " }".repeat(MAX_NESTING));
    assert!(parse(&bodies).is_ok());
}

#[test]
fn nesting_past_the_limit_is_rejected() {
    let parens = format!("{}a == 1{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
    let err = parse(&parens).unwrap_err();
    assert_eq!(err.offset(), MAX_NESTING + 1);
    assert!(err.message().contains("nesting deeper than"), "{err}");
}

#[test]
fn very_deep_input_fails_without_exhausting_the_stack() {
    let n = 10_000;
    let parens = format!("{}a == 1{}", "(".repeat(n), ")".repeat(n));
    assert!(parse(&parens).is_err());

    let bodies = format!("{}a == 1{}", "x { ".repeat(n), " }".repeat(n));
    assert!(parse(&bodies).is_err());

    let mixed = format!("{}a == 1{}", "x { (".repeat(n), ") }".repeat(n));
    assert!(parse(&mixed).is_err());
}

#[test]
fn wide_conjunction() {
    let mut tree = PropertyTree::new();
    let mut parts = Vec::new();
    for i in 0..200 {
        tree.insert_value(format!("f{i}"), i64::from(i));
        parts.push(format!("f{i} == {i}"));
    }
    let c = parse(&parts.join(" && ")).unwrap();
    match &c {
        Condition::And(subs) => assert_eq!(subs.len(), 200),
        other => panic!("expected And, got {other:?}"),
    }
    assert_eq!(c.evaluate(&tree), Ok(true));
}

#[test]
fn peta_prefix_does_not_overflow() {
    let max = Quantity::new(i64::MAX, Some(UnitPrefix::Peta), Some("B")).unwrap();
    assert_eq!(max.applied_magnitude(), i128::from(i64::MAX) << 50);

    let tree = PropertyTree::new().with_value("disk", max);
    assert_eq!(
        parse("disk > 9223372036854775807B").unwrap().evaluate(&tree),
        Ok(true)
    );
}

#[test]
fn magnitude_overflow_is_a_parse_error() {
    assert!(parse("a == 9223372036854775808").is_err());
    assert!(parse("a == 9223372036854775807").is_ok());
}

#[test]
fn unicode_text_round_trips() {
    let c = parse("name == \"Příliš žluťoučký kůň\"").unwrap();
    assert_eq!(parse(&c.to_string()).unwrap(), c);

    let tree = PropertyTree::new().with_value("name", "Příliš žluťoučký kůň");
    assert_eq!(c.evaluate(&tree), Ok(true));
}

#[test]
fn unicode_offsets_in_errors() {
    let err = parse("a == \"ž\" && b ==").unwrap_err();
    assert_eq!(err.column(), 17);
    assert_eq!(err.offset(), 17);
}

#[test]
fn keyword_true_is_still_a_valid_property_name() {
    let tree = PropertyTree::new().with_value("true", 1_i64);
    assert_eq!(parse("true == 1").unwrap().evaluate(&tree), Ok(true));
    assert_eq!(parse("true").unwrap(), Condition::AlwaysTrue);
}

#[test]
fn dotted_name_is_a_single_lookup() {
    let nested = PropertyTree::new()
        .with_container("cpu", PropertyTree::new().with_value("count", 4_i64));
    assert!(matches!(
        parse("cpu.count == 4").unwrap().evaluate(&nested),
        Err(SemanticError::InvalidProperty { .. })
    ));
    assert_eq!(parse("cpu { count == 4 }").unwrap().evaluate(&nested), Ok(true));
}

#[test]
fn empty_array_never_matches() {
    let tree = PropertyTree::new().with_array("items", []);
    assert_eq!(parse("items { true }").unwrap().evaluate(&tree), Ok(false));
    assert_eq!(Evaluator::default().check(&parse("items { x == 1 }").unwrap(), &tree), Ok(()));
}

#[test]
fn nested_arrays_are_existential_at_each_level() {
    let host = |sizes: &[i64]| {
        PropertyTree::new().with_array(
            "disks",
            sizes.iter().map(|&s| PropertyTree::new().with_value("size", s)),
        )
    };
    let cluster = PropertyTree::new().with_array("hosts", [host(&[1, 2]), host(&[3, 4])]);
    let c = qualified("hosts", qualified("disks", property("size").eq(4_i64)));
    assert_eq!(c.evaluate(&cluster), Ok(true));
    let c = qualified("hosts", qualified("disks", property("size").eq(5_i64)));
    assert_eq!(c.evaluate(&cluster), Ok(false));
}

#[test]
fn structural_equality_of_literals() {
    assert_ne!(parse("a == 1kHz").unwrap(), parse("a == 1024Hz").unwrap());
    assert_eq!(parse("a == 1.0").unwrap(), parse("a == 1.0.0").unwrap());
    assert_eq!(
        parse("a == 2006-05-17T23:30Z").unwrap(),
        parse("a == 2006-05-18T01:30+02:00").unwrap()
    );
    assert_ne!(parse("a =~ /x/").unwrap(), parse("a =~ /x/i").unwrap());
}

#[test]
fn timestamp_literal_value() {
    match parse("t == 2006-05-17T23:30:42.1+03:00").unwrap() {
        Condition::Compare { value: Value::Timestamp(t), .. } => {
            assert_eq!(t, Timestamp::from_epoch_millis(1_147_897_842_100).unwrap());
        }
        other => panic!("expected timestamp comparison, got {other:?}"),
    }
}

#[test]
fn degenerate_connectives_reparse_to_equivalents() {
    let tree = PropertyTree::new().with_value("a", 1_i64);
    let a = property("a").eq(1_i64);
    for c in [
        Condition::And(vec![a.clone()]),
        Condition::Or(vec![a.clone()]),
        Condition::And(vec![]),
        Condition::And(vec![Condition::And(vec![a.clone()]), a.clone()]),
    ] {
        let reparsed = parse(&c.to_string()).unwrap();
        assert_eq!(reparsed.evaluate(&tree), c.evaluate(&tree), "{c:?}");
    }
    assert_eq!(parse(&Condition::And(vec![a.clone()]).to_string()).unwrap(), a);
}
