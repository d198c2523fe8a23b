#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{customer, customer_at, cyclic_pair, messages, sample_catalog};
use equivx_core::{
    compare, DifferenceKind, EquivError, EquivalencyOptions, ObjectRef, TypeCatalog,
    TypeDescriptor, Value,
};

// ===== BASIC EQUIVALENCE =====

#[test]
fn test_identical_graphs_are_equivalent() {
    let catalog = sample_catalog();
    let subject: Value = customer_at("John", 27, "Oslo").into();

    let differences = compare(&subject, &subject, &EquivalencyOptions::new(), &catalog).unwrap();

    assert!(differences.is_empty());
}

#[test]
fn test_structurally_equal_instances_are_equivalent() {
    let catalog = sample_catalog();
    let actual = customer_at("John", 27, "Oslo").into();
    let expected = customer_at("John", 27, "Oslo").into();

    assert!(compare(&actual, &expected, &EquivalencyOptions::new(), &catalog)
        .unwrap()
        .is_empty());
}

#[test]
fn test_nested_mismatch_is_addressed_by_path() {
    let catalog = sample_catalog();
    let actual = customer_at("John", 27, "Bergen").into();
    let expected = customer_at("John", 27, "Oslo").into();

    let differences = compare(&actual, &expected, &EquivalencyOptions::new(), &catalog).unwrap();

    assert_eq!(differences.len(), 1);
    assert_eq!(differences[0].kind, DifferenceKind::StructuralMismatch);
    assert_eq!(differences[0].path.to_string(), "Address.City");
    assert_eq!(
        differences[0].message,
        "Expected Address.City to be \"Oslo\", but found \"Bergen\"."
    );
    assert_eq!(differences[0].expected.as_deref(), Some("\"Oslo\""));
    assert_eq!(differences[0].actual.as_deref(), Some("\"Bergen\""));
}

#[test]
fn test_all_findings_are_reported_in_traversal_order() {
    let catalog = sample_catalog();
    let actual = customer_at("Jane", 24, "Bergen").into();
    let expected = customer_at("John", 27, "Oslo").into();

    let differences = compare(&actual, &expected, &EquivalencyOptions::new(), &catalog).unwrap();

    let paths: Vec<String> = differences.iter().map(|d| d.path.to_string()).collect();
    // Derived members first, then base members
    assert_eq!(paths, vec!["Age", "Address.City", "Name"]);
}

#[test]
fn test_null_only_equals_null() {
    let catalog = sample_catalog();
    let with_address = customer_at("John", 27, "Oslo").into();
    let without_address = customer("John", 27).into();

    let differences =
        compare(&without_address, &with_address, &EquivalencyOptions::new(), &catalog).unwrap();
    assert_eq!(differences.len(), 1);
    assert!(differences[0]
        .message
        .starts_with("Expected Address to be Address { Street = \"Main Street 1\", City = \"Oslo\" }, but found <null>."));

    let reversed =
        compare(&with_address, &without_address, &EquivalencyOptions::new(), &catalog).unwrap();
    assert_eq!(reversed.len(), 1);
    assert!(reversed[0].message.ends_with("but found Address { Street = \"Main Street 1\", City = \"Oslo\" }."));
}

#[test]
fn test_numbers_compare_across_representations() {
    let catalog = sample_catalog();
    let actual = ObjectRef::instance("Customer").with("Name", "John").with("Age", 27u64);
    let expected = ObjectRef::instance("Customer").with("Name", "John").with("Age", 27.0);

    assert!(compare(&actual.into(), &expected.into(), &EquivalencyOptions::new(), &catalog)
        .unwrap()
        .is_empty());
}

#[test]
fn test_object_expected_scalar_found_is_leaf_mismatch() {
    let catalog = sample_catalog();
    let expected = customer("John", 27).into();

    let differences =
        compare(&Value::from("John"), &expected, &EquivalencyOptions::new(), &catalog).unwrap();

    assert_eq!(
        messages(&differences),
        vec!["Expected subject to be Customer { Name = \"John\", Age = 27 }, but found \"John\"."]
    );
}

// ===== MEMBER PAIRING =====

#[test]
fn test_missing_member_is_reported_unless_excluded() {
    let catalog = sample_catalog()
        .with_type(TypeDescriptor::class("Contact").property("Name", "string"))
        .unwrap();
    let actual = ObjectRef::instance("Contact").with("Name", "John").into();
    let expected = customer("John", 27).into();

    let differences = compare(&actual, &expected, &EquivalencyOptions::new(), &catalog).unwrap();
    assert_eq!(
        messages(&differences),
        vec![
            "Expectation has member Age that the other object does not have.",
            "Expectation has member Address that the other object does not have.",
        ]
    );
    assert!(differences
        .iter()
        .all(|d| d.kind == DifferenceKind::MissingMember));

    let lenient = EquivalencyOptions::new().excluding_missing_members();
    assert!(compare(&actual, &expected, &lenient, &catalog)
        .unwrap()
        .is_empty());
}

#[test]
fn test_members_pair_by_name_across_unrelated_types() {
    let catalog = sample_catalog()
        .with_type(
            TypeDescriptor::class("CustomerDto")
                .property("Age", "i64")
                .property("Name", "string")
                .property("Address", "Address")
                .property("Extra", "string"),
        )
        .unwrap();
    let actual = ObjectRef::instance("CustomerDto")
        .with("Age", 27)
        .with("Name", "John")
        .with("Extra", "ignored")
        .into();
    let expected = customer("John", 27).into();

    // Members only the subject has are not compared
    assert!(compare(&actual, &expected, &EquivalencyOptions::new(), &catalog)
        .unwrap()
        .is_empty());
}

#[test]
fn test_declared_type_limits_compared_members() {
    let catalog = sample_catalog();
    let actual = customer("John", 99).into();
    let expected = customer("John", 27).into();

    let as_person = EquivalencyOptions::new().with_root_type("Person");
    assert!(compare(&actual, &expected, &as_person, &catalog)
        .unwrap()
        .is_empty());

    let runtime = as_person.respecting_runtime_types();
    let differences = compare(&actual, &expected, &runtime, &catalog).unwrap();
    assert_eq!(messages(&differences), vec!["Expected Age to be 27, but found 99."]);
}

#[test]
fn test_unknown_runtime_type_is_fatal() {
    let catalog = TypeCatalog::new();
    let actual = ObjectRef::instance("Ghost").into();
    let expected = ObjectRef::instance("Ghost").into();

    let err = compare(&actual, &expected, &EquivalencyOptions::new(), &catalog).unwrap_err();
    assert_eq!(
        err,
        EquivError::UnknownType {
            type_name: "Ghost".to_string()
        }
    );
}

// ===== BYTES =====

#[test]
fn test_byte_sequences_compare_in_order() {
    let catalog = sample_catalog();
    let actual = Value::Bytes(vec![1, 2, 3, 4, 5, 6]);
    let expected = Value::Bytes(vec![6, 5, 4, 3, 2, 1]);

    let differences = compare(&actual, &expected, &EquivalencyOptions::new(), &catalog).unwrap();

    assert_eq!(differences.len(), 1);
    assert_eq!(differences[0].path.to_string(), "item[0]");
    assert!(differences[0].message.contains('6'));
    assert!(differences[0].message.contains('1'));
    assert_eq!(differences[0].message, "Expected item[0] to be 6, but found 1.");
}

#[test]
fn test_byte_sequences_of_different_length() {
    let catalog = sample_catalog();
    let differences = compare(
        &Value::Bytes(vec![1, 2, 3]),
        &Value::Bytes(vec![1, 2]),
        &EquivalencyOptions::new(),
        &catalog,
    )
    .unwrap();

    assert_eq!(differences[0].kind, DifferenceKind::CountMismatch);
    assert_eq!(
        differences[0].message,
        "Expected subject to be a collection with 2 item(s), but found 3."
    );
}

// ===== CUSTOM COMPARERS =====

#[test]
fn test_custom_comparer_overrides_equality_for_type() {
    let catalog = sample_catalog();
    let actual = customer("JOHN", 27).into();
    let expected = customer("john", 27).into();

    let case_insensitive = |a: &Value, e: &Value| match (a.as_str(), e.as_str()) {
        (Some(a), Some(e)) => a.eq_ignore_ascii_case(e),
        _ => false,
    };
    let options = EquivalencyOptions::new().using("string", case_insensitive);

    assert!(compare(&actual, &expected, &options, &catalog)
        .unwrap()
        .is_empty());
}

#[test]
fn test_type_comparer_does_not_take_over_subtypes() {
    let catalog = sample_catalog();
    let actual = customer("Jane", 24).into();
    let expected = customer("John", 30).into();
    let options = EquivalencyOptions::new().using("Person", |_: &Value, _: &Value| true);

    let differences = compare(&actual, &expected, &options, &catalog).unwrap();

    assert_eq!(differences.len(), 2);
    assert_eq!(
        messages(&differences),
        vec![
            "Expected Age to be 30, but found 24.",
            "Expected Name to be \"John\", but found \"Jane\".",
        ]
    );
}

#[test]
fn test_custom_comparer_rejecting_reports_leaf_mismatch() {
    let catalog = sample_catalog();
    let actual = customer("John", 27).into();
    let expected = customer("John", 27).into();
    let options = EquivalencyOptions::new()
        .using_for_path("Age", "i64", |_: &Value, _: &Value| false)
        .unwrap();

    let differences = compare(&actual, &expected, &options, &catalog).unwrap();
    assert_eq!(messages(&differences), vec!["Expected Age to be 27, but found 27."]);
}

#[test]
fn test_custom_comparer_type_mismatch() {
    let catalog = sample_catalog();
    let actual = ObjectRef::instance("Customer")
        .with("Name", "John")
        .with("Age", "twenty-seven")
        .into();
    let expected = customer("John", 27).into();
    let options = EquivalencyOptions::new()
        .using_for_path("Age", "i64", |_: &Value, _: &Value| true)
        .unwrap();

    let differences = compare(&actual, &expected, &options, &catalog).unwrap();

    assert_eq!(differences.len(), 1);
    assert_eq!(
        differences[0].kind,
        DifferenceKind::TypeMismatchInCustomComparer
    );
    assert_eq!(
        differences[0].message,
        "Expected Age to be a i64, but found a string."
    );
}

#[test]
fn test_custom_comparer_accepts_null_subject() {
    let catalog = sample_catalog();
    let actual = ObjectRef::instance("Customer").with("Name", "John").into();
    let expected = customer("John", 27).into();
    let options = EquivalencyOptions::new()
        .using_for_path("Age", "i64", |a: &Value, _: &Value| a.is_null())
        .unwrap();

    assert!(compare(&actual, &expected, &options, &catalog)
        .unwrap()
        .is_empty());
}

// ===== CYCLES =====

#[test]
fn test_cyclic_reference_is_reported_by_default() {
    let catalog = sample_catalog();
    let actual = cyclic_pair("root").into();
    let expected = cyclic_pair("root").into();

    let differences = compare(&actual, &expected, &EquivalencyOptions::new(), &catalog).unwrap();

    assert_eq!(differences.len(), 1);
    assert_eq!(differences[0].kind, DifferenceKind::CyclicReference);
    assert_eq!(differences[0].path.to_string(), "Children[0].Parent");
    assert!(differences[0]
        .message
        .starts_with("Expected Children[0].Parent to be Node {"));
    assert!(differences[0]
        .message
        .ends_with("but it contains a cyclic reference."));
}

#[test]
fn test_cyclic_graphs_are_equivalent_when_ignored() {
    let catalog = sample_catalog();
    let actual = cyclic_pair("root").into();
    let expected = cyclic_pair("root").into();
    let options = EquivalencyOptions::new().ignoring_cyclic_references();

    assert!(compare(&actual, &expected, &options, &catalog)
        .unwrap()
        .is_empty());
}

#[test]
fn test_cycle_does_not_hide_sibling_differences() {
    let catalog = sample_catalog();
    let actual = cyclic_pair("root");
    actual.set("Name", "renamed");
    let expected = cyclic_pair("root");
    let options = EquivalencyOptions::new().ignoring_cyclic_references();

    let differences = compare(&actual.into(), &expected.into(), &options, &catalog).unwrap();
    assert_eq!(
        messages(&differences),
        vec!["Expected Name to be \"root\", but found \"renamed\"."]
    );
}

#[test]
fn test_shared_sibling_reference_is_not_a_cycle() {
    let catalog = sample_catalog();
    let address = ObjectRef::instance("Address").with("City", "Oslo");
    let home = customer("John", 27).with("Address", &address);
    let pair = ObjectRef::collection("List<Customer>", [home.clone(), home]);

    let differences =
        compare(&pair.clone().into(), &pair.into(), &EquivalencyOptions::new(), &catalog).unwrap();
    assert!(differences.is_empty());
}

// ===== AMBIGUITY =====

#[test]
fn test_ambiguous_enumerable_lists_both_types() {
    let catalog = sample_catalog();
    let actual = ObjectRef::collection("MixedBag", ["a"]).into();
    let expected = ObjectRef::collection("MixedBag", ["a"]).into();

    let differences = compare(&actual, &expected, &EquivalencyOptions::new(), &catalog).unwrap();

    assert_eq!(differences.len(), 1);
    assert_eq!(differences[0].kind, DifferenceKind::ConfigurationAmbiguity);
    assert_eq!(
        differences[0].message,
        "Subject is enumerable for more than one type. It is not known which type should be used for equivalence. The enumerable interfaces are: string, i64"
    );
}

// ===== CONCURRENCY =====

#[test]
fn test_independent_comparisons_run_concurrently() {
    let catalog = sample_catalog();
    let options = EquivalencyOptions::new();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let catalog = &catalog;
                let options = &options;
                scope.spawn(move || {
                    let actual = customer_at("John", 27 + i, "Oslo").into();
                    let expected = customer_at("John", 27, "Oslo").into();
                    compare(&actual, &expected, options, catalog).unwrap().len()
                })
            })
            .collect();

        let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(counts[0], 0);
        assert!(counts[1..].iter().all(|&c| c == 1));
    });
}
