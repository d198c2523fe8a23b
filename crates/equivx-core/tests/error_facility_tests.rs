use equivx_core::errors::{EquivError, ExError, ExErrorKind};
use equivx_core::{TypeCatalog, TypeDescriptor};

#[test]
fn test_unknown_type_verifiable_by_kind() {
    let err = EquivError::UnknownType {
        type_name: "Order".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnknownType);
    assert_eq!(ex_err.code(), "ERR_UNKNOWN_TYPE");
    assert_eq!(ex_err.type_name(), Some("Order"));
}

#[test]
fn test_duplicate_registration_surfaces_through_catalog() {
    let err = TypeCatalog::new()
        .with_type(TypeDescriptor::class("Order"))
        .and_then(|c| c.with_type(TypeDescriptor::class("Order")))
        .err()
        .map(ExError::from);

    let ex_err = match err {
        Some(ex_err) => ex_err,
        None => panic!("second registration should fail"),
    };
    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateType);
    assert_eq!(ex_err.op(), Some("register_type"));
    assert_eq!(ex_err.type_name(), Some("Order"));
}

#[test]
fn test_invalid_path_carries_pattern() {
    let err = EquivError::InvalidPathPattern {
        pattern: "Orders[".to_string(),
        reason: "unterminated '['".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidPath);
    assert_eq!(ex_err.path(), Some("Orders["));
    assert!(ex_err.message().contains("unterminated"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::UnknownType, "ERR_UNKNOWN_TYPE"),
        (ExErrorKind::DuplicateType, "ERR_DUPLICATE_TYPE"),
        (ExErrorKind::InvalidPath, "ERR_INVALID_PATH"),
        (ExErrorKind::InvalidProfile, "ERR_INVALID_PROFILE"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::NotEquivalent, "ERR_NOT_EQUIVALENT"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_io_error_conversion() {
    let err = EquivError::Io {
        path: "actual.json".to_string(),
        message: "No such file or directory".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Io);
    assert_eq!(ex_err.path(), Some("actual.json"));
}

#[test]
fn test_display_includes_code_op_and_message() {
    let ex_err: ExError = EquivError::InvalidProfile {
        reason: "max_differences must be at least 1".to_string(),
    }
    .into();

    assert_eq!(
        ex_err.to_string(),
        "[ERR_INVALID_PROFILE] in operation 'load_profile': max_differences must be at least 1"
    );
}
