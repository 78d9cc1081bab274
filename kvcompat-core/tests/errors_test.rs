use kvcompat_core::errors::*;
use kvcompat_core::models::IssueCategory;

#[test]
fn missing_rank_signature_is_compatibility_class() {
    let kind = StoreErrorKind::from_message("ERR unknown command 'zrevrank', with args beginning with: 'lb'");
    assert_eq!(kind, StoreErrorKind::MissingRankCommand);
    assert!(kind.is_compatibility());
    assert_eq!(kind.issue_category(), IssueCategory::UnknownCommand);
}

#[test]
fn message_patterns_map_to_buckets() {
    let cases = [
        ("client.zunionstore is not a function", StoreErrorKind::MethodNotAvailable),
        ("ERR unknown command 'zunionstore'", StoreErrorKind::UnknownCommand),
        ("command not supported in this environment", StoreErrorKind::MethodNotSupported),
        ("operation timed out after 10000ms", StoreErrorKind::Timeout),
        ("connect ECONNREFUSED 127.0.0.1:6379", StoreErrorKind::ConnectionError),
        ("WRONGTYPE Operation against a key holding the wrong kind of value", StoreErrorKind::Other),
    ];
    for (message, expected) in cases {
        assert_eq!(StoreErrorKind::from_message(message), expected, "{message}");
    }
}

#[test]
fn infrastructure_kinds_are_not_compatibility_class() {
    for kind in [
        StoreErrorKind::Timeout,
        StoreErrorKind::ConnectionError,
        StoreErrorKind::Other,
    ] {
        assert!(!kind.is_compatibility(), "{kind} must propagate");
    }
}

#[test]
fn store_error_converts_to_compat_error() {
    let err: CompatError = StoreError::unsupported("zrevrank").into();
    assert!(matches!(err, CompatError::StoreError(_)));
    assert_eq!(err.store_kind(), Some(StoreErrorKind::MethodNotSupported));
    assert!(err.is_compatibility());
}

#[test]
fn non_store_errors_are_never_compatibility() {
    let err = CompatError::Rejected {
        method: "zunionstore".into(),
        reason: "blocked".into(),
    };
    assert!(!err.is_compatibility());
    assert!(err.to_string().contains("zunionstore"));
}

#[test]
fn write_failed_carries_key_and_member() {
    let err = CompatError::WriteFailed {
        key: "lb:round:1".into(),
        member: "alice".into(),
        source: Box::new(StoreError::timeout("zadd", 10).into()),
    };
    let msg = err.to_string();
    assert!(msg.contains("lb:round:1"));
    assert!(msg.contains("alice"));
}

#[test]
fn timeout_error_message_mentions_bound() {
    let err = StoreError::timeout("zrange", 250);
    assert_eq!(err.kind, StoreErrorKind::Timeout);
    assert!(err.to_string().contains("250ms"));
}
