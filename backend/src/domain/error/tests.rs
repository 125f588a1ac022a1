//! Tests for the domain error payload.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn conflict_error() -> Error {
    Error::conflict("revision mismatch").with_details(json!({
        "expectedRevision": 2,
        "actualRevision": 3,
    }))
}

#[rstest]
#[case::invalid_request(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::forbidden(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case::transition(Error::invalid_transition("denied"), ErrorCode::InvalidTransition)]
#[case::conflict(Error::conflict("stale"), ErrorCode::Conflict)]
#[case::not_found(Error::not_found("missing"), ErrorCode::NotFound)]
#[case::unavailable(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
#[case(ErrorCode::Conflict, true)]
#[case(ErrorCode::ServiceUnavailable, true)]
#[case(ErrorCode::Forbidden, false)]
#[case(ErrorCode::InvalidTransition, false)]
#[case(ErrorCode::InvalidRequest, false)]
fn retryable_only_for_conflicts_and_outages(#[case] code: ErrorCode, #[case] retryable: bool) {
    assert_eq!(Error::new(code, "x").is_retryable(), retryable);
}

#[rstest]
fn serializes_code_in_snake_case(conflict_error: Error) {
    let value = serde_json::to_value(&conflict_error).expect("serialize error");
    assert_eq!(value["code"], "conflict");
    assert_eq!(value["message"], "revision mismatch");
    assert_eq!(value["details"]["actualRevision"], 3);
}

#[rstest]
fn omits_absent_details() {
    let value = serde_json::to_value(Error::forbidden("nope")).expect("serialize error");
    assert!(value.get("details").is_none());
}

#[rstest]
fn deserialization_rejects_blank_message() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({ "code": "forbidden", "message": " " }));
    assert!(result.is_err());
}

#[rstest]
fn deserialization_round_trips(conflict_error: Error) {
    let value = serde_json::to_value(&conflict_error).expect("serialize error");
    let parsed: Error = serde_json::from_value(value).expect("deserialize error");
    assert_eq!(parsed, conflict_error);
}
