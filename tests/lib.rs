// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use badge_access_control::*;

mod event_log_tests;

// Records and authorization
mod authorization_tests;

// Runtime behavior
mod cli_argument_parsing_tests;

#[test]
fn test_core_id_types() {
    let sensor_id = SensorId::new();
    let barrier_id = BarrierId::new();
    let department_id = DepartmentId::new();
    let user_id = UserId::new();

    // Test that IDs are unique
    assert_ne!(sensor_id, SensorId::new());
    assert_ne!(barrier_id, BarrierId::new());

    // Test string formatting
    assert!(sensor_id.to_string().starts_with("SNS_"));
    assert!(barrier_id.to_string().starts_with("BAR_"));
    assert!(department_id.to_string().starts_with("DEPT_"));
    assert!(user_id.to_string().starts_with("USER_"));
    assert!(EventId::new().to_string().starts_with("EVT_"));
}

#[test]
fn test_id_json_output_has_prefixes() {
    let barrier_id = BarrierId::new();
    let json = serde_json::to_string(&barrier_id).unwrap();
    assert!(json.contains("BAR_"));

    let parsed: BarrierId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, barrier_id);
}

#[test]
fn test_error_response_envelope() {
    let error = AccessControlError::forbidden(Operation::Delete(EntityKind::Department));
    let response = ErrorResponse::from(&error);

    assert!(response.error);
    assert_eq!(response.status_code, 403);
    assert_eq!(response.message, "You do not have permission to perform this action.");
    assert!(response.details.contains("delete department"));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status_code"], 403);
    assert_eq!(json["error"], true);
}

#[test]
fn test_duplicate_key_maps_to_bad_request() {
    let error = AccessControlError::duplicate(EntityKind::Sensor, "uid", "RFID-001-AAA");
    assert_eq!(error.status_code(), 400);
    assert_eq!(ErrorResponse::from(&error).message, "Validation error");
    assert!(!error.is_retryable());
    assert!(AccessControlError::busy("barrier BAR_x").is_retryable());
}
