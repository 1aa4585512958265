//! Field-level validation rules shared by the record types

use crate::service::error::{AccessControlError, AccessControlResult};

/// Minimum length of department, sensor, barrier, and user names
pub const MIN_NAME_LENGTH: usize = 3;

/// Maximum length of department, sensor, and barrier names
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of a sensor uid
pub const MAX_UID_LENGTH: usize = 50;

/// Maximum length of a department location
pub const MAX_LOCATION_LENGTH: usize = 200;

/// Maximum length of a phone number
pub const MAX_PHONE_LENGTH: usize = 15;

/// Validate a name field: trimmed length within `MIN_NAME_LENGTH..=MAX_NAME_LENGTH`
pub fn validate_name(field: &str, value: &str) -> AccessControlResult<()> {
    let length = value.trim().chars().count();
    if length < MIN_NAME_LENGTH {
        return Err(AccessControlError::validation(
            field,
            format!("must be at least {} characters", MIN_NAME_LENGTH),
        ));
    }
    if length > MAX_NAME_LENGTH {
        return Err(AccessControlError::validation(
            field,
            format!("must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(())
}

/// Validate a badge uid: non-blank and at most `MAX_UID_LENGTH` characters
///
/// The uid is stored trimmed, so surrounding whitespace does not count.
pub fn validate_uid(value: &str) -> AccessControlResult<()> {
    let uid = value.trim();
    if uid.is_empty() {
        return Err(AccessControlError::validation("uid", "uid is required"));
    }
    if uid.chars().count() > MAX_UID_LENGTH {
        return Err(AccessControlError::validation(
            "uid",
            format!("must be at most {} characters", MAX_UID_LENGTH),
        ));
    }
    Ok(())
}

/// Validate an optional free-text field against a maximum length
pub fn validate_max_length(field: &str, value: Option<&str>, max: usize) -> AccessControlResult<()> {
    match value {
        Some(text) if text.chars().count() > max => Err(AccessControlError::validation(
            field,
            format!("must be at most {} characters", max),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_bounds() {
        assert!(validate_name("name", "Lab").is_ok());
        assert!(validate_name("name", "ab").is_err());
        assert!(validate_name("name", "  ab  ").is_err());
        assert!(validate_name("name", &"x".repeat(101)).is_err());
    }

    #[test]
    fn test_name_error_names_field() {
        match validate_name("barrier.name", "no") {
            Err(AccessControlError::Validation { field, .. }) => assert_eq!(field, "barrier.name"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_uid_rules() {
        assert!(validate_uid("RFID-001-AAA").is_ok());
        assert!(validate_uid("").is_err());
        assert!(validate_uid("   ").is_err());
        assert!(validate_uid(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_uid_length_ignores_surrounding_whitespace() {
        assert!(validate_uid(&format!(" {}", "A".repeat(50))).is_ok());
        assert!(validate_uid(&format!("  {}\t", "A".repeat(50))).is_ok());
        assert!(validate_uid(&format!(" {} ", "A".repeat(51))).is_err());
    }

    #[test]
    fn test_max_length() {
        assert!(validate_max_length("phone", None, 15).is_ok());
        assert!(validate_max_length("phone", Some("+56 9 1234 5678"), 15).is_ok());
        assert!(validate_max_length("phone", Some("+56 9 1234 5678 9"), 15).is_err());
    }
}
