//! Domain error types.
//!
//! Every registry and workflow operation reports failures through
//! [`DomainError`]. None of these are retried by the core.

use thiserror::Error;

/// Message used when a device already has an open request.
pub const DUPLICATE_REQUEST_MESSAGE: &str = "There is already a pending request for this device";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Unknown device or request id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input: missing field, out-of-range rental days, bad reason length.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A pending request already exists for the device.
    #[error("{}", DUPLICATE_REQUEST_MESSAGE)]
    DuplicateRequest,

    /// Device or request is not in the state the transition requires.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Caller lacks the privilege for the action.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Storage layer failure (connection loss, timeout, ...). The caller decides whether to retry.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn device_not_found(id: impl std::fmt::Display) -> Self {
        DomainError::NotFound(format!("Device {} not found", id))
    }

    pub fn request_not_found(id: impl std::fmt::Display) -> Self {
        DomainError::NotFound(format!("Request {} not found", id))
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        messages.sort();

        DomainError::Validation(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn test_duplicate_request_message() {
        assert_eq!(
            DomainError::DuplicateRequest.to_string(),
            "There is already a pending request for this device"
        );
    }

    #[test]
    fn test_not_found_helpers() {
        let err = DomainError::device_not_found("abc");
        assert_eq!(err, DomainError::NotFound("Device abc not found".to_string()));

        let err = DomainError::request_not_found("xyz");
        assert_eq!(err.to_string(), "Not found: Request xyz not found");
    }

    #[test]
    fn test_from_validation_errors() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be empty".into());
        errors.add("project", err);
        errors.add("project_group", ValidationError::new("required"));

        match DomainError::from(errors) {
            DomainError::Validation(msg) => {
                assert!(msg.contains("project: Value must not be empty"));
                assert!(msg.contains("project_group: invalid value"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }
}
