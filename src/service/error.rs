//! Error types and handling
//!
//! This module contains the error taxonomy shared by the entity store, the
//! event log, the access decision engine, and the barrier controller, plus the
//! retry helper for retryable (busy) failures.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::EntityKind;

/// Errors that can occur in the access control core
#[derive(Debug, Error)]
pub enum AccessControlError {
    /// Malformed input; the operation was not attempted
    #[error("Validation failed for {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// Human-readable detail
        message: String,
    },

    /// Unknown entity identifier
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing record
        kind: EntityKind,
        /// Identifier that was looked up
        id: String,
    },

    /// Caller role lacks permission for the operation
    #[error("Forbidden: {operation} requires a different role")]
    Forbidden {
        /// Operation that was refused
        operation: String,
    },

    /// No authenticated caller
    #[error("Authentication required")]
    Unauthenticated,

    /// Uniqueness violation
    #[error("Duplicate {kind} {field}: {value}")]
    DuplicateKey {
        /// Kind of record being written
        kind: EntityKind,
        /// Unique field that collided
        field: &'static str,
        /// Colliding value
        value: String,
    },

    /// Lock contention or timeout; retry the request
    #[error("Resource busy: {resource}")]
    Busy {
        /// Resource whose lock could not be acquired
        resource: String,
    },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AccessControlError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create a not-found error
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound { kind, id: id.to_string() }
    }

    /// Create a forbidden error
    pub fn forbidden(operation: impl ToString) -> Self {
        Self::Forbidden { operation: operation.to_string() }
    }

    /// Create a duplicate key error
    pub fn duplicate(kind: EntityKind, field: &'static str, value: impl Into<String>) -> Self {
        Self::DuplicateKey { kind, field, value: value.into() }
    }

    /// Create a busy error
    pub fn busy(resource: impl Into<String>) -> Self {
        Self::Busy { resource: resource.into() }
    }

    /// HTTP-equivalent status code expected by callers
    pub fn status_code(&self) -> u16 {
        match self {
            AccessControlError::Validation { .. } => 400,
            AccessControlError::DuplicateKey { .. } => 400,
            AccessControlError::Unauthenticated => 401,
            AccessControlError::Forbidden { .. } => 403,
            AccessControlError::NotFound { .. } => 404,
            AccessControlError::Busy { .. } => 503,
            AccessControlError::Io(_) => 500,
            AccessControlError::Serialization(_) => 500,
        }
    }

    /// Whether the caller may retry the same request
    pub fn is_retryable(&self) -> bool {
        match self {
            AccessControlError::Busy { .. } => true,
            AccessControlError::Validation { .. }
            | AccessControlError::NotFound { .. }
            | AccessControlError::Forbidden { .. }
            | AccessControlError::Unauthenticated
            | AccessControlError::DuplicateKey { .. }
            | AccessControlError::Io(_)
            | AccessControlError::Serialization(_) => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            AccessControlError::Validation { .. } => "Validation",
            AccessControlError::NotFound { .. } => "Not Found",
            AccessControlError::Forbidden { .. } => "Forbidden",
            AccessControlError::Unauthenticated => "Unauthenticated",
            AccessControlError::DuplicateKey { .. } => "Duplicate Key",
            AccessControlError::Busy { .. } => "Busy",
            AccessControlError::Io(_) => "IO",
            AccessControlError::Serialization(_) => "Serialization",
        }
    }
}

/// Result type for access control operations
pub type AccessControlResult<T> = Result<T, AccessControlError>;

/// Error body returned to callers of the outer API layer
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Always `true`
    pub error: bool,
    /// HTTP-equivalent status code
    pub status_code: u16,
    /// Fixed message for the status code
    pub message: String,
    /// Error-specific detail
    pub details: String,
}

impl ErrorResponse {
    /// Fixed message for a status code
    pub fn message_for(status_code: u16) -> &'static str {
        match status_code {
            400 => "Validation error",
            401 => "Not authenticated. Valid credentials must be provided.",
            403 => "You do not have permission to perform this action.",
            404 => "Resource not found.",
            503 => "Resource busy, retry the request.",
            _ => "Request error.",
        }
    }
}

impl From<&AccessControlError> for ErrorResponse {
    fn from(error: &AccessControlError) -> Self {
        let status_code = error.status_code();
        Self {
            error: true,
            status_code,
            message: Self::message_for(status_code).to_string(),
            details: error.to_string(),
        }
    }
}

/// Bounded retry policy for retryable failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

impl RetryPolicy {
    /// Create a policy allowing `max_retries` retries
    pub fn retry(max_retries: usize) -> Self {
        Self { max_retries }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self { max_retries: 0 }
    }
}

/// Run `operation`, retrying while it fails with a retryable error.
///
/// Non-retryable errors are returned immediately; once retries are exhausted
/// the last error is returned.
pub fn with_retry<T, F>(policy: RetryPolicy, mut operation: F) -> AccessControlResult<T>
where
    F: FnMut() -> AccessControlResult<T>,
{
    let mut attempt = 0;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                debug!(
                    "Retrying after {} error (attempt {} of {}): {}",
                    error.category(),
                    attempt,
                    policy.max_retries,
                    error
                );
            }
            Err(error) => {
                if error.is_retryable() {
                    warn!("Giving up after {} retries: {}", attempt, error);
                }
                return Err(error);
            }
        }
    }
}
