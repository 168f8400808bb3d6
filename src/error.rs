//! Custom error types for Vestline
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Vestline operations
#[derive(Error, Debug)]
pub enum PortalError {
    /// Malformed or missing input (caller's fault, never retried)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unrecognized configuration values such as an unknown vesting frequency
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A commit to the backing store could not complete
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// Ciphertext or content hash did not verify
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    /// A notification could not be handed to the dispatcher
    #[error("Notification dispatch failed: {0}")]
    NotificationDispatch(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The caller lacks edit capability
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller's role may not read the requested resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Encryption errors other than integrity failures
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl PortalError {
    /// Create a "not found" error for grants
    pub fn grant_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Grant",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for vesting events
    pub fn event_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Vesting event",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for documents
    pub fn document_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Document",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an input validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is an integrity failure
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }
}

impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Vestline operations
pub type PortalResult<T> = Result<T, PortalError>;
