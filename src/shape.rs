//! Contracts implemented by configuration shapes.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Client construction for shapes that describe a live backend
//!
//! # Design Decisions
//! - Validation is a pure self-check; the loader refuses to return a shape
//!   that fails it
//! - Client construction reports errors through a boxed error so factories
//!   can surface arbitrary client-library failures

use thiserror::Error;

use crate::error::BoxError;

/// A semantic validation failure, scoped to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for '{field}': {message}")]
pub struct ValidationError {
    /// Field (or field path) that failed the check.
    pub field: String,
    /// Why the value was rejected.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for a field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A configuration shape that can check its own business rules.
///
/// The loader runs `validate` after decoding and expansion; a shape that
/// fails is never returned to the caller.
pub trait Validate {
    /// Check the decoded, fully-expanded instance.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A validatable shape that can additionally construct a live client from
/// its fields.
///
/// Implemented by connection-style sections (caches, databases, upstream
/// services); [`Document::get_client`](crate::Document::get_client) composes
/// loading, validation, and construction.
pub trait ClientFactory: Validate {
    /// The connected client type this shape produces.
    type Client;

    /// Build a client from the validated configuration.
    fn create_client(&self) -> Result<Self::Client, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("address", "must not be empty");
        assert_eq!(err.to_string(), "invalid value for 'address': must not be empty");
    }
}
