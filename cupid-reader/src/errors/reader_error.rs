//! Reader error types.
//!
//! Callers map these one-to-one onto responses: validation to a bad
//! request, not-found to a missing resource, anything else to a generic
//! failure whose message never includes the underlying cause.

use cupid_repository::RepositoryError;
use cupid_shared::HotelId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    /// Malformed caller input, rejected before any store or cache call.
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Hotel with ID {0} not found")]
    NotFound(HotelId),

    /// Store failure. The source is kept for logs only.
    #[error("Internal server error")]
    Internal(#[source] RepositoryError),
}

impl ReaderError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_hides_cause() {
        let err = ReaderError::Internal(RepositoryError::InvalidData(
            "password=hunter2".to_string(),
        ));
        assert_eq!(err.to_string(), "Internal server error");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            ReaderError::NotFound(999999).to_string(),
            "Hotel with ID 999999 not found"
        );
    }
}
