//! Domain errors for analytics operations
//!
//! This module defines all possible errors that can occur while recording
//! events, updating segments, or resolving offers. These are domain-level
//! errors that abstract away infrastructure details.

use thiserror::Error;

/// Errors that can occur during analytics operations
///
/// These errors represent business-level failures and are independent of
/// infrastructure implementation details (e.g., no sqlx error types here).
///
/// Note that an absent segment record is deliberately NOT an error: store
/// lookups return `Option`, and resolution substitutes the `new_user` default
/// segment instead of surfacing anything to the caller.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The caller-supplied user identifier could not be parsed
    #[error("Unauthorized: user identifier is missing or malformed")]
    Unauthorized,

    /// A persistence or query operation failed
    #[error("Store operation failed: {0}")]
    StoreFailure(String),

    /// An unexpected internal error occurred
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalyticsError {
    /// Create a store failure error with a message
    pub fn store_failure(msg: impl Into<String>) -> Self {
        Self::StoreFailure(msg.into())
    }

    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_error() {
        let err = AnalyticsError::Unauthorized;
        assert_eq!(
            err.to_string(),
            "Unauthorized: user identifier is missing or malformed"
        );
    }

    #[test]
    fn test_store_failure_error() {
        let err = AnalyticsError::store_failure("connection refused");
        assert!(matches!(err, AnalyticsError::StoreFailure(_)));
        assert_eq!(err.to_string(), "Store operation failed: connection refused");
    }

    #[test]
    fn test_internal_error() {
        let err = AnalyticsError::internal("unexpected state");
        assert!(err.to_string().contains("Internal error"));
    }
}
