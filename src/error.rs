//! Error types for the Package Health Agent
//!
//! Authorization and store failures are fatal for an audit run and surface to
//! the caller. Data-quality problems are never errors: they become issue
//! entries in the report (see `engine::rules`).

use thiserror::Error;

use crate::auth::CallerRole;
use crate::client::StoreError;

/// Main error type for audit operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Caller lacks the elevated administrative role
    #[error("forbidden: caller '{subject}' has role '{role}', admin required")]
    Forbidden { subject: String, role: CallerRole },

    /// Listing or updating records failed; the run is aborted.
    /// Fixes already applied remain in effect.
    #[error("record store failure: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration (bad store URL, unreadable config file)
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuditError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AuditError::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AuditError::Internal(msg.into())
    }

    /// Check if this error is an authorization failure
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuditError::Forbidden { .. })
    }
}

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_display() {
        let err = AuditError::Forbidden {
            subject: "cron-job".to_string(),
            role: CallerRole::Member,
        };
        let msg = err.to_string();
        assert!(msg.contains("cron-job"));
        assert!(msg.contains("member"));
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_store_error_conversion() {
        let err: AuditError = StoreError::Http("connection refused".to_string()).into();
        assert!(matches!(err, AuditError::Store(_)));
        assert!(!err.is_forbidden());
    }

    #[test]
    fn test_config_constructor() {
        let err = AuditError::config("missing store URL");
        assert!(matches!(err, AuditError::Config(_)));
        assert_eq!(err.to_string(), "configuration error: missing store URL");
    }
}
