//! Caller identity for audit authorization
//!
//! Role derivation is owned by the surrounding platform (API gateway, cron
//! runner); this module only models the identity context handed to the engine
//! and extracts it from gateway-injected request headers. The engine itself
//! performs no authentication, it only fails fast when the context is not an
//! elevated one.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header carrying the authenticated caller subject, injected by the gateway
pub const CALLER_SUBJECT_HEADER: &str = "x-caller-subject";

/// Header carrying the authenticated caller role, injected by the gateway
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

/// Role of the caller invoking an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    /// Elevated administrative role; the only role permitted to run audits
    Admin,
    /// Regular authenticated member
    Member,
    /// No authenticated identity
    Anonymous,
}

impl fmt::Display for CallerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallerRole::Admin => write!(f, "admin"),
            CallerRole::Member => write!(f, "member"),
            CallerRole::Anonymous => write!(f, "anonymous"),
        }
    }
}

impl std::str::FromStr for CallerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(CallerRole::Admin),
            "member" => Ok(CallerRole::Member),
            "anonymous" | "" => Ok(CallerRole::Anonymous),
            other => Err(format!("unknown caller role: {}", other)),
        }
    }
}

/// Identity context under which an audit is invoked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Stable subject identifier (user id, service account, cron job name)
    pub subject: String,
    /// Resolved role
    pub role: CallerRole,
}

impl CallerIdentity {
    /// Create a new identity
    pub fn new(subject: impl Into<String>, role: CallerRole) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    /// Convenience constructor for an admin identity
    pub fn admin(subject: impl Into<String>) -> Self {
        Self::new(subject, CallerRole::Admin)
    }

    /// Whether this identity holds the elevated administrative role
    pub fn is_admin(&self) -> bool {
        self.role == CallerRole::Admin
    }

    /// Extract the identity from gateway-injected headers.
    ///
    /// Unknown or absent role headers resolve to `Anonymous`; the engine
    /// rejects those downstream rather than this extractor guessing.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let subject = headers
            .get(CALLER_SUBJECT_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("anonymous")
            .to_string();

        let role = headers
            .get(CALLER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(CallerRole::Anonymous);

        Self { subject, role }
    }
}
