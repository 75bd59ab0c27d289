//! HTTP surface for the Package Health Agent
//!
//! One externally triggerable operation (`POST /audit`) plus liveness and
//! metrics endpoints. The audit response body is the exact shape consumed by
//! the admin dashboard; errors carry a message and, for internal failures,
//! diagnostic detail.

pub mod middleware;
pub mod routes;

pub use middleware::request_id_middleware;
pub use routes::{create_router, AppState};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::model::HealthReport;

/// Body of a successful `POST /audit` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRunResponse {
    /// Number of records scanned
    pub total_packages: usize,
    /// Number of records that received at least one automatic fix
    pub auto_fixed: usize,
    /// Number of flagged issues requiring manual review
    pub needs_attention: usize,
    /// One line per applied fix
    pub fixes: Vec<String>,
    /// One line per flagged issue
    pub issues: Vec<String>,
    /// Rendered human-readable summary
    pub report: String,
}

impl From<&HealthReport> for AuditRunResponse {
    fn from(report: &HealthReport) -> Self {
        Self {
            total_packages: report.total_packages,
            auto_fixed: report.auto_fixed,
            needs_attention: report.needs_attention,
            fixes: report.fixes.clone(),
            issues: report.issues.clone(),
            report: report.summary.clone(),
        }
    }
}

/// Error body returned on failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
    /// Diagnostic detail, present on internal failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// API error types with their HTTP mappings
#[derive(Debug)]
pub enum ApiError {
    /// Caller lacks the admin role
    Forbidden(String),
    /// Audit aborted by an internal failure
    Internal { message: String, detail: String },
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        match &err {
            AuditError::Forbidden { .. } => ApiError::Forbidden(err.to_string()),
            _ => ApiError::Internal {
                message: "package health audit failed".to_string(),
                detail: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Forbidden(message) => ErrorBody {
                error: message,
                detail: None,
            },
            ApiError::Internal { message, detail } => ErrorBody {
                error: message,
                detail: Some(detail),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Liveness response for `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` when the store is reachable, `degraded` otherwise
    pub status: String,
    /// Whether the record store answered its liveness probe
    pub store_reachable: bool,
    /// Timestamp of the probe (ISO 8601)
    pub timestamp: String,
    /// Agent version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CallerRole;
    use chrono::Utc;

    #[test]
    fn test_audit_response_from_report() {
        let report = HealthReport::from_run(
            Utc::now(),
            3,
            1,
            vec!["fixed one".to_string()],
            vec!["issue one".to_string(), "issue two".to_string()],
        );
        let response = AuditRunResponse::from(&report);
        assert_eq!(response.total_packages, 3);
        assert_eq!(response.auto_fixed, 1);
        assert_eq!(response.needs_attention, 2);
        assert_eq!(response.report, report.summary);
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let err: ApiError = AuditError::Forbidden {
            subject: "nobody".to_string(),
            role: CallerRole::Anonymous,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_store_error_maps_to_500_with_detail() {
        let err: ApiError =
            AuditError::from(crate::client::StoreError::Http("boom".to_string())).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        match err {
            ApiError::Internal { detail, .. } => assert!(detail.contains("boom")),
            other => panic!("expected internal error, got {:?}", other),
        }
    }
}
