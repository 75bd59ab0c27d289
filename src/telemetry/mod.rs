//! Telemetry for the Package Health Agent
//!
//! Prometheus metrics covering audit runs; scraped via the handler's
//! `/metrics` route. Structured logging lives with the code it describes and
//! goes through `tracing`.

pub mod metrics;

pub use metrics::{AuditMetrics, AuditMetricsRegistry};

use thiserror::Error;

/// Errors from metrics registration and encoding
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("metrics registration failed: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("metrics encoding failed: {0}")]
    Encoding(String),
}

/// Result type alias for telemetry operations
pub type Result<T> = std::result::Result<T, MetricsError>;
