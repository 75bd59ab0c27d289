//! External record store access
//!
//! The record store owns both collections the agent touches: the
//! package-configuration records and the append-only health-report history.
//! All access goes through its HTTP API; there is no direct database
//! connection. The engine depends only on the `RecordStore` trait so tests
//! can substitute an in-memory store.

pub mod store;

pub use store::{HttpRecordStore, HttpRecordStoreBuilder, RecordStoreConfig};

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{HealthReport, PackageConfig};

/// Errors from record store round-trips.
///
/// Every variant is fatal for the audit run in progress; the engine performs
/// no retries (re-invoking the whole audit is the retry strategy, the run is
/// idempotent).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport-level failure or server error
    #[error("store request failed: {0}")]
    Http(String),

    /// The record id no longer exists in the store
    #[error("record '{id}' no longer exists in the store")]
    RecordNotFound { id: String },

    /// The store rejected the request (bad payload, auth)
    #[error("store rejected the request: {0}")]
    Rejected(String),

    /// The store responded with a body this client cannot parse
    #[error("malformed store response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// The capabilities the agent consumes from the record store: list the
/// package-configuration collection, partially update one record, and append
/// a health report.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List every package-configuration record. Iteration order is whatever
    /// the store returns; the engine does not reorder.
    async fn list_package_configs(&self) -> Result<Vec<PackageConfig>>;

    /// Apply a partial update to one record and return the updated record.
    /// Fails with `RecordNotFound` if the id is gone.
    async fn update_package_config(
        &self,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<PackageConfig>;

    /// Append a new health report and return it with its store-assigned id
    async fn create_health_report(&self, report: &HealthReport) -> Result<HealthReport>;

    /// Liveness probe for the store; defaults to reachable for stores that
    /// have no transport to fail (in-memory test doubles)
    async fn health_check(&self) -> bool {
        true
    }
}
