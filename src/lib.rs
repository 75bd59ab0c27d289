//! Package Health Agent
//!
//! An agent that audits package-configuration records for schema drift,
//! repairs legacy shapes in place, and reports what needs a human.
//!
//! The store schema for package configurations has evolved over time: the
//! popular-card index and the per-tier text fields moved from flat shapes to
//! dual-mode `{onetime, retainer}` shapes when retainer billing launched.
//! Records written before that migration still carry the old shapes. The
//! daily audit walks every record, applies safe, idempotent corrections
//! where the fix is unambiguous, and flags records whose data is simply gone
//! (pricing, card payloads) for manual review. Each run appends an immutable
//! `HealthReport` to the store's report history.
//!
//! ## Features
//!
//! - **Rule table**: each schema check is an independent `AuditRule`;
//!   records are evaluated against every rule unconditionally
//! - **Idempotent repair**: fixes are single-field partial updates applied
//!   immediately; re-running after a partial run touches only what remains
//!   non-canonical
//! - **Admin-gated**: the audit fails fast without an elevated identity
//!   context, before any record is read
//! - **HTTP + CLI**: triggerable from the admin dashboard (`POST /audit`)
//!   or from cron (`package-audit run`)
//! - **Telemetry**: Prometheus metrics and structured tracing
//!
//! ## Architecture
//!
//! 1. **Model** (`model`): record and report types, tolerant of legacy
//!    field shapes.
//!
//! 2. **Engine** (`engine`): the `SchemaAuditor` and its rule table.
//!
//! 3. **Client** (`client`): the `RecordStore` trait and the HTTP client
//!    for the external record store. All persistence goes through the
//!    store's API.
//!
//! 4. **Handler** (`handler`): axum routes for triggering audits and
//!    scraping metrics.
//!
//! 5. **CLI** (`cli`): `run` and `serve` commands with table/JSON/YAML
//!    output.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use package_health::{
//!     auth::CallerIdentity,
//!     client::HttpRecordStore,
//!     engine::SchemaAuditor,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = HttpRecordStore::builder()
//!         .base_url("https://records.internal")
//!         .api_key("k-123")
//!         .build();
//!
//!     let auditor = SchemaAuditor::new(Arc::new(store));
//!     let report = auditor
//!         .run_audit(&CallerIdentity::admin("daily-cron"))
//!         .await
//!         .unwrap();
//!
//!     println!("{}", report.summary);
//! }
//! ```

// Core modules
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod model;
pub mod telemetry;

// Re-export commonly used types
pub use auth::{CallerIdentity, CallerRole};
pub use client::{HttpRecordStore, RecordStore, RecordStoreConfig, StoreError};
pub use config::AppConfig;
pub use engine::rules::{AuditRule, BoxedRule, RuleAction};
pub use engine::SchemaAuditor;
pub use error::AuditError;
pub use handler::{create_router, AppState, AuditRunResponse};
pub use model::{HealthReport, Mode, PackageConfig, ReportStatus, Tier};
pub use telemetry::AuditMetricsRegistry;

// Re-export CLI types for the binary
pub use cli::{AuditCli, ExitCode, OutputFormat};

/// Agent version (from Cargo.toml)
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Agent identifier
pub const AGENT_ID: &str = "package-health-agent";

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
pub async fn run_cli(cli: AuditCli) -> ExitCode {
    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from_error(&e)
        }
    }
}
