//! Route definitions
//!
//! - `POST /audit` - run the schema audit (admin only)
//! - `GET /health` - liveness plus store reachability
//! - `GET /metrics` - Prometheus scrape endpoint

use axum::{
    extract::State,
    http::HeaderMap,
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;

use super::{request_id_middleware, ApiError, AuditRunResponse, HealthResponse};
use crate::auth::CallerIdentity;
use crate::client::RecordStore;
use crate::engine::SchemaAuditor;
use crate::telemetry::AuditMetricsRegistry;

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    /// The audit engine
    pub auditor: Arc<SchemaAuditor>,
    /// Store handle for the liveness probe
    pub store: Arc<dyn RecordStore>,
    /// Metrics registry backing `/metrics`
    pub metrics: Arc<AuditMetricsRegistry>,
}

impl AppState {
    /// Build state around a store handle with the default rule table
    pub fn new(store: Arc<dyn RecordStore>, metrics: Arc<AuditMetricsRegistry>) -> Self {
        Self {
            auditor: Arc::new(SchemaAuditor::new(store.clone())),
            store,
            metrics,
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/audit", post(run_audit))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}

/// POST /audit - run the schema audit
///
/// The caller identity comes from gateway-injected headers; the engine
/// enforces the admin requirement. Returns the contracted dashboard shape on
/// success, 403 without the admin role, 500 when the run aborts.
pub async fn run_audit(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuditRunResponse>, ApiError> {
    let caller = CallerIdentity::from_headers(&headers);
    let started = Instant::now();

    match state.auditor.run_audit(&caller).await {
        Ok(report) => {
            state
                .metrics
                .audit()
                .record_run(&report, started.elapsed().as_secs_f64());
            Ok(Json(AuditRunResponse::from(&report)))
        }
        Err(err) => {
            if err.is_forbidden() {
                state.metrics.audit().record_forbidden();
            } else {
                state.metrics.audit().record_failure();
                tracing::error!(error = %err, "Audit run aborted");
            }
            Err(ApiError::from(err))
        }
    }
}

/// GET /health - liveness plus store reachability
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_reachable = state.store.health_check().await;
    Json(HealthResponse {
        status: if store_reachable { "healthy" } else { "degraded" }.to_string(),
        store_reachable,
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state.metrics.encode().map_err(|e| ApiError::Internal {
        message: "metrics encoding failed".to_string(),
        detail: e.to_string(),
    })
}
