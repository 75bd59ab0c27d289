//! Integration tests for the Package Health Agent
//!
//! Exercises the audit end-to-end against a mocked record store API:
//! - listing, patching, and report creation over HTTP
//! - abort semantics when the store fails mid-run
//! - the HTTP handler contract (response shape, 403, request ids)

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use package_health::auth::{CallerIdentity, CALLER_ROLE_HEADER, CALLER_SUBJECT_HEADER};
use package_health::{
    AppState, AuditError, AuditMetricsRegistry, HttpRecordStore, RecordStore, ReportStatus,
    SchemaAuditor, StoreError,
};

/// A record already in the canonical shape; audits touch nothing
fn healthy_record(id: &str) -> Value {
    json!({
        "_id": id,
        "popularPackageIndex": {"onetime": 1, "retainer": 1},
        "activePackages": {"onetime": ["starter"], "retainer": ["starter"]},
        "packageData": {"cards": []},
        "priceStarter": 99,
        "priceGrowth": 199,
        "pricePremium": 399
    })
}

/// Canned store response for report creation: echo with an assigned id
fn stored_report(total: usize, auto_fixed: usize, status: &str) -> Value {
    json!({
        "_id": "report_1",
        "runAt": "2026-08-07T06:00:00Z",
        "totalPackages": total,
        "autoFixed": auto_fixed,
        "needsAttention": 0,
        "fixes": [],
        "issues": [],
        "summary": "canned",
        "status": status
    })
}

#[tokio::test]
async fn test_full_audit_flow_over_http_store() {
    let server = MockServer::start().await;

    let mut legacy = healthy_record("rec_legacy");
    legacy["popularPackageIndex"] = json!(3);

    Mock::given(method("GET"))
        .and(path("/api/v1/package-configs"))
        .and(header("X-Api-Key", "k-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [legacy, healthy_record("rec_ok")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The bare index must come back replicated under both modes
    Mock::given(method("PATCH"))
        .and(path("/api/v1/package-configs/rec_legacy"))
        .and(body_partial_json(json!({
            "popularPackageIndex": {"onetime": 3, "retainer": 3}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(healthy_record("rec_legacy")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/health-reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_report(2, 1, "has_fixes")))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpRecordStore::builder()
        .base_url(server.uri())
        .api_key("k-test")
        .build();
    let auditor = SchemaAuditor::new(Arc::new(store));

    let report = auditor
        .run_audit(&CallerIdentity::admin("integration-test"))
        .await
        .unwrap();

    // The engine returns the persisted report verbatim
    assert_eq!(report.id.as_deref(), Some("report_1"));
    assert_eq!(report.status, ReportStatus::HasFixes);
}

#[tokio::test]
async fn test_vanished_record_aborts_the_run() {
    let server = MockServer::start().await;

    let mut legacy = healthy_record("rec_gone");
    legacy["popularPackageIndex"] = json!(1);

    Mock::given(method("GET"))
        .and(path("/api/v1/package-configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [legacy]})))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/package-configs/rec_gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = HttpRecordStore::new(server.uri());
    let auditor = SchemaAuditor::new(Arc::new(store));

    let err = auditor
        .run_audit(&CallerIdentity::admin("integration-test"))
        .await
        .unwrap_err();

    match err {
        AuditError::Store(StoreError::RecordNotFound { id }) => assert_eq!(id, "rec_gone"),
        other => panic!("expected RecordNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_listing_failure_surfaces_as_store_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/package-configs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;

    let store = HttpRecordStore::new(server.uri());
    let auditor = SchemaAuditor::new(Arc::new(store));

    let err = auditor
        .run_audit(&CallerIdentity::admin("integration-test"))
        .await
        .unwrap_err();

    match err {
        AuditError::Store(StoreError::Http(detail)) => assert!(detail.contains("db down")),
        other => panic!("expected Http store error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_store_liveness_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let store = HttpRecordStore::new(server.uri());
    assert!(store.health_check().await);

    let dead = HttpRecordStore::new("http://127.0.0.1:1");
    assert!(!dead.health_check().await);
}

#[tokio::test]
async fn test_http_handler_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/package-configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/health-reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_report(0, 0, "all_clear")))
        .mount(&server)
        .await;

    let store: Arc<dyn RecordStore> = Arc::new(HttpRecordStore::new(server.uri()));
    let metrics = Arc::new(AuditMetricsRegistry::new().unwrap());
    let app = package_health::create_router(AppState::new(store, metrics));

    // Without the admin role the audit never reaches the store
    let forbidden = app
        .clone()
        .oneshot(
            Request::post("/audit")
                .header(CALLER_SUBJECT_HEADER, "viewer")
                .header(CALLER_ROLE_HEADER, "member")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(
            Request::post("/audit")
                .header(CALLER_SUBJECT_HEADER, "ops")
                .header(CALLER_ROLE_HEADER, "admin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["total_packages"], json!(0));
    assert_eq!(body["auto_fixed"], json!(0));
    assert_eq!(body["needs_attention"], json!(0));
    assert_eq!(body["fixes"], json!([]));
    assert_eq!(body["issues"], json!([]));
    assert!(body["report"].is_string());
}
