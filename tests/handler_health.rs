mod common;

use async_trait::async_trait;
use axum::{Router, routing::get};
use axum_test::TestServer;
use offer_portal::api::handlers::health_handler;
use offer_portal::infrastructure::document::{DocumentRenderer, DocumentResult, ImageAnchor};
use offer_portal::state::AppState;
use std::collections::BTreeMap;
use std::sync::Arc;

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Renderer whose template never loaded.
struct UnloadedRenderer;

#[async_trait]
impl DocumentRenderer for UnloadedRenderer {
    async fn render(&self, _fields: &BTreeMap<String, String>) -> DocumentResult<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn embed_image(
        &self,
        document: &[u8],
        _png: &[u8],
        _anchor: ImageAnchor,
    ) -> DocumentResult<Vec<u8>> {
        Ok(document.to_vec())
    }

    fn is_ready(&self) -> bool {
        false
    }
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let ctx = common::create_test_context();
    let server = TestServer::new(app(ctx.state.clone())).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
    assert_eq!(json["checks"]["storage"]["message"], "csv reachable");
    assert_eq!(json["checks"]["template"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = common::create_test_context();
    let server = TestServer::new(app(ctx.state.clone())).unwrap();

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("storage").is_some());
    assert!(json["checks"].get("template").is_some());
}

#[tokio::test]
async fn test_health_degraded_without_template() {
    let ctx = common::create_context_from(
        tempfile::tempdir().unwrap(),
        Arc::new(UnloadedRenderer),
        common::FakeConverter::default(),
        common::RecordingMailer::default(),
    );
    let server = TestServer::new(app(ctx.state.clone())).unwrap();

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["template"]["status"], "error");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_storage_dir_missing() {
    let ctx = common::create_test_context();
    std::fs::remove_dir_all(ctx.dir.path()).unwrap();
    let server = TestServer::new(app(ctx.state.clone())).unwrap();

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["storage"]["status"], "error");
    assert_eq!(json["checks"]["storage"]["message"], "csv unreachable");
}
