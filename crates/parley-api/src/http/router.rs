//! Axum router configuration with middleware.
//!
//! Routes: `/api/history`, `/api/chat` and `/health`.
//! Middleware: CORS (any origin, method, header) and request tracing.
//!
//! When a web directory is given and exists, the built frontend is served
//! from it. API routes take priority; unknown paths fall through to its
//! `index.html`.

use std::path::Path;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState, web_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/history", get(handlers::history::get_history))
        .route("/chat", post(handlers::chat::send_message));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match web_dir {
        Some(dir) if dir.is_dir() => {
            let serve_dir = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            router = router.fallback_service(serve_dir);
            tracing::info!(path = %dir.display(), "Static file serving enabled");
        }
        Some(dir) => {
            tracing::warn!(path = %dir.display(), "Web directory not found, serving API only");
        }
        None => {}
    }

    router
}

/// GET /health - liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    use crate::state::testing::replying;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn(build_router(replying("hi"), None)).await;
        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_chat_then_history_over_http() {
        let base = spawn(build_router(replying("Hello from the model"), None)).await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/api/chat"))
            .json(&serde_json::json!({"text": "hello"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["reply"]["text"], "Hello from the model");

        let history: Value = client
            .get(format!("{base}/api/history"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(history["messages"], body["messages"]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let base = spawn(build_router(replying("unused"), None)).await;
        let client = reqwest::Client::new();

        for raw in ["", "{not json", r#"{"text": 42}"#, "{}"] {
            let resp = client
                .post(format!("{base}/api/chat"))
                .header("content-type", "application/json")
                .body(raw)
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 400, "body {raw:?}");
            let body: Value = resp.json().await.unwrap();
            assert_eq!(body["error"], "Message text is required");
        }
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let base = spawn(build_router(replying("hi"), None)).await;
        let resp = reqwest::Client::new()
            .get(format!("{base}/api/history"))
            .header("origin", "http://localhost:5173")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_static_fallback_to_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>parley</h1>").unwrap();

        let base = spawn(build_router(replying("hi"), Some(dir.path()))).await;

        let page = reqwest::get(format!("{base}/some/client/route"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(page, "<h1>parley</h1>");

        let api = reqwest::get(format!("{base}/api/history")).await.unwrap();
        assert_eq!(api.status(), 200);
    }
}
