//! HTTP routes.

use axum::{extract::State, routing::{get, post}, Json, Router};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/broadcast", post(broadcast))
        .fallback(not_found)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
struct BroadcastResponse {
    delivered: usize,
}

/// Re-sends an outbound-shaped message verbatim to every connected game.
async fn broadcast(
    State(app): State<Arc<App>>,
    body: String,
) -> Result<Json<BroadcastResponse>, ApiError> {
    let parsed: Value = serde_json::from_str(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e)))?;
    if !parsed.is_object() {
        return Err(ApiError::BadRequest(
            "Broadcast body must be a JSON object".to_string(),
        ));
    }
    let delivered = app.connections.broadcast(body.trim());
    tracing::info!(delivered, "Broadcast manual message");
    Ok(Json(BroadcastResponse { delivered }))
}

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => {
                (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
            }
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{clock::SystemClock, settings::AgentConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use tokio::sync::mpsc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> Arc<App> {
        Arc::new(App::new(AgentConfig::default(), Arc::new(SystemClock::new())))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/broadcast")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = routes()
            .with_state(app())
            .oneshot(Request::get("/api/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn broadcast_forwards_body_verbatim() {
        let app = app();
        let (tx, mut rx) = mpsc::channel(4);
        app.connections.register(Uuid::new_v4(), Utc::now(), tx);

        let response = routes()
            .with_state(app.clone())
            .oneshot(post_json(r#"{"command":"actions/reregister_all"}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body["delivered"], 1);
        assert_eq!(
            rx.recv().await.as_deref(),
            Some(r#"{"command":"actions/reregister_all"}"#)
        );
    }

    #[tokio::test]
    async fn broadcast_rejects_non_objects() {
        for body in ["[1, 2]", "not json"] {
            let response = routes()
                .with_state(app())
                .oneshot(post_json(body))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = routes()
            .with_state(app())
            .oneshot(Request::get("/api/nope").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
