//! HTTP routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::client::PhiactaClient;

/// Shared state for HTTP handlers.
#[derive(Debug, Clone)]
pub struct HttpState {
    pub client: Arc<PhiactaClient>,
}

/// Create the HTTP router.
pub fn create_router(client: Arc<PhiactaClient>) -> Router {
    let state = HttpState { client };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/health", get(backend_health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "phiacta",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Proxy the backend health check. Any failure reads as unreachable.
async fn backend_health(State(state): State<HttpState>) -> Response {
    match state.client.backend_health().await {
        Ok(backend) => Json(json!({ "status": "healthy", "backend": backend })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Backend health check failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "status": "unhealthy", "backend": "unreachable" })),
            )
                .into_response()
        }
    }
}
