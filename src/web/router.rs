//! Router configuration for the Filebay API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_file, download_file, get_content, list_files, rename_file, update_content, upload_files,
    view_file, AppState,
};
use super::middleware::{require_api_key, ApiKeyState};

/// Slack added to the transport body limit so multipart framing around a
/// maximum-size file still fits.
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// Create the main API router.
///
/// Read endpoints (listing, download, view) are always open. Mutating
/// endpoints pass through the API key gate, which allows everything when no
/// key is configured (open mode).
pub fn create_router(app_state: Arc<AppState>, api_key_state: Arc<ApiKeyState>) -> Router {
    let body_limit = app_state.store.max_upload_bytes() as usize + BODY_LIMIT_OVERHEAD;

    let read_routes = Router::new()
        .route("/files", get(list_files))
        .route("/files/:name/download", get(download_file))
        .route("/files/:name/view", get(view_file))
        .route("/files/:name/content", get(get_content));

    let write_routes = Router::new()
        .route("/files", post(upload_files))
        .route("/files/:name/content", put(update_content).post(update_content))
        .route("/files/:name/rename", post(rename_file))
        .route("/files/:name", delete(delete_file))
        .layer(middleware::from_fn(move |req, next| {
            let state = api_key_state.clone();
            require_api_key(state, req, next)
        }));

    Router::new()
        .merge(read_routes)
        .merge(write_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
