use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use dcv_service::FsDicomService;
use tower_http::trace::TraceLayer;

use crate::auth::{require_identity, AuthProvider};
use crate::handler;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FsDicomService>,
    pub auth: Arc<dyn AuthProvider>,
}

/// Build the axum router with all vault endpoints.
///
/// `/health` is open; every other route requires a known token.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let protected = Router::new()
        .route("/upload", post(handler::upload))
        .route("/attribute", get(handler::attribute))
        .route("/convert", get(handler::convert))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_identity));

    Router::new()
        .route("/health", get(handler::health))
        .merge(protected)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
