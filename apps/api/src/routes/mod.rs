pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/template", get(handlers::handle_template))
        .route("/generate", post(handlers::handle_generate))
        .route("/generate-preview", post(handlers::handle_preview))
        .route(
            "/download/:file_id/:file_type",
            get(handlers::handle_download),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
