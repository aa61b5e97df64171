use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::service::output::get_output_handler;
use crate::service::upload::upload_handler;
use crate::utils::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(hello))
        .route("/upload", post(upload_handler))
        .route("/outputs/{session_id}/{filename}", get(get_output_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello World!" }))
}
