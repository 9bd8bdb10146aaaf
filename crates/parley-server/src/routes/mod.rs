pub mod avatar;
pub mod config;
pub mod sessions;

use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/session", sessions::router())
        .nest("/config", config::router())
        .nest("/avatar", avatar::router())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
