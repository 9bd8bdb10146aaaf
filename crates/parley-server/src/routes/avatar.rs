//! Avatar access token for the browser client. Creates a standalone avatar
//! session and hands back the narrow connection handle.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/token", get(avatar_token))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarTokenResponse {
    pub session_id: String,
    pub room_name: String,
    pub token: String,
    pub ws_url: String,
}

async fn avatar_token(
    State(state): State<AppState>,
) -> Result<Json<AvatarTokenResponse>, ApiError> {
    let presenter = state
        .presenter
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("Avatar service not configured".into()))?;

    let session = presenter
        .create_session()
        .await
        .map_err(|e| ApiError::Internal(format!("failed to create avatar session: {e:#}")))?;

    Ok(Json(AvatarTokenResponse {
        session_id: session.session_id,
        room_name: session.room_name,
        token: session.token,
        ws_url: session.ws_url,
    }))
}
