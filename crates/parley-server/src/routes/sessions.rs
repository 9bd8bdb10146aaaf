//! Session endpoints and the interaction sequence: extract → score → apply
//! → generate reply (fallback on failure) → append → present via avatar
//! (fire-and-forget).

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_engine::{extract, Exchange, Speaker, StateSnapshot};
use parley_provider::{fallback::OPENING_LINE, fallback_line, ReplyRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_session))
        .route("/{id}/interact", post(interact))
        .route("/{id}/conversation", get(get_conversation))
        .route("/{id}/end", post(end_session))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub session_id: String,
    pub initial: String,
    pub state: StateSnapshot,
}

#[derive(Deserialize)]
pub struct InteractRequest {
    #[serde(default)]
    text: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractResponse {
    pub ai_response: String,
    pub state: StateSnapshot,
    pub score_change: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation: Vec<Exchange>,
    pub state: StateSnapshot,
}

#[derive(Serialize)]
pub struct EndResponse {
    pub success: bool,
}

/// Unknown-looking ids (including unparseable ones) read as "no such
/// session", never as a validation failure.
fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Session not found".into()))
}

async fn start_session(State(state): State<AppState>) -> Result<Json<StartResponse>, ApiError> {
    let (id, handle) = state.store.create().await;
    handle
        .lock()
        .await
        .append_exchange(Speaker::Counterpart, OPENING_LINE);

    // Avatar session creation is best-effort; the negotiation starts either way.
    if let Some(presenter) = &state.presenter {
        match presenter.create_session().await {
            Ok(avatar) => {
                state
                    .avatar_sessions
                    .write()
                    .await
                    .insert(id, avatar.session_id);
            }
            Err(e) => tracing::warn!("avatar session creation failed: {e:#}"),
        }
    }

    let snapshot = handle.lock().await.snapshot();
    tracing::info!(session_id = %id, "session started");
    Ok(Json(StartResponse {
        session_id: id.to_string(),
        initial: OPENING_LINE.to_string(),
        state: snapshot,
    }))
}

async fn interact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InteractRequest>,
) -> Result<Json<InteractResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let text = match req.text.as_ref().and_then(|v| v.as_str()) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => {
            return Err(ApiError::Validation(
                "text must be a non-empty string".into(),
            ))
        }
    };

    let handle = state.store.get(id).await?;

    // The session mutex stays held across the reply call: interactions on
    // one session are strictly serialized.
    let mut session = handle.lock().await;

    let bundle = extract(&text);
    let delta = state.scorer.score(&bundle);

    let history = session.conversation();
    let snapshot = session.apply(&delta)?;
    session.append_exchange(Speaker::User, text.as_str());

    let request = ReplyRequest {
        user_text: text,
        state: snapshot.clone(),
        history,
    };
    let reply = match state.replies.generate_reply(&request).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(session_id = %id, "reply generation failed, using fallback: {e:#}");
            fallback_line(session.log_len()).to_string()
        }
    };
    session.append_exchange(Speaker::Counterpart, reply.as_str());
    drop(session);

    if let Some(presenter) = state.presenter.clone() {
        if let Some(avatar_id) = state.avatar_sessions.read().await.get(&id).cloned() {
            let spoken = reply.clone();
            tokio::spawn(async move {
                if let Err(e) = presenter.speak(&avatar_id, &spoken).await {
                    tracing::warn!("avatar speech failed: {e:#}");
                }
            });
        }
    }

    Ok(Json(InteractResponse {
        ai_response: reply,
        state: snapshot,
        score_change: delta.score,
    }))
}

async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let handle = state.store.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(ConversationResponse {
        conversation: session.conversation(),
        state: session.snapshot(),
    }))
}

/// Idempotent: ending an unknown or already-ended session reports success.
async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<EndResponse> {
    if let Ok(id) = Uuid::parse_str(&id) {
        let existed = state.store.end(id).await;
        if existed {
            tracing::info!(session_id = %id, "session ended");
        }
        if let Some(avatar_id) = state.avatar_sessions.write().await.remove(&id) {
            if let Some(presenter) = &state.presenter {
                if let Err(e) = presenter.end_session(&avatar_id).await {
                    tracing::warn!("avatar session teardown failed: {e:#}");
                }
            }
        }
    }
    Json(EndResponse { success: true })
}
