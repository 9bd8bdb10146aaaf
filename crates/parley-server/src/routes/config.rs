//! Credential presence reporting. Only a boolean and a short masked preview
//! ever leave the process; the secret itself never does.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(config_status))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialReport {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_preview: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStatus {
    pub generative_text: CredentialReport,
    pub avatar: CredentialReport,
}

fn report(key: &Option<String>) -> CredentialReport {
    CredentialReport {
        configured: key.is_some(),
        key_preview: key.as_deref().map(mask_secret),
    }
}

/// First four characters at most, then an ellipsis.
fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "…".to_string()
    } else {
        format!("{prefix}…")
    }
}

async fn config_status(State(state): State<AppState>) -> Json<ConfigStatus> {
    Json(ConfigStatus {
        generative_text: report(&state.keys.generative_text),
        avatar: report(&state.keys.avatar),
    })
}
