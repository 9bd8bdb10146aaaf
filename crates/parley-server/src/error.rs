use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use parley_engine::EngineError;

/// User-visible failures. Upstream vendor errors never appear here: reply
/// generation degrades to a fallback line and avatar errors are logged and
/// dropped.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidInput(msg) => ApiError::Validation(msg),
            EngineError::SessionNotFound => ApiError::NotFound("Session not found".into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_http_statuses() {
        let not_found: ApiError = EngineError::SessionNotFound.into();
        assert!(matches!(not_found, ApiError::NotFound(_)));

        let invalid: ApiError = EngineError::InvalidInput("bad".into()).into();
        assert!(matches!(invalid, ApiError::Validation(_)));
    }
}
