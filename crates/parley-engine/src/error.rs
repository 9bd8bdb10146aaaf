use thiserror::Error;

/// Failures the negotiation engine can report to callers.
///
/// Utterance analysis itself never fails: empty or unparseable text yields a
/// zeroed signal bundle. Only request-shape validation and session lookups
/// produce errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown id, or a session that has already ended. Both look the same
    /// to callers: the session is gone.
    #[error("session not found")]
    SessionNotFound,
}
