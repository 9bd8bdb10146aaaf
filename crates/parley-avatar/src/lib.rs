//! Talking-avatar collaborator.
//!
//! Entirely best-effort from the negotiation's point of view: callers log
//! failures and move on, and nothing here ever blocks or fails an
//! interaction.

pub mod streaming;

use anyhow::Result;
use async_trait::async_trait;

pub use streaming::StreamingAvatarClient;

/// Narrow handle for one live avatar session. The vendor response schema
/// stays inside the adapter.
#[derive(Debug, Clone)]
pub struct AvatarSession {
    pub session_id: String,
    pub room_name: String,
    pub token: String,
    pub ws_url: String,
}

#[async_trait]
pub trait AvatarPresenter: Send + Sync {
    async fn create_session(&self) -> Result<AvatarSession>;

    async fn speak(&self, session_id: &str, text: &str) -> Result<()>;

    /// Ending a session the vendor no longer knows about reports success.
    async fn end_session(&self, session_id: &str) -> Result<bool>;
}

/// Presenter used in tests and when no avatar credentials are configured.
pub struct NoopPresenter;

#[async_trait]
impl AvatarPresenter for NoopPresenter {
    async fn create_session(&self) -> Result<AvatarSession> {
        Ok(AvatarSession {
            session_id: "noop-session".into(),
            room_name: "noop-room".into(),
            token: "noop-token".into(),
            ws_url: "wss://localhost/noop".into(),
        })
    }

    async fn speak(&self, _session_id: &str, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn end_session(&self, _session_id: &str) -> Result<bool> {
        Ok(true)
    }
}
