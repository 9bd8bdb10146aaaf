pub mod fallback;
pub mod gemini;
pub mod prompt;

use anyhow::Result;
use async_trait::async_trait;

use parley_engine::{Exchange, StateSnapshot};

pub use fallback::fallback_line;
pub use gemini::GeminiProvider;

/// Everything the counterpart needs to produce its next utterance. The
/// vendor response schema never leaks back out: a reply is just text.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub user_text: String,
    pub state: StateSnapshot,
    pub history: Vec<Exchange>,
}

#[async_trait]
pub trait ReplyProvider: Send + Sync {
    async fn generate_reply(&self, request: &ReplyRequest) -> Result<String>;

    async fn health(&self) -> Result<()> {
        Ok(())
    }
}

/// Keyless provider: serves the canned roster directly, so the demo stays
/// playable without credentials. Also the test double.
pub struct StubProvider;

#[async_trait]
impl ReplyProvider for StubProvider {
    async fn generate_reply(&self, request: &ReplyRequest) -> Result<String> {
        Ok(fallback_line(request.history.len()).to_string())
    }
}
