//! Streaming-avatar vendor REST adapter.
//!
//! Session lifecycle: `streaming/room/initialize` opens a room,
//! `streaming/video/task` makes the avatar speak, `streaming/room/close`
//! tears it down.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{AvatarPresenter, AvatarSession};

const AVATAR_API_BASE: &str = "https://api.heygen.com/v1";
const DEFAULT_AVATAR_ID: &str = "trump_45";
const DEFAULT_VOICE_ID: &str = "en-US-TRUMP";

#[derive(Debug, Clone)]
pub struct StreamingAvatarClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    avatar_id: String,
    voice_id: String,
}

impl StreamingAvatarClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: AVATAR_API_BASE.to_string(),
            avatar_id: DEFAULT_AVATAR_ID.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_avatar(mut self, avatar_id: impl Into<String>, voice_id: impl Into<String>) -> Self {
        self.avatar_id = avatar_id.into();
        self.voice_id = voice_id.into();
        self
    }

    async fn post<T: Serialize>(&self, path: &str, payload: &T) -> Result<reqwest::Response> {
        let resp = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .header("content-type", "application/json")
            .header("x-api-key", &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| anyhow!("avatar api error (send): {e}"))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("avatar api error ({status}): {text}"));
        }
        Ok(resp)
    }
}

#[async_trait]
impl AvatarPresenter for StreamingAvatarClient {
    async fn create_session(&self) -> Result<AvatarSession> {
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let payload = InitializeRequest {
            avatar_id: self.avatar_id.clone(),
            room_name: format!("parley-{nonce}"),
        };
        let resp = self.post("streaming/room/initialize", &payload).await?;
        let body: Envelope<InitializeData> = resp.json().await?;

        Ok(AvatarSession {
            session_id: body.data.session_id,
            room_name: body.data.room_name,
            token: body.data.token,
            ws_url: body.data.ws_url,
        })
    }

    async fn speak(&self, session_id: &str, text: &str) -> Result<()> {
        let payload = SpeakRequest {
            session_id: session_id.to_string(),
            text: text.to_string(),
            voice_id: self.voice_id.clone(),
            subtitle: false,
        };
        let resp = self.post("streaming/video/task", &payload).await?;
        let _body: Envelope<SpeakData> = resp.json().await?;
        Ok(())
    }

    async fn end_session(&self, session_id: &str) -> Result<bool> {
        let payload = CloseRequest {
            session_id: session_id.to_string(),
        };
        match self.post("streaming/room/close", &payload).await {
            Ok(_) => Ok(true),
            // The vendor rejects unknown sessions with 400; treat a session
            // that is already gone as ended.
            Err(e) if e.to_string().contains("(400") => Ok(true),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct InitializeRequest {
    avatar_id: String,
    room_name: String,
}

#[derive(Debug, Serialize)]
struct SpeakRequest {
    session_id: String,
    text: String,
    voice_id: String,
    subtitle: bool,
}

#[derive(Debug, Serialize)]
struct CloseRequest {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    session_id: String,
    room_name: String,
    token: String,
    ws_url: String,
}

#[derive(Debug, Deserialize)]
struct SpeakData {
    #[allow(dead_code)]
    task_id: Option<String>,
}
