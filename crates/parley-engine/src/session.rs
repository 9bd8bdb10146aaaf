use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::error::EngineError;
use crate::scorer::ScoreDelta;

pub const DEFAULT_TTL_SECONDS: i64 = 30 * 60;
pub const DEFAULT_LOG_CAP: usize = 20;

fn default_ttl_seconds() -> i64 {
    DEFAULT_TTL_SECONDS
}

fn default_log_cap() -> usize {
    DEFAULT_LOG_CAP
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,
    #[serde(default = "default_log_cap")]
    pub log_cap: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            log_cap: default_log_cap(),
        }
    }
}

/// Lifecycle: `Created` becomes `Active` on the first applied interaction,
/// `Active` self-loops, `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Counterpart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub speaker: Speaker,
    pub text: String,
}

/// Coarse who-is-ahead reading of the scoreboard, for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    CounterpartLeading,
    PlayerLeading,
    InProgress,
}

pub fn standing(score: i32, aid_released: i32) -> Standing {
    if score < 30 && aid_released < 25 {
        Standing::CounterpartLeading
    } else if score > 80 && aid_released > 75 {
        Standing::PlayerLeading
    } else {
        Standing::InProgress
    }
}

/// Point-in-time copy of the scoreboard, safe to hand to the HTTP layer and
/// the prompt renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub score: i32,
    pub aid_released: i32,
    pub concessions: Vec<String>,
    pub standing: Standing,
}

#[derive(Debug)]
pub struct NegotiationSession {
    id: Uuid,
    status: SessionStatus,
    score: i32,
    aid_released: i32,
    concessions: Vec<String>,
    log: VecDeque<Exchange>,
    log_cap: usize,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    ttl_seconds: i64,
}

impl NegotiationSession {
    pub fn new(id: Uuid, config: &SessionConfig) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: SessionStatus::Created,
            score: 0,
            aid_released: 0,
            concessions: Vec::new(),
            log: VecDeque::new(),
            log_cap: config.log_cap,
            created_at: now,
            last_active: now,
            ttl_seconds: config.ttl_seconds,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a scored delta. The full delta accumulates into each running
    /// total before that total is clamped to [0, 100] — totals are stored
    /// clamped, so an overshoot never leaks into the next interaction.
    ///
    /// An ended session is never mutated.
    pub fn apply(&mut self, delta: &ScoreDelta) -> Result<StateSnapshot, EngineError> {
        if self.status == SessionStatus::Ended {
            return Err(EngineError::SessionNotFound);
        }

        self.score = (self.score + delta.score).clamp(0, 100);
        self.aid_released = (self.aid_released + delta.aid).clamp(0, 100);

        for label in &delta.concessions {
            if !self.concessions.iter().any(|c| c == label) {
                self.concessions.push((*label).to_string());
            }
        }

        self.status = SessionStatus::Active;
        self.touch();
        Ok(self.snapshot())
    }

    /// Append one exchange, dropping the oldest entries once the retention
    /// cap is exceeded.
    pub fn append_exchange(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.log.push_back(Exchange {
            speaker,
            text: text.into(),
        });
        while self.log.len() > self.log_cap {
            self.log.pop_front();
        }
    }

    pub fn conversation(&self) -> Vec<Exchange> {
        self.log.iter().cloned().collect()
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            score: self.score,
            aid_released: self.aid_released,
            concessions: self.concessions.clone(),
            standing: standing(self.score, self.aid_released),
        }
    }

    pub fn end(&mut self) {
        self.status = SessionStatus::Ended;
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn is_expired(&self) -> bool {
        let elapsed = Utc::now() - self.last_active;
        elapsed.num_seconds() >= self.ttl_seconds
    }
}
