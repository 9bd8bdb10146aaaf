use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use parley_engine::{ScoreWeights, SessionConfig};

fn default_bind() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_sweep_interval_secs() -> u64 {
    10 * 60
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

/// Server configuration, read from `parley.yaml`. Every field has a
/// default; a missing file means defaults across the board. Vendor API keys
/// come from the environment, never from this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            session: SessionConfig::default(),
            weights: ScoreWeights::default(),
            sweep_interval_secs: default_sweep_interval_secs(),
            gemini_model: default_gemini_model(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
