use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::enrichment::EnrichmentConfig;
use self::model::ModelConfig;
use self::speech::SpeechConfig;
use self::ui::UiConfig;

pub mod cache;
pub mod enrichment;
pub mod model;
pub mod speech;
pub mod ui;

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub cache: CacheConfig,
    pub enrichment: EnrichmentConfig,
    pub speech: SpeechConfig,
    pub ui: UiConfig,

    /// Upper bound for every outbound model call
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            cache: CacheConfig::default(),
            enrichment: EnrichmentConfig::default(),
            speech: SpeechConfig::default(),
            ui: UiConfig::default(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let timeout_seconds = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30); // 30 seconds default

        Config {
            model: ModelConfig::new(),
            cache: CacheConfig::new(),
            enrichment: EnrichmentConfig::new(),
            speech: SpeechConfig::new(),
            ui: UiConfig::default(),

            timeout_seconds,
        }
    }

    /// Fill an empty API key from the environment. Profiles usually leave it out.
    pub fn with_env_api_key(mut self) -> Self {
        if self.model.api_key.trim().is_empty() {
            if let Some(key) = model::api_key_from_env() {
                self.model.api_key = key;
            }
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}
