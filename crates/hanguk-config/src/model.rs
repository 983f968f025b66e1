use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Cheapest and most available first
fn default_models() -> Vec<String> {
    vec![
        "gemini-1.5-flash".to_string(),
        "gemini-1.5-flash-001".to_string(),
        "gemini-1.5-pro".to_string(),
        "gemini-1.0-pro".to_string(),
    ]
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ModelConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Fallback chain, tried in order
    #[serde(default = "default_models")]
    pub models: Vec<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            models: default_models(),
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        let api_key = api_key_from_env().unwrap_or_default();

        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| default_api_url());

        let models = env::var("HANGUK_MODELS")
            .ok()
            .map(|v| parse_model_list(&v))
            .filter(|models| !models.is_empty())
            .unwrap_or_else(default_models);

        Self {
            api_key,
            api_url,
            models,
        }
    }
}

/// First non-empty of the supported key variables
pub fn api_key_from_env() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY", "VITE_API_KEY"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Comma separated model identifiers, blanks dropped
pub fn parse_model_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}
