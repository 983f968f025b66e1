use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "한국어 (Korean)".to_string()
}

fn default_preference_key() -> String {
    "easy_korean_preference_v1".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiConfig {
    /// Target language used until the user picks one
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_preference_key")]
    pub preference_key: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            preference_key: default_preference_key(),
        }
    }
}
