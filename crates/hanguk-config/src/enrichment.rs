use std::env;

use serde::{Deserialize, Serialize};

fn default_images_enabled() -> bool {
    false
}

fn default_image_model() -> String {
    "gemini-2.0-flash-preview-image-generation".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Image generation is off unless the key's tier supports it
    #[serde(default = "default_images_enabled")]
    pub images_enabled: bool,
    #[serde(default = "default_image_model")]
    pub image_model: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            images_enabled: default_images_enabled(),
            image_model: default_image_model(),
        }
    }
}

impl EnrichmentConfig {
    pub fn new() -> Self {
        let images_enabled = env::var("HANGUK_IMAGES_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_images_enabled);

        Self {
            images_enabled,
            ..Self::default()
        }
    }
}
