use std::env;

use serde::{Deserialize, Serialize};

fn default_prefix() -> String {
    "ek_text_cache_v1_".to_string()
}

/// Roughly what a browser grants local storage
fn default_quota_bytes() -> Option<usize> {
    Some(5 * 1024 * 1024)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CacheConfig {
    /// Namespace prepended to every entry key
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Storage file, platform data dir when unset
    #[serde(default)]
    pub storage_path: Option<String>,
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            storage_path: None,
            quota_bytes: default_quota_bytes(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        let storage_path = env::var("HANGUK_STORAGE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Self {
            storage_path,
            ..Self::default()
        }
    }
}
