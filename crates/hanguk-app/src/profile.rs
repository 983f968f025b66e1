use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use hanguk_config::Config;
use serde::{Deserialize, Serialize};

fn hanguk_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hanguk"))
}

/// `<config dir>/hanguk/config.json`
pub fn default_profile_path() -> Option<PathBuf> {
    hanguk_config_dir().map(|dir| dir.join("config.json"))
}

/// `<data dir>/hanguk/storage.json`, next to the binary when there is no data dir
pub fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("hanguk"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storage.json")
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse profile {}", path.display()))?;

    tracing::info!("Loaded profile '{}' from {}", profile.name, path.display());
    Ok(profile.value)
}

/// An explicit path must load. Otherwise the default profile is used when
/// present, and the environment when it is not.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let config = match explicit {
        Some(path) => read_profile(path)?,
        None => match default_profile_path().filter(|path| path.exists()) {
            Some(path) => read_profile(&path)?,
            None => {
                tracing::debug!("No profile found, configuring from environment");
                Config::new()
            }
        },
    };

    Ok(config.with_env_api_key())
}

/// Write `config` as a named profile at `path`
pub fn save_profile(path: &Path, name: &str, config: &Config) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let profile = Profile {
        name: name.into(),
        value: config.clone(),
    };
    fs::write(path, serde_json::to_string_pretty(&profile)?)?;
    tracing::info!("Saved profile {name} to {}", path.display());
    Ok(())
}
