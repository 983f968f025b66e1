use std::sync::Arc;

use crate::storage::{KeyValueStore, StorageError};

/// The persisted target-language choice
#[derive(Clone)]
pub struct LanguagePreference {
    store: Arc<dyn KeyValueStore>,
    key: String,
    default_language: String,
}

impl LanguagePreference {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            default_language: default_language.into(),
        }
    }

    /// Read once at startup. The default is written back on first run.
    pub async fn load(&self) -> String {
        match self.store.get(&self.key).await {
            Ok(Some(language)) if !language.trim().is_empty() => return language,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to read language preference: {}", e);
                return self.default_language.clone();
            }
        }

        if let Err(e) = self.store.set(&self.key, &self.default_language).await {
            tracing::warn!("Failed to store default language preference: {}", e);
        }
        self.default_language.clone()
    }

    pub async fn save(&self, language: &str) -> Result<(), StorageError> {
        self.store.set(&self.key, language).await
    }
}
