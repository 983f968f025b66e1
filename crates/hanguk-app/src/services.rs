use std::path::PathBuf;
use std::sync::Arc;

use hanguk_config::Config;
use hanguk_core::LookupPipeline;
use hanguk_core::cache::EntryCache;
use hanguk_core::enrichment::Enricher;
use hanguk_core::preference::LanguagePreference;
use hanguk_core::session::Session;
use hanguk_core::speech::SpeechProvider;
use hanguk_core::storage::{FileStore, KeyValueStore, MemoryStore};
use hanguk_lang_korean::speech::speech_provider;
use hanguk_lang_korean::{GeminiClient, GeminiImageGenerator, KoreanPrompter};
use hanguk_model::ModelClient;

use crate::profile::default_storage_path;

/// Everything the event handlers call into
pub struct Services {
    pub pipeline: LookupPipeline,
    pub enricher: Enricher,
    pub speech: Arc<dyn SpeechProvider>,
    pub preference: LanguagePreference,
}

impl Services {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = open_store(config).await;
        let session = Session::new();

        let client: Arc<dyn ModelClient> = Arc::new(GeminiClient::with_timeout(
            config.model.api_key.clone(),
            config.model.api_url.clone(),
            config.timeout(),
        )?);

        let provider = client.metadata();
        tracing::info!("Model provider: {}", provider.name);
        if provider.requires_api_key && config.model.api_key.is_empty() {
            tracing::warn!("No API key configured, lookups will fail until GEMINI_API_KEY is set");
        }

        let pipeline = LookupPipeline::new(
            client.clone(),
            Arc::new(KoreanPrompter::new()),
            EntryCache::with_prefix(store.clone(), config.cache.prefix.clone()),
            config.model.models.clone(),
        )
        .with_timeout(config.timeout());
        tracing::info!("Model chain: {}", pipeline.models().join(" -> "));

        let enricher = if config.enrichment.images_enabled {
            let generator = GeminiImageGenerator::new(client.clone(), config.enrichment.image_model.clone());
            Enricher::new(Arc::new(generator), session.images.clone())
        } else {
            Enricher::disabled(session.images.clone())
        };

        let speech = speech_provider(&config.speech, client, session.audio.clone());
        tracing::info!("Speech provider: {}", speech.name());

        let preference = LanguagePreference::new(
            store,
            config.ui.preference_key.clone(),
            config.ui.default_language.clone(),
        );

        Ok(Self {
            pipeline,
            enricher,
            speech,
            preference,
        })
    }
}

/// The file store, or a session store when the file cannot be opened
async fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
    let path = config
        .cache
        .storage_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_storage_path);

    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            tracing::warn!("Failed to create storage directory {}: {}", parent.display(), e);
        }
    }

    match FileStore::open(&path, config.cache.quota_bytes).await {
        Ok(store) => {
            tracing::info!("Using storage file {}", path.display());
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Storage unavailable ({}), cache will not persist", e);
            Arc::new(MemoryStore::new())
        }
    }
}
