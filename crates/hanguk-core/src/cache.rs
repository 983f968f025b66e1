use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use hanguk_types::DictionaryEntry;

use crate::storage::KeyValueStore;

pub const DEFAULT_PREFIX: &str = "ek_text_cache_v1_";

/// `prefix + language + "_" + lowercase(trim(query))`
pub fn cache_key(prefix: &str, query: &str, target_language: &str) -> String {
    format!(
        "{prefix}{target_language}_{}",
        query.trim().to_lowercase()
    )
}

/// Persistent cache of dictionary entries.
///
/// Storage failures never leave this type: reads degrade to a miss and
/// writes to a no-op, both logged.
#[derive(Clone)]
pub struct EntryCache {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl EntryCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_prefix(store, DEFAULT_PREFIX)
    }

    pub fn with_prefix(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, query: &str, target_language: &str) -> String {
        cache_key(&self.prefix, query, target_language)
    }

    pub async fn get(&self, query: &str, target_language: &str) -> Option<DictionaryEntry> {
        let key = self.key(query, target_language);

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => {
                tracing::debug!("Cache hit: {}", key);
                Some(entry)
            }
            Err(e) => {
                tracing::warn!("Discarding corrupt cache record {}: {}", key, e);
                if let Err(e) = self.store.remove(&key).await {
                    tracing::warn!("Failed to remove corrupt cache record {}: {}", key, e);
                }
                None
            }
        }
    }

    pub async fn put(&self, query: &str, target_language: &str, entry: &DictionaryEntry) {
        let key = self.key(query, target_language);

        let raw = match serde_json::to_string(entry) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Cache write skipped, entry not serializable: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(&key, &raw).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }
    }
}

/// In-process cache that lives as long as the running session
pub trait SessionCache<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;

    fn put(&self, key: String, value: V);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct InMemorySessionCache<V> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V> InMemorySessionCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> Default for InMemorySessionCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> SessionCache<V> for InMemorySessionCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: String, value: V) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use hanguk_types::{DifficultyLevel, ExampleSentence};

    use super::*;
    use crate::storage::MemoryStore;

    fn entry(word: &str) -> DictionaryEntry {
        DictionaryEntry {
            word: word.to_string(),
            romanization: "annyeong".to_string(),
            part_of_speech: None,
            definition: "hello".to_string(),
            difficulty_level: DifficultyLevel::Beginner,
            examples: vec![ExampleSentence {
                korean: "안녕!".to_string(),
                english: "Hi!".to_string(),
                romanization: "annyeong!".to_string(),
            }],
            cultural_note: None,
            breakdown: None,
            image_url: None,
            cultural_image_url: None,
        }
    }

    #[test]
    fn key_embeds_language_and_normalized_query() {
        assert_eq!(
            cache_key(DEFAULT_PREFIX, "  Hello  ", "English"),
            "ek_text_cache_v1_English_hello"
        );
        assert_eq!(
            cache_key(DEFAULT_PREFIX, "Hello", "English"),
            cache_key(DEFAULT_PREFIX, "  hello  ", "English")
        );
        assert_ne!(
            cache_key(DEFAULT_PREFIX, "Hello", "English"),
            cache_key(DEFAULT_PREFIX, "Hello", "한국어 (Korean)")
        );
    }

    #[tokio::test]
    async fn round_trips_entries() {
        let cache = EntryCache::new(Arc::new(MemoryStore::new()));

        cache.put("안녕", "English", &entry("안녕")).await;

        assert_eq!(cache.get(" 안녕 ", "English").await, Some(entry("안녕")));
        assert_eq!(cache.get("안녕", "Deutsch (German)").await, None);
    }

    #[tokio::test]
    async fn corrupt_record_is_a_miss_and_gets_removed() {
        let store = Arc::new(MemoryStore::new());
        let cache = EntryCache::new(store.clone());
        let key = cache.key("hello", "English");
        store.set(&key, "{not json").await.unwrap();

        assert_eq!(cache.get("hello", "English").await, None);
        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::with_quota(8));
        let cache = EntryCache::new(store.clone());

        cache.put("hello", "English", &entry("안녕")).await;

        assert!(store.is_empty());
        assert_eq!(cache.get("hello", "English").await, None);
    }

    #[test]
    fn session_cache_keeps_values_by_exact_key() {
        let cache: InMemorySessionCache<String> = InMemorySessionCache::new();
        assert!(cache.is_empty());

        cache.put("a cute illustration".to_string(), "data:1".to_string());

        assert_eq!(cache.get("a cute illustration").as_deref(), Some("data:1"));
        assert_eq!(cache.get("a cute illustration ").as_deref(), None);
        assert_eq!(cache.len(), 1);
    }
}
