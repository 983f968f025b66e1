use std::sync::Arc;
use std::time::Duration;

use hanguk_model::schema::{dictionary_schema, parse_entry};
use hanguk_model::{GenerateRequest, ModelClient, ModelError, ModelId};
use hanguk_types::DictionaryEntry;

use crate::cache::EntryCache;
use crate::error::LookupError;
use crate::prompt::Prompter;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Query used for the word of the day
pub fn daily_word_query(topic: &str) -> String {
    format!("A random useful beginner Korean word or short phrase related to {topic}")
}

/// Cache check, then the model fallback chain, then cache write.
pub struct LookupPipeline {
    client: Arc<dyn ModelClient>,
    prompter: Arc<dyn Prompter>,
    cache: EntryCache,
    models: Vec<ModelId>,
    call_timeout: Duration,
}

impl LookupPipeline {
    pub fn new(
        client: Arc<dyn ModelClient>,
        prompter: Arc<dyn Prompter>,
        cache: EntryCache,
        models: Vec<ModelId>,
    ) -> Self {
        Self {
            client,
            prompter,
            cache,
            models,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn models(&self) -> &[ModelId] {
        &self.models
    }

    pub async fn lookup(
        &self,
        query: &str,
        target_language: &str,
    ) -> Result<DictionaryEntry, LookupError> {
        if query.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        if let Some(entry) = self.cache.get(query, target_language).await {
            return Ok(entry);
        }

        let mut last_error: Option<ModelError> = None;

        // One attempt at a time, never concurrent
        for model in &self.models {
            tracing::info!("Attempting lookup with model: {}", model);

            match self.attempt(model, query, target_language).await {
                Ok(entry) => {
                    self.cache.put(query, target_language, &entry).await;
                    return Ok(entry);
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!("Model {} rejected credentials: {}", model, e);
                    return Err(e.into());
                }
                Err(e) => {
                    tracing::warn!("Model {} failed: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e.into()),
            None => Err(LookupError::Unknown("All models failed.".to_string())),
        }
    }

    pub async fn daily_word(
        &self,
        topic: &str,
        target_language: &str,
    ) -> Result<DictionaryEntry, LookupError> {
        self.lookup(&daily_word_query(topic), target_language).await
    }

    async fn attempt(
        &self,
        model: &str,
        query: &str,
        target_language: &str,
    ) -> Result<DictionaryEntry, ModelError> {
        let prompt = self.prompter.build(query, target_language);
        let request = GenerateRequest::json(
            model,
            prompt.text,
            prompt.system_instruction,
            dictionary_schema(),
        );

        let response = tokio::time::timeout(self.call_timeout, self.client.generate(&request))
            .await
            .map_err(|_| ModelError::Timeout(self.call_timeout))??;

        let text = response
            .text
            .ok_or_else(|| ModelError::MalformedResponse("No response from AI".to_string()))?;

        parse_entry(&text)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use hanguk_model::{ErrorKind, GenerateResponse, OutputModality, ProviderMetadata};
    use hanguk_types::DifficultyLevel;

    use super::*;
    use crate::prompt::Prompt;
    use crate::storage::{KeyValueStore, MemoryStore};

    type Scripted = Result<GenerateResponse, ModelError>;

    /// Answers per model from a queue; unknown models fail with 404
    #[derive(Default)]
    struct ScriptedClient {
        scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
        calls: Mutex<Vec<GenerateRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedClient {
        fn new() -> Self {
            Self::default()
        }

        fn respond(self, model: &str, response: Scripted) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .entry(model.to_string())
                .or_default()
                .push_back(response);
            self
        }

        fn called_models(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|r| r.model.clone()).collect()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ModelError> {
            self.calls.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.scripts
                .lock()
                .unwrap()
                .get_mut(&request.model)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Err(ModelError::ModelNotFound(request.model.clone())))
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "scripted".to_string(),
                requires_api_key: false,
            }
        }
    }

    struct EchoPrompter;

    impl Prompter for EchoPrompter {
        fn build(&self, query: &str, target_language: &str) -> Prompt {
            Prompt {
                text: format!("{query} in {target_language}"),
                system_instruction: format!("Explain in {target_language}"),
            }
        }
    }

    fn entry_json(word: &str) -> String {
        format!(
            r#"{{"word":"{word}","romanization":"annyeong","partOfSpeech":"Interjection","definition":"Hello / bye (casual)","difficultyLevel":"Beginner","examples":[{{"korean":"안녕, 민수야!","english":"Hi, Minsu!","romanization":"annyeong, minsuya!"}}],"culturalNote":"Only for friends and younger people."}}"#
        )
    }

    fn ok(word: &str) -> Scripted {
        Ok(GenerateResponse::text(entry_json(word)))
    }

    const MODELS: [&str; 3] = ["flash", "flash-001", "pro"];

    fn pipeline(client: Arc<ScriptedClient>, store: Arc<MemoryStore>) -> LookupPipeline {
        LookupPipeline::new(
            client,
            Arc::new(EchoPrompter),
            EntryCache::new(store),
            MODELS.iter().map(|m| m.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let client = Arc::new(ScriptedClient::new().respond("flash", ok("안녕")));
        let pipeline = pipeline(client.clone(), Arc::new(MemoryStore::new()));

        let first = pipeline.lookup("Hello", "English").await.unwrap();
        let second = pipeline.lookup("Hello", "English").await.unwrap();

        assert_eq!(client.called_models(), vec!["flash"]);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn cache_key_is_normalized_but_language_specific() {
        let client = Arc::new(
            ScriptedClient::new()
                .respond("flash", ok("안녕"))
                .respond("flash", ok("안녕")),
        );
        let pipeline = pipeline(client.clone(), Arc::new(MemoryStore::new()));

        pipeline.lookup("Hello", "English").await.unwrap();
        pipeline.lookup("  hello  ", "English").await.unwrap();
        assert_eq!(client.called_models().len(), 1);

        pipeline.lookup("Hello", "Korean").await.unwrap();
        assert_eq!(client.called_models().len(), 2);
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let client = Arc::new(
            ScriptedClient::new()
                .respond("flash", ok("안녕"))
                .respond("flash-001", ok("unused")),
        );
        let pipeline = pipeline(client.clone(), Arc::new(MemoryStore::new()));

        let entry = pipeline.lookup("hello", "English").await.unwrap();

        assert_eq!(entry.word, "안녕");
        assert_eq!(client.called_models(), vec!["flash"]);
    }

    #[tokio::test]
    async fn auth_failure_aborts_the_chain() {
        let client = Arc::new(
            ScriptedClient::new()
                .respond(
                    "flash",
                    Err(ModelError::Authentication("API key not valid".to_string())),
                )
                .respond("flash-001", ok("안녕")),
        );
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(client.clone(), store.clone());

        let err = pipeline.lookup("hello", "English").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(client.called_models(), vec!["flash"]);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn exhaustion_reports_the_last_error() {
        let client = Arc::new(
            ScriptedClient::new()
                .respond("flash", Err(ModelError::QuotaExceeded("429".to_string())))
                .respond("flash-001", Err(ModelError::ApiError("500".to_string())))
                .respond("pro", Err(ModelError::ModelNotFound("pro".to_string()))),
        );
        let pipeline = pipeline(client.clone(), Arc::new(MemoryStore::new()));

        let err = pipeline.lookup("hello", "English").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
        assert_eq!(client.called_models(), MODELS.to_vec());
    }

    #[tokio::test]
    async fn quota_on_last_candidate_is_surfaced_as_quota() {
        let client = Arc::new(
            ScriptedClient::new()
                .respond("pro", Err(ModelError::QuotaExceeded("quota".to_string()))),
        );
        let pipeline = pipeline(client, Arc::new(MemoryStore::new()));

        let err = pipeline.lookup("hello", "English").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QuotaExceeded);
        assert_eq!(err.to_string(), "하루 무료 사용량을 초과했습니다. (Quota Exceeded)");
    }

    #[tokio::test]
    async fn malformed_body_falls_through_to_next_model() {
        let client = Arc::new(
            ScriptedClient::new()
                .respond("flash", Ok(GenerateResponse::text(r#"{"word":"안녕"}"#)))
                .respond("flash-001", Ok(GenerateResponse::default()))
                .respond("pro", ok("안녕")),
        );
        let pipeline = pipeline(client.clone(), Arc::new(MemoryStore::new()));

        let entry = pipeline.lookup("hello", "English").await.unwrap();

        assert_eq!(entry.word, "안녕");
        assert_eq!(client.called_models(), MODELS.to_vec());
    }

    #[tokio::test]
    async fn slow_model_times_out_and_chain_continues() {
        let client = Arc::new(ScriptedClient {
            delay: Some(Duration::from_secs(5)),
            ..ScriptedClient::new()
        });
        let pipeline = pipeline(client.clone(), Arc::new(MemoryStore::new()))
            .with_timeout(Duration::from_millis(20));

        let err = pipeline.lookup("hello", "English").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert!(err.to_string().contains("timed out"));
        assert_eq!(client.called_models().len(), MODELS.len());
    }

    #[tokio::test]
    async fn corrupt_cache_record_is_replaced() {
        let client = Arc::new(ScriptedClient::new().respond("flash", ok("안녕")));
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(client.clone(), store.clone());
        let key = "ek_text_cache_v1_English_hello";
        store.set(key, "<<corrupt>>").await.unwrap();

        let entry = pipeline.lookup("Hello", "English").await.unwrap();

        assert_eq!(client.called_models(), vec!["flash"]);
        let stored = store.get(key).await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<DictionaryEntry>(&stored).unwrap(), entry);
    }

    #[tokio::test]
    async fn cache_write_failure_does_not_fail_lookup() {
        let client = Arc::new(ScriptedClient::new().respond("flash", ok("안녕")));
        let store = Arc::new(MemoryStore::with_quota(16));
        let pipeline = pipeline(client, store.clone());

        let entry = pipeline.lookup("hello", "English").await.unwrap();

        assert_eq!(entry.word, "안녕");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn request_carries_prompt_schema_and_system_instruction() {
        let client = Arc::new(ScriptedClient::new().respond("flash", ok("안녕")));
        let pipeline = pipeline(client.clone(), Arc::new(MemoryStore::new()));

        pipeline.lookup("hello", "English").await.unwrap();

        let calls = client.calls.lock().unwrap();
        let request = &calls[0];
        assert_eq!(request.prompt, "hello in English");
        assert_eq!(request.system_instruction.as_deref(), Some("Explain in English"));
        let OutputModality::Json { schema } = &request.output else {
            panic!("expected JSON output");
        };
        assert_eq!(schema["required"][0], "word");
    }

    #[tokio::test]
    async fn empty_query_and_empty_chain() {
        let client = Arc::new(ScriptedClient::new());
        let pipeline = LookupPipeline::new(
            client.clone(),
            Arc::new(EchoPrompter),
            EntryCache::new(Arc::new(MemoryStore::new())),
            vec![],
        );

        assert!(matches!(
            pipeline.lookup("   ", "English").await,
            Err(LookupError::EmptyQuery)
        ));
        assert!(matches!(
            pipeline.lookup("hello", "English").await,
            Err(LookupError::Unknown(msg)) if msg == "All models failed."
        ));
        assert!(client.called_models().is_empty());
    }

    #[tokio::test]
    async fn end_to_end_annyeong() {
        let client = Arc::new(ScriptedClient::new().respond("flash", ok("안녕")));
        let pipeline = pipeline(client, Arc::new(MemoryStore::new()));

        let entry = pipeline.lookup("안녕", "English").await.unwrap();

        assert_eq!(entry.word, "안녕");
        assert!(!entry.romanization.is_empty());
        assert!(!entry.examples.is_empty());
        assert!(DifficultyLevel::ALL.contains(&entry.difficulty_level));
    }

    #[tokio::test]
    async fn daily_word_goes_through_lookup() {
        let client = Arc::new(ScriptedClient::new().respond("flash", ok("날씨")));
        let pipeline = pipeline(client.clone(), Arc::new(MemoryStore::new()));

        let entry = pipeline.daily_word("weather", "English").await.unwrap();

        assert_eq!(entry.word, "날씨");
        let calls = client.calls.lock().unwrap();
        assert!(calls[0].prompt.contains("related to weather"));
    }
}
