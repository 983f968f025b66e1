use std::collections::HashMap;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use hanguk_config::Config;
use hanguk_config::speech::SpeechConfig;
use hanguk_core::LookupPipeline;
use hanguk_core::cache::EntryCache;
use hanguk_core::enrichment::{Enricher, EnrichmentError, ImageGenerator};
use hanguk_core::preference::LanguagePreference;
use hanguk_core::session::Session;
use hanguk_core::storage::MemoryStore;
use hanguk_lang_korean::{KoreanPrompter, NativeSpeech};
use hanguk_model::{GenerateRequest, GenerateResponse, ModelClient, ModelError, ProviderMetadata};
use hanguk_types::{AppEvent, DictionaryEntry, DifficultyLevel, ExampleSentence, UiEvent};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::events::event_loop;
use crate::{Cli, run_once};
use crate::services::Services;
use crate::state::AppState;
use crate::ui::parse_command;

/// Answers with an entry for whatever word the prompt asks about
#[derive(Default)]
struct EchoModel {
    delays: HashMap<String, Duration>,
    prompts: Mutex<Vec<String>>,
}

fn prompt_fields(prompt: &str) -> (String, String) {
    let mut lines = prompt.lines();
    let query = lines
        .next()
        .and_then(|l| l.strip_prefix("Input: \""))
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or_default();
    let language = lines
        .next()
        .and_then(|l| l.strip_prefix("Target Language: "))
        .unwrap_or_default();
    (query.to_string(), language.to_string())
}

#[async_trait]
impl ModelClient for EchoModel {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ModelError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let (query, language) = prompt_fields(&request.prompt);

        if let Some(delay) = self.delays.get(&query) {
            tokio::time::sleep(*delay).await;
        }
        if query == "fail" {
            return Err(ModelError::Authentication("API key not valid".to_string()));
        }

        let entry = DictionaryEntry {
            word: query.clone(),
            romanization: "x".to_string(),
            part_of_speech: None,
            definition: format!("{query} in {language}"),
            difficulty_level: DifficultyLevel::Beginner,
            examples: vec![ExampleSentence {
                korean: query.clone(),
                english: "example".to_string(),
                romanization: "x".to_string(),
            }],
            cultural_note: None,
            breakdown: None,
            image_url: None,
            cultural_image_url: None,
        };
        Ok(GenerateResponse::text(serde_json::to_string(&entry).unwrap()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "echo".to_string(),
            requires_api_key: false,
        }
    }
}

/// Slow for prompts mentioning `slow_word`
struct Illustrator {
    slow_word: String,
    delay: Duration,
}

#[async_trait]
impl ImageGenerator for Illustrator {
    async fn generate(&self, prompt: &str) -> Result<String, EnrichmentError> {
        if prompt.contains(&self.slow_word) {
            tokio::time::sleep(self.delay).await;
        }
        Ok(format!("https://img.test/{}", prompt.len()))
    }
}

struct Harness {
    state: Arc<AppState>,
    services: Arc<Services>,
    model: Arc<EchoModel>,
    ui_to_app: AsyncSender<AppEvent>,
    app_to_ui: AsyncReceiver<AppEvent>,
    event_loop: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(model: EchoModel, illustrator: Option<Illustrator>) -> Self {
        let model = Arc::new(model);
        let store = Arc::new(MemoryStore::new());
        let session = Session::new();

        let enricher = match illustrator {
            Some(illustrator) => Enricher::new(Arc::new(illustrator), session.images.clone()),
            None => Enricher::disabled(session.images.clone()),
        };

        let services = Arc::new(Services {
            pipeline: LookupPipeline::new(
                model.clone(),
                Arc::new(KoreanPrompter::new()),
                EntryCache::new(store.clone()),
                vec!["test-model".to_string()],
            ),
            enricher,
            speech: Arc::new(NativeSpeech::new(&SpeechConfig::default())),
            preference: LanguagePreference::new(store, "easy_korean_preference_v1", "한국어 (Korean)"),
        });

        let state = Arc::new(AppState::new(Config::default(), "English".to_string()));
        let (ui_to_app_tx, ui_to_app_rx) = kanal::bounded_async(64);
        let (app_to_ui_tx, app_to_ui_rx) = kanal::bounded_async(64);

        let event_loop = tokio::spawn(event_loop(
            state.clone(),
            services.clone(),
            ui_to_app_rx,
            ui_to_app_tx.clone(),
            app_to_ui_tx,
        ));

        Self {
            state,
            services,
            model,
            ui_to_app: ui_to_app_tx,
            app_to_ui: app_to_ui_rx,
            event_loop,
        }
    }

    async fn send(&self, event: UiEvent) {
        self.ui_to_app
            .send(AppEvent::UiEvent(event))
            .await
            .expect("send failed");
    }

    async fn next(&self) -> AppEvent {
        match timeout(Duration::from_secs(2), self.app_to_ui.recv()).await {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => panic!("Channel error: {}", e),
            Err(_) => panic!("Timeout - event never arrived!"),
        }
    }

    async fn expect_silence(&self, window: Duration) {
        if let Ok(Ok(event)) = timeout(window, self.app_to_ui.recv()).await {
            panic!("Unexpected event: {:?}", event);
        }
    }

    async fn expect_entry(&self, word: &str) -> DictionaryEntry {
        match self.next().await {
            AppEvent::ShowEntry { entry, .. } => {
                assert_eq!(entry.word, word);
                entry
            }
            other => panic!("Expected entry for {word}, got {:?}", other),
        }
    }

    async fn expect_loading(&self) {
        match self.next().await {
            AppEvent::Loading { .. } => {}
            other => panic!("Expected loading, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn search_shows_entry() {
    let harness = Harness::start(EchoModel::default(), None);

    harness.send(UiEvent::Search("안녕".to_string())).await;

    match harness.next().await {
        AppEvent::Loading { query } => assert_eq!(query.as_deref(), Some("안녕")),
        other => panic!("Expected loading, got {:?}", other),
    }
    let entry = harness.expect_entry("안녕").await;
    assert_eq!(entry.definition, "안녕 in English");
}

#[tokio::test]
async fn stale_enrichment_never_touches_newer_entry() {
    let illustrator = Illustrator {
        slow_word: "사랑".to_string(),
        delay: Duration::from_millis(200),
    };
    let harness = Harness::start(EchoModel::default(), Some(illustrator));

    harness.send(UiEvent::Search("사랑".to_string())).await;
    harness.expect_loading().await;
    harness.expect_entry("사랑").await;

    harness.send(UiEvent::Search("행복".to_string())).await;
    harness.expect_loading().await;
    harness.expect_entry("행복").await;

    match harness.next().await {
        AppEvent::EntryUpdated(entry) => {
            assert_eq!(entry.word, "행복");
            assert!(entry.image_url.is_some());
        }
        other => panic!("Expected update for 행복, got {:?}", other),
    }

    // 사랑's illustration lands after this and must be dropped
    harness.expect_silence(Duration::from_millis(400)).await;

    let view = harness.state.view.lock().await;
    let current = view.current().unwrap();
    assert_eq!(current.word, "행복");
    assert!(current.image_url.is_some());
}

#[tokio::test]
async fn late_lookup_result_is_dropped() {
    let model = EchoModel {
        delays: HashMap::from([("사랑".to_string(), Duration::from_millis(200))]),
        ..EchoModel::default()
    };
    let harness = Harness::start(model, None);

    harness.send(UiEvent::Search("사랑".to_string())).await;
    harness.send(UiEvent::Search("행복".to_string())).await;

    harness.expect_loading().await;
    harness.expect_loading().await;
    harness.expect_entry("행복").await;
    harness.expect_silence(Duration::from_millis(400)).await;

    assert_eq!(harness.state.view.lock().await.current().unwrap().word, "행복");
}

#[tokio::test]
async fn language_change_persists_and_researches() {
    let harness = Harness::start(EchoModel::default(), None);

    harness.send(UiEvent::Search("안녕".to_string())).await;
    harness.expect_loading().await;
    harness.expect_entry("안녕").await;

    harness.send(UiEvent::ChangeLanguage("spanish".to_string())).await;

    match harness.next().await {
        AppEvent::LanguageChanged(language) => assert_eq!(language, "Español (Spanish)"),
        other => panic!("Expected language change, got {:?}", other),
    }
    harness.expect_loading().await;
    let entry = harness.expect_entry("안녕").await;
    assert_eq!(entry.definition, "안녕 in Español (Spanish)");

    assert_eq!(harness.services.preference.load().await, "Español (Spanish)");
    assert_eq!(harness.model.prompts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn failed_lookup_shows_single_error() {
    let harness = Harness::start(EchoModel::default(), None);

    harness.send(UiEvent::Search("fail".to_string())).await;
    harness.expect_loading().await;

    match harness.next().await {
        AppEvent::ShowError(message) => {
            assert_eq!(message, "API Key가 잘못되었습니다. (Invalid API Key)");
        }
        other => panic!("Expected error, got {:?}", other),
    }
    assert!(harness.state.view.lock().await.current().is_none());
}

#[tokio::test]
async fn failed_lookup_discards_previous_entry_and_its_illustrations() {
    let illustrator = Illustrator {
        slow_word: "사랑".to_string(),
        delay: Duration::from_millis(200),
    };
    let harness = Harness::start(EchoModel::default(), Some(illustrator));

    harness.send(UiEvent::Search("사랑".to_string())).await;
    harness.expect_loading().await;
    harness.expect_entry("사랑").await;

    harness.send(UiEvent::Search("fail".to_string())).await;
    harness.expect_loading().await;
    assert!(matches!(harness.next().await, AppEvent::ShowError(_)));

    // 사랑's illustration lands after the error and must be dropped
    harness.expect_silence(Duration::from_millis(400)).await;
    assert!(harness.state.view.lock().await.current().is_none());

    harness.send(UiEvent::Speak(None)).await;
    match harness.next().await {
        AppEvent::ShowStatus(status) => assert_eq!(status, "Nothing to pronounce"),
        other => panic!("Expected status, got {:?}", other),
    }
}

#[tokio::test]
async fn typed_command_reaches_the_event_loop() {
    let harness = Harness::start(EchoModel::default(), None);

    let event = parse_command(":lang german").expect("command");
    harness.send(event).await;

    match harness.next().await {
        AppEvent::LanguageChanged(language) => assert_eq!(language, "Deutsch (German)"),
        other => panic!("Expected language change, got {:?}", other),
    }
    assert_eq!(*harness.state.language.read().await, "Deutsch (German)");
}

#[tokio::test]
async fn speak_uses_displayed_headword() {
    let harness = Harness::start(EchoModel::default(), None);

    harness.send(UiEvent::Speak(None)).await;
    match harness.next().await {
        AppEvent::ShowStatus(status) => assert_eq!(status, "Nothing to pronounce"),
        other => panic!("Expected status, got {:?}", other),
    }

    harness.send(UiEvent::Search("사랑".to_string())).await;
    harness.expect_loading().await;
    harness.expect_entry("사랑").await;

    harness.send(UiEvent::Speak(None)).await;
    match harness.next().await {
        AppEvent::ShowStatus(status) => assert!(status.starts_with("Speak '사랑' (ko-KR")),
        other => panic!("Expected status, got {:?}", other),
    }
}

#[tokio::test]
async fn reset_clears_and_quit_stops_the_loop() {
    let harness = Harness::start(EchoModel::default(), None);

    harness.send(UiEvent::Search("사랑".to_string())).await;
    harness.expect_loading().await;
    harness.expect_entry("사랑").await;

    harness.send(UiEvent::Reset).await;
    assert!(matches!(harness.next().await, AppEvent::Cleared));
    assert!(harness.state.view.lock().await.current().is_none());

    harness.send(UiEvent::Quit).await;
    let result = timeout(Duration::from_secs(2), harness.event_loop)
        .await
        .expect("event loop did not stop")
        .expect("event loop panicked");
    assert!(result.is_ok());
}

#[tokio::test]
async fn one_shot_lookup_reports_an_exit_code() {
    let harness = Harness::start(EchoModel::default(), None);

    let found = Cli::parse_from(["hanguk", "안녕"]);
    let code = run_once(&found, &harness.services, "English").await.unwrap();
    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));

    let failed = Cli::parse_from(["hanguk", "fail"]);
    let code = run_once(&failed, &harness.services, "English").await.unwrap();
    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
}
