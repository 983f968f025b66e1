use std::sync::Arc;

use hanguk_core::language::SUPPORTED_LANGUAGES;
use hanguk_types::{AppEvent, UiEvent};
use kanal::{AsyncReceiver, AsyncSender};

use crate::services::Services;
use crate::state::AppState;

pub mod change_language;
pub mod daily_word;
pub mod enrichment;
pub mod search;
pub mod speak;

use change_language::handle_language_change;
use daily_word::handle_daily_word;
use enrichment::handle_enrichment_finished;
use search::{handle_lookup_finished, handle_search};
use speak::handle_speak;

/// App's main loop. Receives UI input and the results of spawned work on
/// the same inbox; returns when the user quits.
pub async fn event_loop(
    state: Arc<AppState>,
    services: Arc<Services>,
    inbox_rx: AsyncReceiver<AppEvent>,
    inbox_tx: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = inbox_rx.recv().await?;

        if matches!(event, AppEvent::UiEvent(UiEvent::Quit)) {
            tracing::info!("[EVENT_LOOP] Quit requested");
            return Ok(());
        }

        tracing::debug!(
            "[EVENT_LOOP] EVENT RECEIVED: {:?}",
            std::mem::discriminant(&event)
        );
        handle_events(state.clone(), services.clone(), &inbox_tx, &app_to_ui_tx, event).await?;
    }
}

pub async fn handle_events(
    state: Arc<AppState>,
    services: Arc<Services>,
    inbox_tx: &AsyncSender<AppEvent>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::UiEvent(UiEvent::Search(query)) => {
            handle_search(state, services, query, false, inbox_tx, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::DailyWord) => {
            handle_daily_word(state, services, inbox_tx, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::ChangeLanguage(language)) => {
            handle_language_change(state, services, language, inbox_tx, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::Speak(text)) => {
            handle_speak(state, services, text, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::ListLanguages) => {
            let selected = state.language.read().await.clone();
            app_to_ui_tx
                .send(AppEvent::ShowLanguages {
                    languages: SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect(),
                    selected,
                })
                .await?;
        }
        AppEvent::UiEvent(UiEvent::Reset) => {
            state.view.lock().await.clear();
            app_to_ui_tx.send(AppEvent::Cleared).await?;
        }
        AppEvent::UiEvent(UiEvent::Quit) => {
            // Handled by the loop
        }
        AppEvent::LookupFinished {
            request,
            query,
            daily,
            outcome,
        } => {
            handle_lookup_finished(state, services, request, query, daily, outcome, inbox_tx, app_to_ui_tx)
                .await?;
        }
        AppEvent::EnrichmentFinished { ticket, images } => {
            handle_enrichment_finished(state, ticket, images, app_to_ui_tx).await?;
        }
        AppEvent::Loading { .. }
        | AppEvent::ShowEntry { .. }
        | AppEvent::EntryUpdated(_)
        | AppEvent::ShowError(_)
        | AppEvent::ShowStatus(_)
        | AppEvent::LanguageChanged(_)
        | AppEvent::ShowLanguages { .. }
        | AppEvent::Cleared => {
            // UI-only event, ignore in backend
        }
    }

    Ok(())
}
