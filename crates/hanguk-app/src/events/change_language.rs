use std::sync::Arc;

use hanguk_core::language;
use hanguk_types::AppEvent;
use kanal::AsyncSender;

use crate::events::search::handle_search;
use crate::services::Services;
use crate::state::AppState;

/// Switch the target language, persist it and redo the displayed entry in it
pub async fn handle_language_change(
    state: Arc<AppState>,
    services: Arc<Services>,
    input: String,
    inbox_tx: &AsyncSender<AppEvent>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let selected = language::resolve(&input);
    if selected.is_empty() {
        return Ok(());
    }

    *state.language.write().await = selected.clone();
    if let Err(e) = services.preference.save(&selected).await {
        tracing::warn!("Failed to save language preference: {}", e);
    }
    tracing::info!("Target language: {}", selected);

    app_to_ui_tx.send(AppEvent::LanguageChanged(selected)).await?;

    let current_word = state.view.lock().await.current().map(|entry| entry.word.clone());
    if let Some(word) = current_word {
        handle_search(state, services, word, false, inbox_tx, app_to_ui_tx).await?;
    }

    Ok(())
}
