use std::sync::Arc;

use hanguk_core::speech::Pronunciation;
use hanguk_types::AppEvent;
use kanal::AsyncSender;

use crate::services::Services;
use crate::state::AppState;

/// Pronounce `text`, or the displayed headword when none is given
pub async fn handle_speak(
    state: Arc<AppState>,
    services: Arc<Services>,
    text: Option<String>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let text = match text.filter(|t| !t.trim().is_empty()) {
        Some(text) => text,
        None => match state.view.lock().await.current() {
            Some(entry) => entry.word.clone(),
            None => {
                app_to_ui_tx
                    .send(AppEvent::ShowStatus("Nothing to pronounce".to_string()))
                    .await?;
                return Ok(());
            }
        },
    };

    let app_to_ui_tx = app_to_ui_tx.clone();
    tokio::spawn(async move {
        let event = match services.speech.pronounce(&text).await {
            Ok(pronunciation) => AppEvent::ShowStatus(describe(&text, &pronunciation)),
            Err(e) => {
                tracing::warn!("Pronunciation of '{}' failed: {}", text, e);
                AppEvent::ShowError(format!("Pronunciation failed: {e}"))
            }
        };

        if let Err(e) = app_to_ui_tx.send(event).await {
            tracing::error!("Failed to report pronunciation: {}", e);
        }
    });

    Ok(())
}

pub fn describe(text: &str, pronunciation: &Pronunciation) -> String {
    match pronunciation {
        Pronunciation::Utterance(utterance) => format!(
            "Speak '{}' ({}, rate {})",
            utterance.text, utterance.lang, utterance.rate
        ),
        Pronunciation::Buffer(buffer) => format!(
            "Synthesized '{}': {:.2}s of audio at {} Hz",
            text,
            buffer.duration().as_secs_f64(),
            buffer.sample_rate
        ),
        Pronunciation::Url(url) => format!("Audio for '{}': {}", text, url),
    }
}
