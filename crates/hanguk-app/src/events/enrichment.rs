use std::sync::Arc;

use hanguk_types::{AppEvent, DictionaryEntry, EntryImages, ViewTicket};
use kanal::AsyncSender;

use crate::services::Services;
use crate::state::AppState;

/// Illustrate `entry` in the background and report back with its ticket
pub fn spawn_enrichment(
    services: Arc<Services>,
    ticket: ViewTicket,
    entry: DictionaryEntry,
    inbox_tx: AsyncSender<AppEvent>,
) {
    tokio::spawn(async move {
        let images = services.enricher.enrich(&entry).await;
        if images.is_empty() {
            tracing::debug!("No illustrations for '{}'", entry.word);
            return;
        }

        if let Err(e) = inbox_tx.send(AppEvent::EnrichmentFinished { ticket, images }).await {
            tracing::error!("Failed to report enrichment for '{}': {}", entry.word, e);
        }
    });
}

pub async fn handle_enrichment_finished(
    state: Arc<AppState>,
    ticket: ViewTicket,
    images: EntryImages,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let updated = {
        let mut view = state.view.lock().await;
        if view.apply_enrichment(&ticket, images) {
            view.current().cloned()
        } else {
            None
        }
    };

    match updated {
        Some(entry) => app_to_ui_tx.send(AppEvent::EntryUpdated(entry)).await?,
        None => tracing::debug!("Discarding stale illustrations for '{}'", ticket.word),
    }

    Ok(())
}
