use std::sync::Arc;

use hanguk_types::{AppEvent, DictionaryEntry, LookupFailure, RequestId};
use kanal::AsyncSender;

use crate::events::enrichment::spawn_enrichment;
use crate::services::Services;
use crate::state::AppState;

/// Start a lookup in the background. Its result comes back as `LookupFinished`.
pub async fn handle_search(
    state: Arc<AppState>,
    services: Arc<Services>,
    query: String,
    daily: bool,
    inbox_tx: &AsyncSender<AppEvent>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let query = query.trim().to_string();
    if query.is_empty() {
        return Ok(());
    }

    let language = state.language.read().await.clone();
    let request = state.view.lock().await.begin_request();
    tracing::info!("Lookup #{} for '{}' in {}", request, query, language);

    app_to_ui_tx
        .send(AppEvent::Loading {
            query: (!daily).then(|| query.clone()),
        })
        .await?;

    let inbox_tx = inbox_tx.clone();
    tokio::spawn(async move {
        let outcome = services
            .pipeline
            .lookup(&query, &language)
            .await
            .map_err(|e| e.to_failure());

        let event = AppEvent::LookupFinished {
            request,
            query,
            daily,
            outcome,
        };
        if let Err(e) = inbox_tx.send(event).await {
            tracing::error!("Failed to report lookup #{}: {}", request, e);
        }
    });

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_lookup_finished(
    state: Arc<AppState>,
    services: Arc<Services>,
    request: RequestId,
    query: String,
    daily: bool,
    outcome: Result<DictionaryEntry, LookupFailure>,
    inbox_tx: &AsyncSender<AppEvent>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match outcome {
        Ok(entry) => {
            let ticket = state.view.lock().await.show(request, entry.clone());
            let Some(ticket) = ticket else {
                tracing::debug!("Lookup #{} for '{}' superseded, dropping result", request, query);
                return Ok(());
            };

            app_to_ui_tx.send(AppEvent::ShowEntry { entry: entry.clone(), daily }).await?;

            if services.enricher.is_enabled() {
                spawn_enrichment(services, ticket, entry, inbox_tx.clone());
            }
        }
        Err(failure) => {
            if !state.view.lock().await.fail(request) {
                tracing::debug!("Lookup #{} for '{}' superseded, dropping error", request, query);
                return Ok(());
            }

            tracing::warn!("Lookup for '{}' failed ({:?}): {}", query, failure.kind, failure.message);
            app_to_ui_tx.send(AppEvent::ShowError(failure.message)).await?;
        }
    }

    Ok(())
}
