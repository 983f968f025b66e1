use std::sync::Arc;

use hanguk_core::pipeline::daily_word_query;
use hanguk_lang_korean::random_topic;
use hanguk_types::AppEvent;
use kanal::AsyncSender;

use crate::events::search::handle_search;
use crate::services::Services;
use crate::state::AppState;

pub async fn handle_daily_word(
    state: Arc<AppState>,
    services: Arc<Services>,
    inbox_tx: &AsyncSender<AppEvent>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let topic = random_topic();
    tracing::info!("Word of the day, topic: {}", topic);

    handle_search(state, services, daily_word_query(topic), true, inbox_tx, app_to_ui_tx).await
}
