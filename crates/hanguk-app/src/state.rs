use std::sync::Arc;

use hanguk_config::Config;
use hanguk_core::EntryView;
use tokio::sync::{Mutex, RwLock};

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    /// Target language of new lookups
    pub language: RwLock<String>,
    /// Only the event loop touches this
    pub view: Mutex<EntryView>,
}

impl AppState {
    pub fn new(config: Config, language: String) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            language: RwLock::new(language),
            view: Mutex::new(EntryView::new()),
        }
    }
}
