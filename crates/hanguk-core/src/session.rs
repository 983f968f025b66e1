use std::sync::Arc;

use crate::cache::{InMemorySessionCache, SessionCache};
use crate::speech::AudioBuffer;

pub type ImageCache = Arc<dyn SessionCache<String>>;
pub type AudioCache = Arc<dyn SessionCache<Arc<AudioBuffer>>>;

/// Caches created at startup and dropped with the process. Nothing here is persisted.
#[derive(Clone)]
pub struct Session {
    /// Generated image URLs keyed by the exact prompt
    pub images: ImageCache,
    /// Synthesized audio keyed by the exact spoken text
    pub audio: AudioCache,
}

impl Session {
    pub fn new() -> Self {
        Self {
            images: Arc::new(InMemorySessionCache::new()),
            audio: Arc::new(InMemorySessionCache::new()),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
