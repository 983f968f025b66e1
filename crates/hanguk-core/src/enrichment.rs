use std::sync::Arc;

use async_trait::async_trait;
use hanguk_model::ModelError;
use hanguk_types::{DictionaryEntry, EntryImages};

use crate::session::ImageCache;

/// Produces an illustration for a prompt, as a URL the front end can display
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, EnrichmentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Image generation is disabled")]
    Disabled,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Response carried no image data")]
    NoImageData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Word,
    Culture,
}

impl ImageKind {
    pub fn prompt(self, subject: &str) -> String {
        match self {
            ImageKind::Word => format!(
                "Generate a cute, simple, flat vector style illustration representing the concept of: \"{subject}\". White background, minimalist, easy to understand. Do not include any text in the image."
            ),
            ImageKind::Culture => format!(
                "Generate a warm, inviting, flat vector style illustration describing this Korean cultural context: \"{subject}\". White background, minimalist, educational art style. Do not include any text in the image."
            ),
        }
    }
}

/// Best-effort illustration of an entry that is already on screen
#[derive(Clone)]
pub struct Enricher {
    generator: Option<Arc<dyn ImageGenerator>>,
    images: ImageCache,
}

impl Enricher {
    pub fn new(generator: Arc<dyn ImageGenerator>, images: ImageCache) -> Self {
        Self {
            generator: Some(generator),
            images,
        }
    }

    pub fn disabled(images: ImageCache) -> Self {
        Self {
            generator: None,
            images,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Both illustrations run concurrently. A failure on one side only drops that field.
    pub async fn enrich(&self, entry: &DictionaryEntry) -> EntryImages {
        if self.generator.is_none() {
            return EntryImages::default();
        }

        let word = self.illustrate(ImageKind::Word, &entry.word);
        let culture = async {
            match entry.cultural_note.as_deref() {
                Some(note) if !note.trim().is_empty() => {
                    self.illustrate(ImageKind::Culture, note).await
                }
                _ => None,
            }
        };

        let (image_url, cultural_image_url) = tokio::join!(word, culture);

        EntryImages {
            image_url,
            cultural_image_url,
        }
    }

    async fn illustrate(&self, kind: ImageKind, subject: &str) -> Option<String> {
        let prompt = kind.prompt(subject);

        if let Some(url) = self.images.get(&prompt) {
            return Some(url);
        }

        let generator = self.generator.as_ref()?;
        match generator.generate(&prompt).await {
            Ok(url) => {
                self.images.put(prompt, url.clone());
                Some(url)
            }
            Err(e) => {
                tracing::warn!("{:?} illustration failed for {}: {}", kind, subject, e);
                None
            }
        }
    }
}
