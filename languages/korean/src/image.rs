use std::sync::Arc;

use async_trait::async_trait;
use hanguk_core::enrichment::{EnrichmentError, ImageGenerator};
use hanguk_model::{GenerateRequest, ModelClient, ModelId};

/// Illustrations from a Gemini image model, returned as `data:` URLs
pub struct GeminiImageGenerator {
    client: Arc<dyn ModelClient>,
    model: ModelId,
}

impl GeminiImageGenerator {
    pub fn new(client: Arc<dyn ModelClient>, model: impl Into<ModelId>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, EnrichmentError> {
        let response = self
            .client
            .generate(&GenerateRequest::image(self.model.as_str(), prompt))
            .await?;

        let image = response.inline_data.ok_or(EnrichmentError::NoImageData)?;
        Ok(format!("data:{};base64,{}", image.mime_type, image.data))
    }
}
