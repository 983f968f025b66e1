use std::time::Duration;

pub use hanguk_types::ErrorKind;

pub mod classify;
pub mod schema;

pub type ModelId = String;

/// Generative model provider interface
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    /// Run one generation request against a single model
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ModelError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: ModelId,
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub output: OutputModality,
}

impl GenerateRequest {
    /// Structured JSON output constrained by `schema`
    pub fn json(
        model: impl Into<ModelId>,
        prompt: impl Into<String>,
        system_instruction: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: Some(system_instruction.into()),
            output: OutputModality::Json { schema },
        }
    }

    pub fn audio(model: impl Into<ModelId>, text: impl Into<String>, voice: Option<String>) -> Self {
        Self {
            model: model.into(),
            prompt: text.into(),
            system_instruction: None,
            output: OutputModality::Audio { voice },
        }
    }

    pub fn image(model: impl Into<ModelId>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: None,
            output: OutputModality::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputModality {
    Json { schema: serde_json::Value },
    Audio { voice: Option<String> },
    Image,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    /// Concatenated text parts of the first candidate
    pub text: Option<String>,
    /// First inline binary part of the first candidate
    pub inline_data: Option<InlineData>,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 payload as sent by the provider
    pub data: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("API key is missing or invalid: {0}")]
    Authentication(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),
}

impl ModelError {
    /// Build the variant matching an already classified provider failure
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Auth => ModelError::Authentication(message),
            ErrorKind::QuotaExceeded => ModelError::QuotaExceeded(message),
            ErrorKind::ModelUnavailable => ModelError::ModelNotFound(message),
            ErrorKind::MalformedResponse => ModelError::MalformedResponse(message),
            ErrorKind::Unknown => ModelError::ApiError(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::Authentication(_) => ErrorKind::Auth,
            ModelError::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            ModelError::ModelNotFound(_) => ErrorKind::ModelUnavailable,
            ModelError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            ModelError::Timeout(_) | ModelError::NetworkError(_) | ModelError::ApiError(_) => {
                ErrorKind::Unknown
            }
        }
    }

    /// Retrying against another model cannot fix a bad credential
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }
}
