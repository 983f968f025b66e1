use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hanguk_model::classify::{ErrorClassifier, ProviderMessageClassifier};
use hanguk_model::{
    GenerateRequest, GenerateResponse, InlineData, ModelClient, ModelError, OutputModality,
    ProviderMetadata,
};
use serde::{Deserialize, Serialize};

/// Gemini `generateContent` over REST
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    classifier: Arc<dyn ErrorClassifier>,
}

impl GeminiClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_key, api_url)
    }

    /// Client whose every request is bounded by `timeout`
    pub fn with_timeout(api_key: String, api_url: String, timeout: Duration) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_key, api_url))
    }

    fn with_client(client: reqwest::Client, api_key: String, api_url: String) -> Self {
        Self {
            client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            classifier: Arc::new(ProviderMessageClassifier),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_url, model)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ModelError> {
        if self.api_key.trim().is_empty() {
            return Err(ModelError::Authentication(
                "API key is not configured".to_string(),
            ));
        }

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&build_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(parse_failure(status.as_u16(), &body, self.classifier.as_ref()));
        }

        parse_success(&body)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Gemini".to_string(),
            requires_api_key: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

fn text_content(text: &str, role: Option<&str>) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: Some(text.to_string()),
            inline_data: None,
        }],
    }
}

fn build_body(request: &GenerateRequest) -> GenerateContentRequest {
    let generation_config = match &request.output {
        OutputModality::Json { schema } => GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema.clone()),
            ..Default::default()
        },
        OutputModality::Audio { voice } => GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: voice.as_ref().map(|voice| SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.clone(),
                    },
                },
            }),
            ..Default::default()
        },
        // Image models refuse IMAGE on its own
        OutputModality::Image => GenerationConfig {
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            ..Default::default()
        },
    };

    GenerateContentRequest {
        contents: vec![text_content(&request.prompt, Some("user"))],
        system_instruction: request
            .system_instruction
            .as_deref()
            .map(|instruction| text_content(instruction, None)),
        generation_config: Some(generation_config),
    }
}

fn parse_success(body: &str) -> Result<GenerateResponse, ModelError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ModelError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    let mut text = String::new();
    let mut inline_data = None;
    for part in parts {
        if let Some(t) = part.text {
            text.push_str(&t);
        }
        if inline_data.is_none() {
            inline_data = part.inline_data.map(|blob| InlineData {
                mime_type: blob.mime_type,
                data: blob.data,
            });
        }
    }

    let text = Some(text).filter(|t| !t.trim().is_empty());
    if text.is_none() && inline_data.is_none() {
        return Err(ModelError::MalformedResponse("No response from AI".to_string()));
    }

    Ok(GenerateResponse { text, inline_data })
}

fn parse_failure(status: u16, body: &str, classifier: &dyn ErrorClassifier) -> ModelError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("{} {}", code, envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
        Err(_) => body.trim().to_string(),
    };

    let kind = classifier.classify(Some(status), &message);
    ModelError::from_kind(kind, message)
}
