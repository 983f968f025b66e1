//! The three pronunciation backends and the factory that picks one.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hanguk_config::speech::{SpeechConfig, SpeechProviderKind};
use hanguk_core::session::AudioCache;
use hanguk_core::speech::{
    Pronunciation, SpeechError, SpeechProvider, Utterance, decode_pcm16, validate_text,
};
use hanguk_model::{ErrorKind, GenerateRequest, ModelClient, ModelId};

const NATIVE_PITCH: f32 = 1.0;

/// Hands the text to the host's synthesizer
pub struct NativeSpeech {
    lang: String,
    rate: f32,
    max_chars: usize,
}

impl NativeSpeech {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            lang: config.language.clone(),
            rate: config.rate,
            max_chars: config.max_chars,
        }
    }
}

#[async_trait]
impl SpeechProvider for NativeSpeech {
    async fn pronounce(&self, text: &str) -> Result<Pronunciation, SpeechError> {
        validate_text(text, self.max_chars)?;

        Ok(Pronunciation::Utterance(Utterance {
            text: text.trim().to_string(),
            lang: self.lang.clone(),
            rate: self.rate,
            pitch: NATIVE_PITCH,
        }))
    }

    fn name(&self) -> &'static str {
        "native"
    }
}

/// Server rendered audio from a Gemini TTS model
pub struct GeminiSpeech {
    client: Arc<dyn ModelClient>,
    model: ModelId,
    voice: String,
    sample_rate: u32,
    channels: u16,
    max_chars: usize,
    cache: AudioCache,
}

impl GeminiSpeech {
    pub fn new(client: Arc<dyn ModelClient>, config: &SpeechConfig, cache: AudioCache) -> Self {
        Self {
            client,
            model: config.tts_model.clone(),
            voice: config.voice.clone(),
            sample_rate: config.sample_rate,
            channels: config.channels,
            max_chars: config.max_chars,
            cache,
        }
    }

    /// Base64 payload of the first audio part, if the model sent one
    async fn synthesize(&self, text: &str, voice: Option<String>) -> Result<Option<String>, SpeechError> {
        match self
            .client
            .generate(&GenerateRequest::audio(self.model.as_str(), text, voice))
            .await
        {
            Ok(response) => Ok(response.inline_data.map(|data| data.data)),
            Err(e) if e.kind() == ErrorKind::MalformedResponse => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SpeechProvider for GeminiSpeech {
    async fn pronounce(&self, text: &str) -> Result<Pronunciation, SpeechError> {
        validate_text(text, self.max_chars)?;

        if let Some(buffer) = self.cache.get(text) {
            return Ok(Pronunciation::Buffer(buffer));
        }

        let encoded = match self.synthesize(text, Some(self.voice.clone())).await? {
            Some(encoded) => encoded,
            None => {
                tracing::warn!("No audio with voice {}, retrying with the default voice", self.voice);
                self.synthesize(text, None).await?.ok_or(SpeechError::NoAudio)?
            }
        };

        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| SpeechError::Decode(e.to_string()))?;
        let buffer = Arc::new(decode_pcm16(&bytes, self.sample_rate, self.channels)?);

        self.cache.put(text.to_string(), buffer.clone());
        Ok(Pronunciation::Buffer(buffer))
    }

    fn name(&self) -> &'static str {
        "buffer"
    }
}

/// Points the host at a TTS endpoint it can fetch itself
pub struct RemoteSpeech {
    endpoint: String,
    lang: String,
    max_chars: usize,
}

impl RemoteSpeech {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            endpoint: config.remote_url.clone(),
            lang: config.language.clone(),
            max_chars: config.max_chars,
        }
    }

    fn url(&self, text: &str) -> Result<reqwest::Url, SpeechError> {
        // "ko-KR" -> "ko"
        let lang = self.lang.split('-').next().unwrap_or(&self.lang);

        reqwest::Url::parse_with_params(
            &self.endpoint,
            &[("ie", "UTF-8"), ("client", "tw-ob"), ("tl", lang), ("q", text)],
        )
        .map_err(|e| SpeechError::InvalidEndpoint(e.to_string()))
    }
}

#[async_trait]
impl SpeechProvider for RemoteSpeech {
    async fn pronounce(&self, text: &str) -> Result<Pronunciation, SpeechError> {
        validate_text(text, self.max_chars)?;
        Ok(Pronunciation::Url(self.url(text.trim())?.into()))
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Provider selected by `config.provider`
pub fn speech_provider(
    config: &SpeechConfig,
    client: Arc<dyn ModelClient>,
    cache: AudioCache,
) -> Arc<dyn SpeechProvider> {
    match config.provider {
        SpeechProviderKind::Native => Arc::new(NativeSpeech::new(config)),
        SpeechProviderKind::Buffer => Arc::new(GeminiSpeech::new(client, config, cache)),
        SpeechProviderKind::Remote => Arc::new(RemoteSpeech::new(config)),
    }
}
