use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProviderKind {
    /// Host speech synthesizer
    Native,
    /// Server rendered PCM buffer
    Buffer,
    /// Remote TTS URL
    Remote,
}

impl FromStr for SpeechProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "buffer" => Ok(Self::Buffer),
            "remote" => Ok(Self::Remote),
            other => Err(format!("unknown speech provider: {other}")),
        }
    }
}

fn default_provider() -> SpeechProviderKind {
    SpeechProviderKind::Native
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_language() -> String {
    "ko-KR".to_string()
}

fn default_rate() -> f32 {
    0.9
}

fn default_sample_rate() -> u32 {
    24000
}

fn default_channels() -> u16 {
    1
}

fn default_max_chars() -> usize {
    500
}

fn default_remote_url() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SpeechConfig {
    #[serde(default = "default_provider")]
    pub provider: SpeechProviderKind,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_rate")]
    pub rate: f32,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_channels")]
    pub channels: u16,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            language: default_language(),
            rate: default_rate(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            max_chars: default_max_chars(),
            remote_url: default_remote_url(),
        }
    }
}

impl SpeechConfig {
    pub fn new() -> Self {
        let provider = env::var("HANGUK_SPEECH_PROVIDER")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_provider);

        Self {
            provider,
            ..Self::default()
        }
    }
}
