//! Pronunciation through one provider interface.
//!
//! Which variant backs it (host synthesizer, server rendered audio or a remote
//! URL) is decided when the provider is built; callers only see
//! [`Pronunciation`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hanguk_model::ModelError;

#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn pronounce(&self, text: &str) -> Result<Pronunciation, SpeechError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub enum Pronunciation {
    /// Instructions for the host's speech synthesizer
    Utterance(Utterance),
    /// Decoded audio ready for playback
    Buffer(Arc<AudioBuffer>),
    /// Audio the host can fetch and play itself
    Url(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

/// De-interleaved PCM samples in `[-1.0, 1.0)`
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn frame_count(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Text is empty")]
    EmptyText,

    #[error("Text too long: {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("No audio data returned from TTS")]
    NoAudio,

    #[error("Audio decode error: {0}")]
    Decode(String),

    #[error("Invalid speech endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Checks shared by every provider
pub fn validate_text(text: &str, max_chars: usize) -> Result<(), SpeechError> {
    if text.trim().is_empty() {
        return Err(SpeechError::EmptyText);
    }

    let len = text.chars().count();
    if len > max_chars {
        return Err(SpeechError::TooLong { len, max: max_chars });
    }

    Ok(())
}

/// Decode little-endian signed 16-bit interleaved PCM
pub fn decode_pcm16(data: &[u8], sample_rate: u32, channels: u16) -> Result<AudioBuffer, SpeechError> {
    if channels == 0 {
        return Err(SpeechError::Decode("channel count is zero".to_string()));
    }

    // A trailing odd byte cannot form a sample
    let aligned = &data[..data.len() - data.len() % 2];
    if aligned.is_empty() {
        return Err(SpeechError::Decode("audio data is empty after alignment".to_string()));
    }

    let samples: Vec<i16> = aligned
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let channel_count = channels as usize;
    let frame_count = samples.len() / channel_count;
    if frame_count == 0 {
        return Err(SpeechError::Decode("audio frame count is zero".to_string()));
    }

    let channels = (0..channel_count)
        .map(|channel| {
            (0..frame_count)
                .map(|frame| samples[frame * channel_count + channel] as f32 / 32768.0)
                .collect()
        })
        .collect();

    Ok(AudioBuffer {
        sample_rate,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mono_and_scales() {
        let data = [0x00, 0x80, 0x00, 0x00, 0xff, 0x7f];
        let buffer = decode_pcm16(&data, 24000, 1).unwrap();

        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.channels[0], vec![-1.0, 0.0, 32767.0 / 32768.0]);
    }

    #[test]
    fn drops_trailing_odd_byte() {
        let buffer = decode_pcm16(&[0x00, 0x40, 0x12], 24000, 1).unwrap();
        assert_eq!(buffer.frame_count(), 1);
        assert_eq!(buffer.channels[0][0], 0.5);
    }

    #[test]
    fn deinterleaves_stereo() {
        // L=0x4000, R=0xC000, L=0, R=0
        let data = [0x00, 0x40, 0x00, 0xc0, 0x00, 0x00, 0x00, 0x00];
        let buffer = decode_pcm16(&data, 48000, 2).unwrap();

        assert_eq!(buffer.channels[0], vec![0.5, 0.0]);
        assert_eq!(buffer.channels[1], vec![-0.5, 0.0]);
    }

    #[test]
    fn rejects_empty_and_frameless_data() {
        assert!(matches!(decode_pcm16(&[0x01], 24000, 1), Err(SpeechError::Decode(_))));
        assert!(matches!(decode_pcm16(&[0x01, 0x02], 24000, 2), Err(SpeechError::Decode(_))));
    }

    #[test]
    fn duration_follows_sample_rate() {
        let buffer = AudioBuffer {
            sample_rate: 24000,
            channels: vec![vec![0.0; 12000]],
        };
        assert_eq!(buffer.duration(), Duration::from_millis(500));
    }

    #[test]
    fn text_validation() {
        assert!(matches!(validate_text("  ", 500), Err(SpeechError::EmptyText)));
        assert!(matches!(
            validate_text(&"가".repeat(501), 500),
            Err(SpeechError::TooLong { len: 501, max: 500 })
        ));
        assert!(validate_text(&"가".repeat(500), 500).is_ok());
    }
}
