pub mod daily;
pub mod gemini;
pub mod hangul;
pub mod image;
pub mod prompt;
pub mod speech;

pub use daily::random_topic;
pub use gemini::GeminiClient;
pub use image::GeminiImageGenerator;
pub use prompt::KoreanPrompter;
pub use speech::{GeminiSpeech, NativeSpeech, RemoteSpeech};
