use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    /// Query text as it should appear inside a prompt
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Composed Hangul syllables, so jamo sequences and precomposed input match
        let text: String = text.nfc().collect();

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
