use hanguk_core::preprocess::{DefaultPreprocessor, Preprocessor};
use hanguk_core::prompt::{Prompt, Prompter};

use crate::hangul;

/// Dictionary-entry instructions for a Korean learner
#[derive(Debug, Default, Clone, Copy)]
pub struct KoreanPrompter;

impl KoreanPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for KoreanPrompter {
    fn build(&self, query: &str, target_language: &str) -> Prompt {
        let query = DefaultPreprocessor.process(query);

        let hint = if hangul::is_korean(&query) {
            "Input is Korean: use it as the headword."
        } else {
            "Input is NOT Korean: translate it to the most common Korean word first."
        };

        let text = format!(
            "Input: \"{query}\"\n\
             Target Language: {target_language}\n\
             \n\
             Task: Create a Korean dictionary entry JSON.\n\
             \n\
             If Input is NOT Korean: Translate to common Korean word first.\n\
             {hint}\n\
             \n\
             Rules:\n\
             1. 'word' field: Korean word/phrase.\n\
             2. Explanations/Definitions/Translations: In {target_language}.\n\
             3. 'romanization': Latin chars only.\n\
             \n\
             Return valid JSON matching schema."
        );

        Prompt {
            text,
            system_instruction: format!(
                "You are a Korean tutor. Return JSON only. Explanations in {target_language}."
            ),
        }
    }
}
