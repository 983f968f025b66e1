use hanguk_types::{DictionaryEntry, DifficultyLevel};
use serde_json::json;

use crate::ModelError;

pub const REQUIRED_FIELDS: [&str; 5] = [
    "word",
    "romanization",
    "definition",
    "examples",
    "difficultyLevel",
];

/// Response schema for a dictionary entry, in the provider's OpenAPI subset
pub fn dictionary_schema() -> serde_json::Value {
    let levels: Vec<&str> = DifficultyLevel::ALL.iter().map(|l| l.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "word": {
                "type": "STRING",
                "description": "The Korean word, phrase, or short sentence."
            },
            "romanization": {
                "type": "STRING",
                "description": "Romanized pronunciation (Latin characters ONLY)."
            },
            "partOfSpeech": {
                "type": "STRING",
                "description": "Noun, Verb, Adjective, Phrase, Expression, etc. (Translated to target language)"
            },
            "definition": {
                "type": "STRING",
                "description": "A simple, easy-to-understand definition in the target language."
            },
            "difficultyLevel": {
                "type": "STRING",
                "enum": levels
            },
            "examples": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "korean": { "type": "STRING" },
                        "english": {
                            "type": "STRING",
                            "description": "Translation of the example strictly in the target language."
                        },
                        "romanization": {
                            "type": "STRING",
                            "description": "Romanized pronunciation (Latin characters ONLY). NO Hangul."
                        }
                    },
                    "required": ["korean", "english", "romanization"]
                },
                "description": "2-3 common example sentences."
            },
            "culturalNote": {
                "type": "STRING",
                "description": "A brief fun fact or nuance about usage in the target language. Mention politeness level (formal/informal) for phrases."
            },
            "breakdown": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "part": {
                            "type": "STRING",
                            "description": "The specific Korean word or particle."
                        },
                        "romanization": {
                            "type": "STRING",
                            "description": "Romanized pronunciation (Latin characters ONLY)."
                        },
                        "meaning": {
                            "type": "STRING",
                            "description": "Meaning of the part in the target language."
                        }
                    },
                    "required": ["part", "romanization", "meaning"]
                },
                "description": "Crucial for phrases/sentences. Break down key words and grammatical particles."
            }
        },
        "required": REQUIRED_FIELDS
    })
}

/// Parse and validate a structured response body
pub fn parse_entry(text: &str) -> Result<DictionaryEntry, ModelError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ModelError::MalformedResponse("No response from AI".to_string()));
    }

    let entry: DictionaryEntry = serde_json::from_str(body)
        .map_err(|e| ModelError::MalformedResponse(format!("Failed to parse entry: {e}")))?;

    validate(&entry)?;
    Ok(entry)
}

fn validate(entry: &DictionaryEntry) -> Result<(), ModelError> {
    let blank = [
        ("word", &entry.word),
        ("romanization", &entry.romanization),
        ("definition", &entry.definition),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());

    if let Some((field, _)) = blank {
        return Err(ModelError::MalformedResponse(format!(
            "Required field '{field}' is empty"
        )));
    }

    if entry.examples.is_empty() {
        return Err(ModelError::MalformedResponse(
            "Entry has no examples".to_string(),
        ));
    }

    Ok(())
}

/// Models occasionally wrap JSON in a Markdown fence even in JSON mode
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
