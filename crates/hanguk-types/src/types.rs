use serde::{Deserialize, Serialize};

/// Learner tier assigned by the model. Drives card styling, so there are
/// exactly three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub korean: String,
    /// Translation in the current target language, whatever that is.
    pub english: String,
    pub romanization: String,
}

/// One word or particle of a phrase breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morpheme {
    pub part: String,
    pub romanization: String,
    pub meaning: String,
}

/// A structured dictionary result for one word or phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub word: String,
    pub romanization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    pub definition: String,
    pub difficulty_level: DifficultyLevel,
    pub examples: Vec<ExampleSentence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<Morpheme>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_image_url: Option<String>,
}

impl DictionaryEntry {
    /// Fill in enrichment results. Fields missing from `images` are left as they are.
    pub fn merge_images(&mut self, images: EntryImages) {
        if images.image_url.is_some() {
            self.image_url = images.image_url;
        }
        if images.cultural_image_url.is_some() {
            self.cultural_image_url = images.cultural_image_url;
        }
    }
}

/// Output of background enrichment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_image_url: Option<String>,
}

impl EntryImages {
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none() && self.cultural_image_url.is_none()
    }
}

/// Identifies one lookup request issued by the front end
pub type RequestId = u64;

/// Proof that an enrichment still belongs to the entry on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTicket {
    pub generation: u64,
    pub word: String,
}

/// User-facing failure categories of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    QuotaExceeded,
    ModelUnavailable,
    MalformedResponse,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    UiEvent(UiEvent),
    Loading {
        query: Option<String>,
    },
    ShowEntry {
        entry: DictionaryEntry,
        daily: bool,
    },
    EntryUpdated(DictionaryEntry),
    ShowError(String),
    ShowStatus(String),
    LanguageChanged(String),
    ShowLanguages {
        languages: Vec<String>,
        selected: String,
    },
    Cleared,
    LookupFinished {
        request: RequestId,
        query: String,
        daily: bool,
        outcome: Result<DictionaryEntry, LookupFailure>,
    },
    EnrichmentFinished {
        ticket: ViewTicket,
        images: EntryImages,
    },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Search(String),
    DailyWord,
    ChangeLanguage(String),
    /// Pronounce the given text, or the displayed headword when empty
    Speak(Option<String>),
    ListLanguages,
    Reset,
    Quit,
}
