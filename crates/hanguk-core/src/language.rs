/// Target languages offered by the selector, in display order
pub const SUPPORTED_LANGUAGES: [&str; 19] = [
    "English",
    "한국어 (Korean)",
    "Español (Spanish)",
    "Français (French)",
    "Deutsch (German)",
    "Italiano (Italian)",
    "Português (Portuguese)",
    "Русский (Russian)",
    "中文 (Chinese)",
    "日本語 (Japanese)",
    "Tiếng Việt (Vietnamese)",
    "ไทย (Thai)",
    "Bahasa Indonesia",
    "العربية (Arabic)",
    "हिन्दी (Hindi)",
    "Türkçe (Turkish)",
    "Polski (Polish)",
    "Nederlands (Dutch)",
    "Svenska (Swedish)",
];

/// "Español (Spanish)" -> "Español"
pub fn display_name(language: &str) -> &str {
    language.split('(').next().unwrap_or(language).trim()
}

pub fn is_korean_ui(language: &str) -> bool {
    language.trim_start().starts_with("한국어")
}

/// Match user input against the catalogue by full or display name, or the
/// English name in parentheses. Unknown input is kept as typed.
pub fn resolve(input: &str) -> String {
    let wanted = input.trim().to_lowercase();

    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| {
            let english = lang
                .split_once('(')
                .map(|(_, rest)| rest.trim_end_matches(')').trim().to_lowercase());

            lang.to_lowercase() == wanted
                || display_name(lang).to_lowercase() == wanted
                || english.as_deref() == Some(wanted.as_str())
        })
        .map(|lang| lang.to_string())
        .unwrap_or_else(|| input.trim().to_string())
}
