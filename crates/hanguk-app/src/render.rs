use std::fmt::Write;

use hanguk_core::language::{display_name, is_korean_ui};
use hanguk_types::{DictionaryEntry, DifficultyLevel};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn tier_colour(level: DifficultyLevel) -> &'static str {
    match level {
        DifficultyLevel::Beginner => "\x1b[32m",
        DifficultyLevel::Intermediate => "\x1b[33m",
        DifficultyLevel::Advanced => "\x1b[31m",
    }
}

/// ANSI styling, switched off for pipes and files
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
}

impl Style {
    pub fn detect() -> Self {
        Self {
            color: atty::is(atty::Stream::Stdout),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

pub fn badge(level: DifficultyLevel, style: Style) -> String {
    style.paint(tier_colour(level), &format!("[{}]", level.as_str()))
}

pub fn render_entry(entry: &DictionaryEntry, daily: bool, style: Style) -> String {
    let mut out = String::new();

    if daily {
        let _ = writeln!(out, "{}", style.paint(DIM, "Word of the day"));
    }

    let _ = write!(
        out,
        "{} ({}) {}",
        style.paint(BOLD, &entry.word),
        entry.romanization,
        badge(entry.difficulty_level, style)
    );
    if let Some(pos) = &entry.part_of_speech {
        let _ = write!(out, " {}", style.paint(DIM, pos));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", entry.definition);

    if let Some(breakdown) = entry.breakdown.as_ref().filter(|b| !b.is_empty()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Breakdown");
        for morpheme in breakdown {
            let _ = writeln!(
                out,
                "    {} ({}): {}",
                morpheme.part, morpheme.romanization, morpheme.meaning
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  Examples");
    for (i, example) in entry.examples.iter().enumerate() {
        let _ = writeln!(out, "    {}. {}", i + 1, example.korean);
        let _ = writeln!(out, "       {}", style.paint(DIM, &example.romanization));
        let _ = writeln!(out, "       {}", example.english);
    }

    if let Some(note) = &entry.cultural_note {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Culture: {}", note);
    }

    for (label, url) in [
        ("Image", &entry.image_url),
        ("Culture image", &entry.cultural_image_url),
    ] {
        if let Some(url) = url {
            let _ = writeln!(out, "  {}: {}", label, summarize_url(url));
        }
    }

    out
}

/// Data URLs are shortened to their media type and size
fn summarize_url(url: &str) -> String {
    match url.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((meta, data)) => format!("<{} {} bytes>", meta, data.len()),
        None => url.to_string(),
    }
}

pub fn render_error(message: &str, style: Style) -> String {
    style.paint("\x1b[31m", &format!("! {message}"))
}

pub fn render_languages(languages: &[String], selected: &str) -> String {
    languages
        .iter()
        .map(|language| {
            let marker = if language == selected { "*" } else { " " };
            format!("{marker} {language}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn prompt_line(language: &str) -> String {
    format!("[{}] > ", display_name(language))
}

/// Usage line, in Korean when explanations are in Korean
pub fn help(language: &str) -> &'static str {
    if is_korean_ui(language) {
        "단어를 입력하세요. 명령어: :lang <언어>, :langs, :daily, :say [텍스트], :reset, :quit"
    } else {
        "Type a word to look it up. Commands: :lang <name>, :langs, :daily, :say [text], :reset, :quit"
    }
}
