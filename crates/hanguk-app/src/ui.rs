use std::io::Write;

use hanguk_types::{AppEvent, UiEvent};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::render::{self, Style};

/// Turn one input line into an event. Plain text is a search.
pub fn parse_command(line: &str) -> Option<UiEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(command) = line.strip_prefix(':') else {
        return Some(UiEvent::Search(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim().to_string()).filter(|a| !a.is_empty())),
        None => (command, None),
    };

    match name {
        "lang" | "language" => arg.map(UiEvent::ChangeLanguage).or(Some(UiEvent::ListLanguages)),
        "langs" | "languages" => Some(UiEvent::ListLanguages),
        "daily" => Some(UiEvent::DailyWord),
        "say" => Some(UiEvent::Speak(arg)),
        "reset" | "clear" => Some(UiEvent::Reset),
        "quit" | "q" | "exit" => Some(UiEvent::Quit),
        _ => None,
    }
}

/// Terminal front end: reads commands from stdin, prints what the app sends
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    language: String,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let style = Style::detect();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut language = language;

    println!("{}", render::help(&language));
    print_prompt(&language);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("UI loop cancelled");
                return Ok(());
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed
                    ui_to_app_tx.send(AppEvent::UiEvent(UiEvent::Quit)).await?;
                    return Ok(());
                };

                match parse_command(&line) {
                    Some(event) => {
                        let quit = matches!(event, UiEvent::Quit);
                        ui_to_app_tx.send(AppEvent::UiEvent(event)).await?;
                        if quit {
                            return Ok(());
                        }
                    }
                    None if line.trim().is_empty() => print_prompt(&language),
                    None => {
                        println!("{}", render::help(&language));
                        print_prompt(&language);
                    }
                }
            }
            event = app_to_ui_rx.recv() => {
                let event = event?;
                if let AppEvent::LanguageChanged(selected) = &event {
                    language = selected.clone();
                }
                if let Some(output) = render_event(&event, style) {
                    println!("{output}");
                    print_prompt(&language);
                }
            }
        }
    }
}

/// Text for a UI-facing event, `None` for events the terminal ignores
pub fn render_event(event: &AppEvent, style: Style) -> Option<String> {
    match event {
        AppEvent::Loading { query: Some(query) } => Some(format!("Looking up '{query}'...")),
        AppEvent::Loading { query: None } => Some("Picking a word of the day...".to_string()),
        AppEvent::ShowEntry { entry, daily } => Some(render::render_entry(entry, *daily, style)),
        AppEvent::EntryUpdated(entry) => Some(render::render_entry(entry, false, style)),
        AppEvent::ShowError(message) => Some(render::render_error(message, style)),
        AppEvent::ShowStatus(status) => Some(status.clone()),
        AppEvent::LanguageChanged(language) => Some(format!("Target language: {language}")),
        AppEvent::ShowLanguages { languages, selected } => {
            Some(render::render_languages(languages, selected))
        }
        AppEvent::Cleared => Some("Cleared.".to_string()),
        AppEvent::UiEvent(_) | AppEvent::LookupFinished { .. } | AppEvent::EnrichmentFinished { .. } => None,
    }
}

fn print_prompt(language: &str) {
    print!("{}", render::prompt_line(language));
    let _ = std::io::stdout().flush();
}
