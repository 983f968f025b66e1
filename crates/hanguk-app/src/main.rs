use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hanguk_core::language;
use hanguk_core::pipeline::daily_word_query;
use hanguk_core::speech::Pronunciation;
use hanguk_lang_korean::random_topic;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod audio;
pub mod controller;
pub mod events;
pub mod profile;
pub mod render;
pub mod services;
pub mod state;
pub mod ui;


use self::controller::AppController;
use self::render::Style;
use self::services::Services;
use self::state::AppState;

/// Korean vocabulary lookup in the terminal
#[derive(Parser, Debug)]
#[command(name = "hanguk", version, about)]
struct Cli {
    /// Look up one word or phrase and exit
    query: Option<String>,

    /// Target language for explanations, e.g. "English" or "spanish"
    #[arg(short, long)]
    language: Option<String>,

    /// Look up a word of the day and exit
    #[arg(long, conflicts_with = "query")]
    daily: bool,

    /// Pronounce the headword after a one-shot lookup
    #[arg(long)]
    say: bool,

    /// Write synthesized audio to this WAV file
    #[arg(long, value_name = "PATH", requires = "say")]
    save_audio: Option<PathBuf>,

    /// Profile file to load instead of the default one
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective configuration as a profile and exit
    #[arg(long, value_name = "NAME", conflicts_with_all = ["query", "daily"])]
    write_profile: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
        }
    }

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = profile::load_config(cli.config.as_deref())?;

    if let Some(name) = &cli.write_profile {
        let path = cli
            .config
            .clone()
            .or_else(profile::default_profile_path)
            .context("no config directory, pass --config")?;
        // The key stays in the environment
        let mut saved = config.clone();
        saved.model.api_key.clear();
        profile::save_profile(&path, name, &saved)?;
        return Ok(ExitCode::SUCCESS);
    }

    let services = Arc::new(Services::from_config(&config).await?);

    let language = match &cli.language {
        Some(input) => language::resolve(input),
        None => services.preference.load().await,
    };
    tracing::info!("Target language: {}", language);

    if cli.query.is_some() || cli.daily {
        return run_once(&cli, &services, &language).await;
    }

    let state = Arc::new(AppState::new(config, language));
    let controller = AppController::new(state, services);
    let mut tasks = controller.spawn_tasks().await;

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::debug!("task finished"),
                Ok(Err(e)) => tracing::error!("task exited: {e}"),
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.abort_all();
    Ok(ExitCode::SUCCESS)
}

/// One lookup, printed, optionally pronounced
async fn run_once(cli: &Cli, services: &Services, language: &str) -> anyhow::Result<ExitCode> {
    let style = Style::detect();

    let query = match &cli.query {
        Some(query) => query.clone(),
        None => daily_word_query(random_topic()),
    };

    let entry = match services.pipeline.lookup(&query, language).await {
        Ok(entry) => entry,
        Err(e) => {
            println!("{}", render::render_error(&e.to_string(), style));
            return Ok(ExitCode::FAILURE);
        }
    };
    println!("{}", render::render_entry(&entry, cli.daily, style));

    if !cli.say {
        return Ok(ExitCode::SUCCESS);
    }

    let pronunciation = services.speech.pronounce(&entry.word).await?;
    println!("{}", events::speak::describe(&entry.word, &pronunciation));

    match (&pronunciation, &cli.save_audio) {
        (Pronunciation::Buffer(buffer), Some(path)) => audio::write_wav(path, buffer)?,
        (_, Some(_)) => {
            tracing::warn!(
                "--save-audio needs the buffer speech provider, {} produced no audio",
                services.speech.name()
            );
        }
        _ => {}
    }

    Ok(ExitCode::SUCCESS)
}
