//! `verone-edit`: edit one section of a Vérone record from the command line.
//!
//! Runs the same inline-edit flow as the back office (start edit, update,
//! save) against the Supabase project named in the config file. The saved
//! fields are printed to stdout as JSON; logs go to stderr.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use verone_app::{AppConfig, AppState};
use verone_core::traits::EditHooks;
use verone_core::types::{
    BackingTarget, Draft, EntityKind, SaveErrorKind, Section, VERSION_FIELD,
};

/// Prints saved fields to stdout and failures to stderr.
struct PrintHooks;

impl EditHooks for PrintHooks {
    fn on_update(&self, section: Section, updated: &Draft) {
        match serde_json::to_string_pretty(updated) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!("Cannot print saved {section}: {e}"),
        }
    }

    fn on_error(&self, section: Section, message: &str) {
        eprintln!("Failed to save {section}: {message}");
    }
}

/// Exit status when the configuration cannot be used.
const EXIT_CONFIG: u8 = 2;

/// Build the application state, or the exit status to stop with.
fn open_state(config: &AppConfig) -> Result<AppState, u8> {
    AppState::from_config(config).map_err(|e| {
        tracing::error!("Cannot connect to Supabase: {e}");
        EXIT_CONFIG
    })
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|e| {
        eprintln!("Invalid log level '{level}' ({e}), using info");
        EnvFilter::new("info")
    });

    // stdout carries the saved payload
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli, state: &AppState) -> anyhow::Result<bool> {
    let target = BackingTarget::new(cli.target.into(), cli.id.as_str())?;
    let section = cli.section;

    let editor = state.open_editor(target, Arc::new(PrintHooks));

    let mut initial = Draft::new();
    if let Some(version) = &cli.expect_updated_at {
        initial.insert(VERSION_FIELD, Value::from(version.as_str()));
    }
    editor.start_edit(section, &initial).await;
    editor.update_edited_data(section, cli.draft()).await?;

    let saved = editor.save_changes(section).await;
    if !saved && editor.error_kind(section).await == Some(SaveErrorKind::Stale) {
        eprintln!("Reload the record and retry with its current updated_at");
    }
    Ok(saved)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    init_tracing(config.log_level());

    tracing::info!(
        "Editing {} of {} {}",
        cli.section,
        EntityKind::from(cli.target),
        cli.id
    );

    let state = match open_state(&config) {
        Ok(state) => state,
        Err(status) => return ExitCode::from(status),
    };

    match run(cli, &state).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
