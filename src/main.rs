//! pipseek binary entrypoint kept minimal. The full runtime lives in `app`.

mod app;
mod args;
mod config;
mod enrich;
mod index;
mod install;
mod model;
mod rank;
mod registry;
mod search;
mod session;
mod state;
mod ui;
mod util;

use std::fmt;
use std::sync::OnceLock;

use clap::Parser;

/// Timestamp formatter for the log file: `YYYY-MM-DD-THH:MM:SS` local time.
struct PipseekTimer;

impl tracing_subscriber::fmt::time::FormatTime for PipseekTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let ts = chrono::Local::now().format("%Y-%m-%d-T%H:%M:%S").to_string();
        w.write_str(&ts)
    }
}

/// Keeps the non-blocking appender alive for the process lifetime.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Initialize file logging so the interactive terminal stays clean.
///
/// Inputs:
/// - `level`: Default level when `RUST_LOG` is unset.
///
/// Output:
/// - No return value; logging writes to `~/.config/pipseek/logs/pipseek.log`
///   or falls back to stderr if the file cannot be opened.
fn init_logging(level: &str) {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()))
    };
    let mut log_path = config::logs_dir();
    log_path.push("pipseek.log");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(PipseekTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::debug!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_timer(PipseekTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = args::Args::parse();
    let level = if cli.verbose {
        "debug"
    } else {
        cli.log_level.as_str()
    };
    init_logging(level);
    tracing::info!(query = ?cli.query, regex = cli.regex, "pipseek starting");

    if let Err(err) = app::run(cli).await {
        tracing::error!(error = ?err, "application error");
        ui::error(&err.to_string());
        std::process::exit(1);
    }
    tracing::info!("pipseek exited");
}
