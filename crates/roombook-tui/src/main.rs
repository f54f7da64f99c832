//! `roombook-tui`: terminal front end for the room-booking service.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `roombook-core`'s [`EntityStream`](roombook_core::EntityStream). Screens
//! are navigable via number keys (1-3): Overview, Rooms and Bookings.
//!
//! Logs are written to a file (default `/tmp/roombook-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod screen;
mod screens;
mod terminal;
mod theme;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use roombook_core::{Controller, ControllerConfig};

use crate::app::App;

/// Terminal UI for managing rooms and bookings.
#[derive(Parser, Debug)]
#[command(name = "roombook-tui", version, about)]
struct Cli {
    /// API base URL (e.g., http://127.0.0.1:3001)
    #[arg(short = 'u', long, env = "ROOMBOOK_API_URL")]
    api_url: Option<String>,

    /// Config profile to use instead of the default one
    #[arg(short = 'p', long, env = "ROOMBOOK_PROFILE")]
    profile: Option<String>,

    /// Directory that exports are written to
    #[arg(long, env = "ROOMBOOK_EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/roombook-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may go to stdout/stderr while the TUI owns
/// the terminal. Hold the returned guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "roombook_tui={log_level},roombook_core={log_level},roombook_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("roombook-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file and profile first, then CLI flags on top.
fn build_config(cli: &Cli) -> Result<ControllerConfig> {
    let cfg = roombook_config::load_config().wrap_err("failed to load config file")?;
    let mut config = roombook_config::resolve_controller_config(&cfg, cli.profile.as_deref())
        .wrap_err("invalid client configuration")?;

    if let Some(url) = &cli.api_url {
        config.api_url.clone_from(url);
    }
    if let Some(dir) = &cli.export_dir {
        config.export_dir.clone_from(dir);
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    terminal::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_config(&cli)?;
    info!(api_url = %config.api_url, export_dir = %config.export_dir.display(), "starting roombook-tui");

    let controller = Controller::new(config).wrap_err("failed to create API client")?;
    App::new(controller).run().await
}
