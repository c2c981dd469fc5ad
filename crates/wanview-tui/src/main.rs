//! `wanview` — terminal dashboard for the wan-watcher dual-WAN monitor.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `wanview-core`'s [`Monitor`](wanview_core::Monitor). Two screens,
//! navigable by number keys: Dashboard (1) and Controls (2).
//!
//! Logs are written to a file (default `/tmp/wanview.log`) to avoid
//! corrupting the terminal UI. A background data bridge task forwards
//! every monitor state change into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wanview_core::{Monitor, MonitorConfig};

use crate::app::App;

/// Terminal dashboard for a wan-watcher dual-WAN health monitor.
#[derive(Parser, Debug)]
#[command(name = "wanview", version, about)]
struct Cli {
    /// Monitor URL (e.g., http://192.168.4.80)
    #[arg(short = 'u', long, env = "WANVIEW_URL")]
    url: Option<String>,

    /// Named monitor profile from the config file
    #[arg(short = 'm', long)]
    monitor: Option<String>,

    /// Log file path (defaults to /tmp/wanview.log)
    #[arg(long, default_value = "/tmp/wanview.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wanview={log_level},wanview_core={log_level},wanview_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("wanview.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the monitor config: `--url` wins, then the config file
/// (`--monitor` profile or the default one).
fn resolve_config(cli: &Cli) -> Result<MonitorConfig> {
    if let Some(url_str) = cli.url.as_deref() {
        let url = url_str
            .parse()
            .map_err(|e| eyre!("invalid monitor URL '{url_str}': {e}"))?;
        return Ok(MonitorConfig::new(url));
    }

    let cfg = wanview_config::load_config_or_default();
    cfg.monitor_config(cli.monitor.as_deref())
        .map_err(|e| eyre!("{e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = resolve_config(&cli)?;
    info!(url = %config.url, "starting wanview");

    let monitor = Monitor::new(config)?;
    let mut app = App::new(monitor);
    app.run().await?;

    Ok(())
}
