// src/lib.rs

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod output;
pub mod types;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::commands::load_commands;
use crate::config::{discover, resolve_options};
use crate::engine::{Orchestrator, OrchestratorOptions, RunReport};
use crate::errors::Result;
use crate::exec::ProcessExecutor;
use crate::fs::RealFileSystem;
use crate::output::{Console, Palette, StdConsole};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - option resolution (CLI flags over the settings file)
/// - command-file loading
/// - color probing
/// - the orchestrator with the real process executor
/// - Ctrl-C / SIGTERM handling
///
/// Option and command-file errors abort here, before anything runs.
pub async fn run(args: CliArgs) -> Result<RunReport> {
    let cwd = std::env::current_dir()?;
    let settings = discover(args.config.as_deref(), &cwd)?;
    let options = resolve_options(&args, settings)?;
    debug!(?options, "resolved options");

    let commands = load_commands(&RealFileSystem, &options.filenames)?;
    info!(count = commands.len(), "loaded commands");

    // The palette decides per stream; `colored` must always emit when asked.
    colored::control::set_override(true);
    let palette = Palette::detect(options.color);

    let shutdown = CancellationToken::new();
    spawn_signal_listener(shutdown.clone());

    let console: Arc<dyn Console> = Arc::new(StdConsole);
    let orchestrator = Orchestrator::new(
        ProcessExecutor::from_options(&options),
        Arc::clone(&console),
        palette,
        OrchestratorOptions::from(&options),
    );

    let report = orchestrator.run(commands, shutdown).await;
    report.print(console.as_ref(), &palette);

    Ok(report)
}

/// Ctrl-C (and SIGTERM on unix) -> cancel the run.
fn spawn_signal_listener(token: CancellationToken) {
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("shutdown signal received; interrupting commands");
        token.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to listen for SIGTERM");
            wait_for_ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = wait_for_ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
