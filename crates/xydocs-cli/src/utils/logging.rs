//! Logging initialization and color control.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};

/// Pick the log level for the parsed command line.
///
/// Machine-readable output drops to `ERROR` unless `--verbose` was given, so
/// stderr stays quiet for scripts. `serve` logs requests at `INFO`.
pub fn log_level(cli: &Cli) -> Level {
    if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || cli.command.machine_output() {
        Level::ERROR
    } else if matches!(cli.command, Commands::Serve { .. }) {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// Install the global subscriber and apply color settings.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color || cli.command.machine_output() {
        color_control::set_override(false);
    }
    Ok(())
}
