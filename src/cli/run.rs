//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Creates the tokio runtime
//! - Dispatches to command handlers
//! - Handles all error output

use cascade_utils::error::UserFriendlyError;
use clap::Parser;
use tracing::debug;

use super::args::{Cli, Commands};
use super::commands;
use crate::{CascadeError, CliArgs, Config, ExitCode};

/// Main CLI execution function.
///
/// Handles ALL output including errors. On failure the returned `ExitCode`
/// is all main.rs needs; it does not print.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = cascade_utils::logging::init_tracing(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        plans_root: cli.plans_root.clone(),
        identity: cli.identity.clone(),
        watch_interval_secs: match &cli.command {
            Commands::Watch { interval, .. } => *interval,
            _ => None,
        },
    };

    // `names` parses its arguments only; it must work without a usable config
    if let Commands::Names { filenames, json } = &cli.command {
        return report(commands::execute_names_command(filenames, *json));
    }

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = CascadeError::from(err);
            debug!(category = %err.category(), "Configuration rejected");
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    if let Some(path) = &config.config_file {
        debug!(path = %path.display(), "Using configuration file");
    }
    for (key, (value, source)) in config.effective_config() {
        debug!(key = %key, value = %value, source = %source, "Effective configuration");
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Check { json, markdown } => {
                commands::execute_check_command(&config, commands::ReportFormat::from_flags(json, markdown))
            }
            Commands::Status { json } => {
                commands::execute_status_command(&config, json).map(|()| ExitCode::SUCCESS)
            }
            Commands::Watch { once, .. } => commands::execute_watch_command(&config, once)
                .await
                .map(|()| ExitCode::SUCCESS),
            Commands::Names { filenames, json } => {
                commands::execute_names_command(&filenames, json).map(|()| ExitCode::SUCCESS)
            }
        }
    });

    match result {
        Ok(code) if code == ExitCode::SUCCESS => Ok(()),
        Ok(code) => Err(code),
        Err(error) => report(Err(error)),
    }
}

/// Print a command failure and map it to an exit code.
fn report(result: anyhow::Result<()>) -> Result<(), ExitCode> {
    let Err(error) = result else {
        return Ok(());
    };

    if let Some(cascade_error) = error.downcast_ref::<CascadeError>() {
        debug!(category = %cascade_error.category(), "Command failed");
        eprintln!("{}", cascade_error.display_for_user());
        return Err(cascade_error.to_exit_code());
    }

    eprintln!("✗ Unexpected error: {error:#}");
    eprintln!("\n  General troubleshooting:");
    eprintln!("    - Run with --verbose for more detailed output");
    eprintln!("    - Check that --plans-root points at the plans directory");
    Err(ExitCode::INTERNAL)
}
