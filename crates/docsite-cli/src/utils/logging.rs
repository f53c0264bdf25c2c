//! Logging initialization and configuration.
//!
//! This module handles setting up the tracing subscriber and color control
//! based on CLI flags and environment variables.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};
use crate::output::OutputFormat;

/// Format the selected command will print in, if it has one.
pub fn command_format(command: &Commands) -> OutputFormat {
    match command {
        Commands::Search(args) => args.format.resolve(),
        Commands::Index { format, .. }
        | Commands::Nav { format, .. }
        | Commands::Links { format, .. } => format.resolve(),
        Commands::Show { format, .. } => format.explicit_or(OutputFormat::Text),
    }
}

/// Pick the log level for the given flags and output format.
///
/// Machine-readable output keeps stderr quiet unless verbose/debug was
/// explicitly requested.
pub fn log_level(cli: &Cli, format: OutputFormat) -> Level {
    if cli.verbose || cli.debug {
        Level::DEBUG
    } else if cli.quiet || format == OutputFormat::Json {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Initialize the logging subsystem based on CLI flags.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let format = command_format(&cli.command);
    let level = log_level(cli, format);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Color control: disable when requested, NO_COLOR is set, or when emitting machine output
    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color || format == OutputFormat::Json {
        color_control::set_override(false);
    }
    Ok(())
}
