//! docsite CLI - search and render branch-aware markdown documentation.
//!
//! The binary in `main.rs` only calls [`run`] and maps errors to exit codes
//! (see [`error`]).

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use docsite_core::{Config, DocsService};
use std::time::Instant;
use tracing::debug;

pub mod cli;
mod commands;
pub mod error;
mod output;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::utils::initialize_logging;

/// Execute the docsite CLI with the current process arguments and
/// environment.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the command fails.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let config = load_config(&cli)?;
    let service = DocsService::from_config(config).context("Failed to initialize document source")?;
    debug!(
        index_ttl_secs = service.cache().ttl().as_secs(),
        "document service ready"
    );

    let start = Instant::now();
    execute_command(&cli, &service).await?;
    if cli.debug {
        eprintln!("{} {:.1?}", "elapsed:".dimmed(), start.elapsed());
    }
    Ok(())
}

/// Layer configuration: file (explicit or platform default), then
/// `DOCSITE_*` environment, then command-line flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
                .map_err(CliError::usage)?;
            config
                .apply_overrides(|key| std::env::var(key).ok())
                .map_err(CliError::usage)?;
            config
        },
        None => Config::load().map_err(CliError::usage)?,
    };

    if let Some(dir) = &cli.local {
        config.source.local_root = Some(dir.clone());
    }
    if let Some(profile) = cli.profile {
        config.cache.profile = profile.into();
    }
    config.validate().map_err(CliError::usage)?;

    debug!(
        profile = ?config.cache.profile,
        local = config.source.local_root.is_some(),
        "configuration loaded"
    );
    Ok(config)
}

async fn execute_command(cli: &Cli, service: &DocsService) -> Result<()> {
    match &cli.command {
        Commands::Search(args) => commands::search(service, args).await,
        Commands::Index { target, format } => {
            commands::index(service, target.branch.as_deref(), format.resolve()).await
        },
        Commands::Show {
            target,
            branch,
            format,
        } => {
            commands::show(
                service,
                target,
                branch.branch.as_deref(),
                format.explicit_or(output::OutputFormat::Text),
            )
            .await
        },
        Commands::Links {
            target,
            branch,
            format,
        } => commands::links(service, target, branch.branch.as_deref(), format.resolve()).await,
        Commands::Nav { target, format } => {
            commands::nav(service, target.branch.as_deref(), format.resolve()).await
        },
    }
}
