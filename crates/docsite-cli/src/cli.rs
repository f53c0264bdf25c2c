//! # CLI Structure and Argument Parsing
//!
//! `docsite` follows a command-subcommand pattern built with clap derive:
//!
//! - **Global options** apply to every command (`--config`, `--local`,
//!   `--profile`, `--verbose`, `--quiet`, `--debug`)
//! - **Subcommands** query one branch of the documentation corpus
//!
//! ```bash
//! docsite search networking peers
//! docsite search scripting --branch dev --format json
//! docsite show /guide/networking
//! docsite --local ./checkouts nav
//! ```

use clap::{Args, Parser, Subcommand};
use docsite_core::Profile;
use std::path::PathBuf;

use crate::utils::cli_args::FormatArg;

/// Main CLI structure for the `docsite` command
#[derive(Parser, Clone, Debug)]
#[command(name = "docsite")]
#[command(version)]
#[command(about = "docsite - search and render branch-aware markdown docs", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Debug logging plus timing of each command
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to configuration file (overrides the platform default). Also via `DOCSITE_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "DOCSITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read documents from `<DIR>/<branch>/<docs_path>` instead of GitHub
    #[arg(long, global = true, value_name = "DIR")]
    pub local: Option<PathBuf>,

    /// Index freshness profile
    #[arg(long, global = true, value_enum)]
    pub profile: Option<ProfileArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ProfileArg {
    /// Rebuild indexes after an hour
    Development,
    /// Rebuild indexes after a day
    Production,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Development => Self::Development,
            ProfileArg::Production => Self::Production,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Search documents on a branch
    Search(SearchArgs),

    /// List the documents in a branch's search index
    Index {
        #[command(flatten)]
        target: BranchArg,
        #[command(flatten)]
        format: FormatArg,
    },

    /// Render a document to HTML with links rewritten to routes
    Show {
        /// Route or slug, e.g. `/guide/setup`, `guide/setup`, `/dev/api`
        #[arg(value_name = "ROUTE-OR-SLUG", default_value = "/")]
        target: String,
        #[command(flatten)]
        branch: BranchArg,
        #[command(flatten)]
        format: FormatArg,
    },

    /// List a document's links and the routes they resolve to
    Links {
        /// Route or slug of the document
        #[arg(value_name = "SLUG")]
        target: String,
        #[command(flatten)]
        branch: BranchArg,
        #[command(flatten)]
        format: FormatArg,
    },

    /// Print the navigation outline of a branch
    Nav {
        #[command(flatten)]
        target: BranchArg,
        #[command(flatten)]
        format: FormatArg,
    },
}

/// Arguments for `docsite search`
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Search terms; multiple words are joined with spaces
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,

    #[command(flatten)]
    pub branch: BranchArg,

    /// Maximum number of results (defaults to `search.limit` from config)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(usize))]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub format: FormatArg,
}

/// Branch selection shared by every subcommand
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct BranchArg {
    /// Branch to read (defaults to the configured default branch)
    #[arg(short = 'b', long, value_name = "BRANCH")]
    pub branch: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_joins_terms_and_reads_flags() {
        let cli = Cli::try_parse_from([
            "docsite", "--local", "/tmp/docs", "search", "network", "peers", "-b", "dev", "-n",
            "3",
        ])
        .unwrap();

        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query.join(" "), "network peers");
        assert_eq!(args.branch.branch.as_deref(), Some("dev"));
        assert_eq!(args.limit, Some(3));
        assert_eq!(cli.local, Some(PathBuf::from("/tmp/docs")));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["docsite", "nav", "--profile", "development", "-q"]).unwrap();
        assert_eq!(cli.profile, Some(ProfileArg::Development));
        assert!(cli.quiet);
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["docsite", "search"]).is_err());
    }
}
