//! Error types and handling for docsite-core operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Errors are
//! categorized so the query boundary and the CLI can decide how to degrade:
//!
//! - **Source errors**: the document source could not enumerate or fetch
//!   documents ([`Error::SourceUnavailable`])
//! - **Lookup errors**: unknown documents or branches
//! - **Configuration errors**: invalid or unreadable config files
//! - **Format errors**: front matter that fails to parse
//!
//! Short or empty search queries are not errors; they simply produce no
//! results. Link resolution never fails.
//!
//! ```rust
//! use docsite_core::Error;
//!
//! let err = Error::SourceUnavailable("GitHub API error: 503".into());
//! assert_eq!(err.category(), "source_unavailable");
//! assert!(err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for docsite-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The document source is unreachable or returned a non-success status.
    ///
    /// Raised by [`DocumentSource`](crate::source::DocumentSource)
    /// implementations and propagated by the indexer. Building an index is
    /// all-or-nothing, so a single failed listing or fetch surfaces here.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Requested document or resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Branch name outside the configured set.
    #[error("Unknown branch: {0}")]
    UnknownBranch(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport failure before a status code was available.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Document content could not be parsed (front matter).
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Check if the error might go away on retry.
    ///
    /// Source outages and transport timeouts are transient; lookups,
    /// configuration and parse failures are not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SourceUnavailable(_) => true,
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Used as a structured logging field and by the CLI to pick an exit code.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::SourceUnavailable(_) => "source_unavailable",
            Self::NotFound(_) => "not_found",
            Self::UnknownBranch(_) => "unknown_branch",
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_error_display_formatting() {
        let cases = vec![
            (
                Error::SourceUnavailable("GitHub API error: 502".into()),
                "Source unavailable",
            ),
            (Error::NotFound("guide/setup".into()), "Not found"),
            (Error::UnknownBranch("staging".into()), "Unknown branch"),
            (Error::Config("missing field".into()), "Configuration error"),
            (Error::Parse("bad front matter".into()), "Parse error"),
        ];

        for (error, prefix) in cases {
            let rendered = error.to_string();
            assert!(
                rendered.starts_with(prefix),
                "'{rendered}' should start with '{prefix}'"
            );
        }
    }

    #[test]
    fn test_recoverability() {
        assert!(Error::SourceUnavailable("down".into()).is_recoverable());

        assert!(!Error::NotFound("x".into()).is_recoverable());
        assert!(!Error::UnknownBranch("x".into()).is_recoverable());
        assert!(!Error::Config("x".into()).is_recoverable());
        assert!(!Error::Parse("x".into()).is_recoverable());
    }

    #[test]
    fn test_categories_are_distinct() {
        let categories = [
            Error::SourceUnavailable(String::new()).category(),
            Error::NotFound(String::new()).category(),
            Error::UnknownBranch(String::new()).category(),
            Error::Config(String::new()).category(),
            Error::Parse(String::new()).category(),
        ];
        let unique: std::collections::HashSet<_> = categories.iter().collect();
        assert_eq!(unique.len(), categories.len());
    }

    proptest! {
        #[test]
        fn display_always_contains_message(msg in "[a-zA-Z0-9 ]{1,40}") {
            let errors = [
                Error::SourceUnavailable(msg.clone()),
                Error::NotFound(msg.clone()),
                Error::Config(msg.clone()),
                Error::Parse(msg.clone()),
            ];
            for error in errors {
                prop_assert!(error.to_string().contains(&msg));
            }
        }
    }
}
