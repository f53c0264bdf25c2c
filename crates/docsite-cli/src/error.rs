//! CLI error handling with semantic exit codes.
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Command completed successfully |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Invalid arguments, unknown branch or bad configuration |
//! | 3 | `NotFound` | No document at the requested slug |
//! | 5 | `SourceUnavailable` | The document source could not be read |
//!
//! ```bash
//! docsite show /guide/missing
//! case $? in
//!     0) echo "Rendered" ;;
//!     3) echo "No such page" ;;
//!     5) echo "GitHub unreachable" ;;
//! esac
//! ```

use std::fmt;
use std::process::ExitCode;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid arguments or configuration (exit code 2).
    Usage = 2,

    /// Requested document not found (exit code 3).
    NotFound = 3,

    /// The document source failed or returned garbage (exit code 5).
    SourceUnavailable = 5,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Create an `ExitCode` from this category.
    #[must_use]
    pub fn as_exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_code())
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::NotFound => "not found",
            Self::SourceUnavailable => "source unavailable",
        }
    }

    /// Category for a library error.
    #[must_use]
    pub const fn from_core(err: &docsite_core::Error) -> Self {
        use docsite_core::Error;
        match err {
            Error::SourceUnavailable(_) | Error::Network(_) => Self::SourceUnavailable,
            Error::NotFound(_) => Self::NotFound,
            Error::UnknownBranch(_) | Error::Config(_) => Self::Usage,
            Error::Parse(_) => Self::Internal,
        }
    }

    /// Infer the error category from an error message.
    ///
    /// Heuristic fallback for errors that are neither a [`CliError`] nor a
    /// library error.
    #[must_use]
    pub fn infer_from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("unavailable")
            || msg_lower.contains("http")
            || msg_lower.contains("fetch")
        {
            return Self::SourceUnavailable;
        }

        if msg_lower.contains("not found") || msg_lower.contains("no such") {
            return Self::NotFound;
        }

        if msg_lower.contains("invalid argument")
            || msg_lower.contains("invalid value")
            || msg_lower.contains("config")
        {
            return Self::Usage;
        }

        Self::Internal
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Create a usage error.
    pub fn usage(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Usage, source)
    }

    /// Create a source-unavailable error.
    pub fn source_unavailable(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::SourceUnavailable, source)
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Determine the exit code from an `anyhow::Error`.
///
/// A `CliError` anywhere in the chain decides; otherwise the first library
/// error in the chain; otherwise the message is inspected.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    if let Some(cli_err) = err.chain().find_map(|e| e.downcast_ref::<CliError>()) {
        return cli_err.exit_code();
    }

    if let Some(core_err) = err
        .chain()
        .find_map(|e| e.downcast_ref::<docsite_core::Error>())
    {
        return ErrorCategory::from_core(core_err).exit_code();
    }

    ErrorCategory::infer_from_message(&err.to_string()).exit_code()
}
