//! # Output Formatting
//!
//! Every command prints either human-readable text (colored when stdout is
//! a terminal) or a single JSON document for scripts:
//!
//! ```bash
//! docsite search networking --format text
//! docsite search networking --format json | jq '.results[].path'
//! ```
//!
//! JSON output is the serde form of the core types, so its shape is the
//! same one library callers see.

use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};

/// Output format for displaying results
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty text output
    Text,
    /// Single JSON document
    Json,
}

/// Write `value` to stdout as pretty JSON followed by a newline.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
