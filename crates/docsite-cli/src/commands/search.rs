use anyhow::{Result, anyhow};
use colored::Colorize;
use docsite_core::{DocsService, SearchResponse};

use crate::cli::SearchArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, print_json};

/// Run a query and print the response.
///
/// The response is printed even when the search failed, so JSON consumers
/// always get `{"results": [...], "error": ...}`; the exit code then reports
/// the failure.
pub async fn execute(service: &DocsService, args: &SearchArgs) -> Result<()> {
    let branch = args.branch.branch.as_deref();
    // Surface a mistyped branch as a usage error instead of "Search failed".
    service.config().branch(branch).map_err(CliError::usage)?;

    let query = args.query.join(" ");
    let limit = args.limit.unwrap_or(service.config().search.limit);
    let response = service.search_limited(branch, &query, limit).await;

    match args.format.resolve() {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Text => print_text(&query, &response),
    }

    match response.error {
        Some(message) => Err(CliError::source_unavailable(anyhow!(message)).into()),
        None => Ok(()),
    }
}

fn print_text(query: &str, response: &SearchResponse) {
    if response.error.is_some() {
        return;
    }
    if response.results.is_empty() {
        println!("No results for \"{query}\"");
        return;
    }
    for (rank, result) in response.results.iter().enumerate() {
        println!("{:>2}. {}  {}", rank + 1, result.title.bold(), result.path.cyan());
        if !result.excerpt.is_empty() {
            println!("    {}", result.excerpt.dimmed());
        }
    }
}
