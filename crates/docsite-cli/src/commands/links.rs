use anyhow::{Context, Result};
use colored::Colorize;
use docsite_core::DocsService;

use super::parse_target;
use crate::output::{OutputFormat, print_json};

/// Print each link of a document next to the route it resolves to.
pub async fn execute(
    service: &DocsService,
    target: &str,
    branch: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let target = parse_target(target, branch, service.config());
    let links = service
        .document_links(target.branch.as_deref(), &target.slug)
        .await
        .with_context(|| format!("Failed to read links of '{}'", target.slug.join("/")))?;

    match format {
        OutputFormat::Json => print_json(&links)?,
        OutputFormat::Text => {
            if links.is_empty() {
                println!("No links");
            }
            for link in &links {
                if link.href == link.route {
                    println!("{}  {}", link.href, "(unchanged)".dimmed());
                } else {
                    println!("{} -> {}", link.href, link.route.cyan());
                }
            }
        },
    }
    Ok(())
}
