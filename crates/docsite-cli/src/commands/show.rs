use anyhow::{Context, Result};
use docsite_core::DocsService;

use super::parse_target;
use crate::output::{OutputFormat, print_json};

/// Render one document. Text output is the bare HTML.
pub async fn execute(
    service: &DocsService,
    target: &str,
    branch: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let target = parse_target(target, branch, service.config());
    let page = service
        .document(target.branch.as_deref(), &target.slug)
        .await
        .with_context(|| format!("Failed to render '{}'", target.slug.join("/")))?;

    match format {
        OutputFormat::Json => print_json(&page)?,
        OutputFormat::Text => print!("{}", page.html),
    }
    Ok(())
}
