use anyhow::Result;
use colored::Colorize;
use docsite_core::{DocsService, SearchIndex};
use serde::Serialize;

use crate::output::{OutputFormat, print_json};

#[derive(Serialize)]
struct IndexSummary<'a> {
    branch: &'a str,
    built_at: String,
    documents: Vec<DocumentSummary<'a>>,
}

#[derive(Serialize)]
struct DocumentSummary<'a> {
    title: &'a str,
    route: &'a str,
    headings: usize,
    body_chars: usize,
}

impl<'a> IndexSummary<'a> {
    fn new(index: &'a SearchIndex) -> Self {
        Self {
            branch: index.branch.name(),
            built_at: index.built_at.to_rfc3339(),
            documents: index
                .documents
                .iter()
                .map(|doc| DocumentSummary {
                    title: &doc.title,
                    route: &doc.route,
                    headings: doc.headings.len(),
                    body_chars: doc.body.chars().count(),
                })
                .collect(),
        }
    }
}

/// List what the search index of a branch contains.
pub async fn execute(
    service: &DocsService,
    branch: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let index = service.index(branch).await?;
    let summary = IndexSummary::new(&index);

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => {
            println!(
                "{} {} documents on {} (built {})",
                "index:".bold(),
                summary.documents.len(),
                summary.branch.cyan(),
                summary.built_at
            );
            let width = summary
                .documents
                .iter()
                .map(|d| d.route.len())
                .max()
                .unwrap_or(0);
            for doc in &summary.documents {
                println!(
                    "  {:<width$}  {}  {}",
                    doc.route,
                    doc.title,
                    format!("({} headings, {} chars)", doc.headings, doc.body_chars).dimmed(),
                );
            }
        },
    }
    Ok(())
}
