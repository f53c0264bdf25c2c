use anyhow::Result;
use colored::Colorize;
use docsite_core::DocsService;
use docsite_core::nav::NavEntry;

use crate::output::{OutputFormat, print_json};

/// Print the sidebar outline of a branch.
pub async fn execute(
    service: &DocsService,
    branch: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let nav = service.nav(branch).await?;

    match format {
        OutputFormat::Json => print_json(&nav)?,
        OutputFormat::Text => {
            for line in outline_lines(&nav) {
                println!("{line}");
            }
        },
    }
    Ok(())
}

/// One line per entry, indented two spaces per level.
fn outline_lines(entries: &[NavEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut stack: Vec<(&NavEntry, usize)> = entries.iter().rev().map(|e| (e, 0)).collect();
    while let Some((entry, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        match entry {
            NavEntry::Folder { name, children } => {
                lines.push(format!("{indent}{}", format!("{name}/").bold()));
                stack.extend(children.iter().rev().map(|c| (c, depth + 1)));
            },
            NavEntry::Page { label, route } => {
                lines.push(format!("{indent}{label}  {}", route.dimmed()));
            },
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_indents_children() {
        colored::control::set_override(false);
        let nav = vec![
            NavEntry::Folder {
                name: "guide".into(),
                children: vec![NavEntry::Page {
                    label: "setup".into(),
                    route: "/guide/setup".into(),
                }],
            },
            NavEntry::Page {
                label: "Overview (README)".into(),
                route: "/".into(),
            },
        ];

        assert_eq!(
            outline_lines(&nav),
            vec![
                "guide/".to_string(),
                "  setup  /guide/setup".to_string(),
                "Overview (README)  /".to_string(),
            ]
        );
    }
}
