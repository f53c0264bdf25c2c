//! Markdown to HTML, with front matter and link rewriting.

use crate::index::canonical_route;
use crate::links::{LinkContext, rewrite_links};
use crate::{Branch, Error, RawDocument, Result};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

const FENCE: &str = "---";

/// YAML metadata block at the top of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Explicit page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Every other key, kept as parsed.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A document rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// Front-matter title, first H1, or the file-name title.
    pub title: String,
    /// Canonical route of the page.
    pub route: String,
    /// Rendered HTML with links rewritten.
    pub html: String,
}

/// Locate a leading `---` block. Returns the YAML text and the remaining
/// body, or `None` when the document has no front matter.
fn front_matter_block(markdown: &str) -> Option<(&str, &str)> {
    let rest = markdown.strip_prefix(FENCE)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Split front matter from the body.
///
/// Documents without a closing fence are all body. Malformed YAML is an
/// error.
pub fn split_front_matter(markdown: &str) -> Result<(FrontMatter, &str)> {
    let Some((yaml, body)) = front_matter_block(markdown) else {
        return Ok((FrontMatter::default(), markdown));
    };
    if yaml.trim().is_empty() {
        return Ok((FrontMatter::default(), body));
    }
    let front: FrontMatter = serde_yaml::from_str(yaml)
        .map_err(|e| Error::Parse(format!("invalid front matter: {e}")))?;
    Ok((front, body))
}

/// Front-matter `title`, else the first level-1 heading, else empty.
pub fn extract_title(markdown: &str) -> String {
    let (front, body) = match split_front_matter(markdown) {
        Ok(split) => split,
        Err(err) => {
            warn!(error = %err, "ignoring front matter");
            let body = front_matter_block(markdown).map_or(markdown, |(_, body)| body);
            (FrontMatter::default(), body)
        },
    };
    if let Some(title) = front.title.filter(|t| !t.trim().is_empty()) {
        return title;
    }
    first_h1(body).unwrap_or_default()
}

fn first_h1(body: &str) -> Option<String> {
    let mut in_h1 = false;
    let mut text = String::new();
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_h1 = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let title = text.trim().to_string();
                if !title.is_empty() {
                    return Some(title);
                }
                in_h1 = false;
            },
            Event::Text(t) | Event::Code(t) if in_h1 => text.push_str(&t),
            _ => {},
        }
    }
    None
}

fn gfm_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Render GitHub-flavored markdown to HTML. Front matter is not rendered.
pub fn render_html(markdown: &str) -> String {
    let body = front_matter_block(markdown).map_or(markdown, |(_, body)| body);
    let parser = Parser::new_ext(body, gfm_options());
    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Render a loaded document with its links resolved to routes on `branch`.
pub fn render_document(
    doc: &RawDocument,
    branch: &Branch,
    default_branch: &Branch,
) -> RenderedPage {
    let ctx = LinkContext::for_document(doc, branch, default_branch);
    let title = extract_title(&doc.content);
    RenderedPage {
        title: if title.is_empty() {
            doc.title.clone()
        } else {
            title
        },
        route: canonical_route(&doc.slug, ctx.route_prefix.as_deref()),
        html: rewrite_links(&render_html(&doc.content), &ctx),
    }
}
