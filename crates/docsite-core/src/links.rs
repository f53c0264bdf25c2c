//! Rewriting of in-document links to canonical routes.
//!
//! Documents link to each other the way they would on a file system
//! (`../intro.md`, `guide/README.md`, `/docs/api.md`). Rendered pages live
//! at slug routes instead, so every `href` in the rendered HTML is resolved
//! against the document it appears in. External links and in-page anchors
//! are left alone. Resolution never fails: anything unrecognized ends up as
//! a best-effort route.

use crate::{Branch, RawDocument, is_home_slug};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]+)""#).unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// Where a link appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkContext {
    /// Slug of the containing document.
    pub slug: Vec<String>,
    /// Whether the containing document represents its folder.
    pub directory_index: bool,
    /// `Some("/<branch>")` off the default branch.
    pub route_prefix: Option<String>,
}

impl LinkContext {
    /// Context for a loaded document on `branch`.
    pub fn for_document(doc: &RawDocument, branch: &Branch, default_branch: &Branch) -> Self {
        Self {
            slug: doc.slug.clone(),
            directory_index: doc.directory_index,
            route_prefix: branch.route_prefix(default_branch),
        }
    }

    /// Replace the route prefix applied to resolved links.
    #[must_use]
    pub fn with_route_prefix(mut self, prefix: Option<String>) -> Self {
        self.route_prefix = prefix;
        self
    }

    /// Folder relative links resolve against. Up-level links from a leaf pop
    /// from the full slug; sibling links drop the leaf's own segment first.
    fn base(&self, sibling: bool) -> Vec<String> {
        if is_home_slug(&self.slug) {
            return Vec::new();
        }
        let mut base = self.slug.clone();
        if sibling && !self.directory_index {
            base.pop();
        }
        base
    }
}

fn is_passthrough(href: &str) -> bool {
    href.starts_with('#') || href.starts_with("//") || SCHEME_RE.is_match(href)
}

/// Split `path?query#fragment` into the path and the suffix.
fn split_suffix(href: &str) -> (&str, &str) {
    href.find(['?', '#'])
        .map_or((href, ""), |at| href.split_at(at))
}

/// Resolve one `href` found in the document described by `ctx`.
pub fn resolve_href(href: &str, ctx: &LinkContext) -> String {
    if is_passthrough(href) {
        return href.to_string();
    }

    let (path, suffix) = split_suffix(href);
    // Only an absolute href skips the join; `docs/x.md` is still relative.
    let root_relative = path.starts_with('/');
    let path = path.strip_prefix("./").unwrap_or(path);
    let path = path
        .strip_prefix("/docs/")
        .or_else(|| path.strip_prefix("docs/"))
        .unwrap_or(path);
    let path = path.strip_prefix('/').unwrap_or(path);

    let path = path.strip_suffix(".md").unwrap_or(path);
    let path = if path == "README" {
        ""
    } else {
        path.strip_suffix("/README").unwrap_or(path)
    };

    let mut segments = if root_relative {
        Vec::new()
    } else {
        ctx.base(!path.starts_with("../"))
    };
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other.to_string()),
        }
    }

    let route = match (segments.is_empty(), ctx.route_prefix.as_deref()) {
        (true, None) => "/".to_string(),
        (true, Some(prefix)) => prefix.to_string(),
        (false, prefix) => format!("{}/{}", prefix.unwrap_or(""), segments.join("/")),
    };
    format!("{route}{suffix}")
}

/// An `href` found in rendered HTML alongside the route it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    /// Value as written in the document.
    pub href: String,
    /// What the value is rewritten to.
    pub route: String,
}

/// Every `href` in `html`, in document order, with its resolution.
pub fn resolve_links(html: &str, ctx: &LinkContext) -> Vec<ResolvedLink> {
    HREF_RE
        .captures_iter(html)
        .map(|caps| ResolvedLink {
            href: caps[1].to_string(),
            route: resolve_href(&caps[1], ctx),
        })
        .collect()
}

/// Rewrite every `href="..."` attribute value in `html`.
pub fn rewrite_links(html: &str, ctx: &LinkContext) -> String {
    HREF_RE
        .replace_all(html, |caps: &Captures<'_>| {
            format!(r#"href="{}""#, resolve_href(&caps[1], ctx))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| (*s).to_string()).collect()
    }

    fn leaf(parts: &[&str]) -> LinkContext {
        LinkContext {
            slug: slug(parts),
            directory_index: false,
            route_prefix: None,
        }
    }

    fn folder(parts: &[&str]) -> LinkContext {
        LinkContext {
            slug: slug(parts),
            directory_index: true,
            route_prefix: None,
        }
    }

    #[test]
    fn test_external_and_anchor_links_pass_through() {
        let ctx = leaf(&["guide", "setup"]);
        for href in [
            "https://example.com/a.md",
            "http://x",
            "mailto:team@example.com",
            "//cdn.example.com/lib.js",
            "#install",
        ] {
            assert_eq!(resolve_href(href, &ctx), href);
        }
    }

    #[test]
    fn test_up_level_from_leaf() {
        let ctx = leaf(&["guide", "setup"]);
        assert_eq!(resolve_href("../intro.md", &ctx), "/guide/intro");
        assert_eq!(resolve_href("../../intro.md", &ctx), "/intro");
        // Popping past the root stops at the root.
        assert_eq!(resolve_href("../../../../intro.md", &ctx), "/intro");
    }

    #[test]
    fn test_sibling_from_leaf() {
        let ctx = leaf(&["guide", "setup"]);
        assert_eq!(resolve_href("install.md", &ctx), "/guide/install");
        assert_eq!(resolve_href("./install.md", &ctx), "/guide/install");
        assert_eq!(resolve_href("advanced/README.md", &ctx), "/guide/advanced");
    }

    #[test]
    fn test_links_from_home() {
        let ctx = folder(&["index"]);
        assert_eq!(resolve_href("getting-started.md", &ctx), "/getting-started");
        assert_eq!(resolve_href("guide/README.md", &ctx), "/guide");
        assert_eq!(resolve_href("README.md", &ctx), "/");
        assert_eq!(resolve_href("../outside.md", &ctx), "/outside");
    }

    #[test]
    fn test_links_from_directory_index() {
        let ctx = folder(&["guide"]);
        assert_eq!(resolve_href("setup.md", &ctx), "/guide/setup");
        assert_eq!(resolve_href("../api.md", &ctx), "/api");
    }

    #[test]
    fn test_root_relative_links_ignore_location() {
        let ctx = leaf(&["guide", "setup"]);
        assert_eq!(resolve_href("/docs/api/README.md", &ctx), "/api");
        assert_eq!(resolve_href("/api.md", &ctx), "/api");
        assert_eq!(resolve_href("/", &ctx), "/");
    }

    #[test]
    fn test_relative_docs_prefix_joins_location() {
        // Given: a leaf page and a folder page
        let leaf_ctx = leaf(&["guide", "setup"]);
        let folder_ctx = folder(&["guide"]);

        // Then: a bare `docs/` prefix is stripped but still joined
        assert_eq!(resolve_href("docs/api.md", &leaf_ctx), "/guide/api");
        assert_eq!(resolve_href("./docs/api.md", &leaf_ctx), "/guide/api");
        assert_eq!(resolve_href("docs/api.md", &folder_ctx), "/guide/api");
        assert_eq!(resolve_href("docs/api.md", &leaf(&["index"])), "/api");
    }

    #[test]
    fn test_query_and_fragment_are_kept() {
        let ctx = leaf(&["guide", "setup"]);
        assert_eq!(resolve_href("install.md#linux", &ctx), "/guide/install#linux");
        assert_eq!(resolve_href("../faq.md?v=2#top", &ctx), "/guide/faq?v=2#top");
    }

    #[test]
    fn test_route_prefix_applies_off_default_branch() {
        let ctx = leaf(&["guide", "setup"]).with_route_prefix(Some("/dev".into()));
        assert_eq!(resolve_href("../intro.md", &ctx), "/dev/guide/intro");
        assert_eq!(resolve_href("/docs/README.md", &ctx), "/dev");
        assert_eq!(resolve_href("https://example.com", &ctx), "https://example.com");
    }

    #[test]
    fn test_for_document_uses_flag() {
        let doc = RawDocument {
            slug: slug(&["getting-started"]),
            title: "getting started".into(),
            content: String::new(),
            source_path: "docs/getting-started.md".into(),
            directory_index: false,
        };
        let ctx = LinkContext::for_document(&doc, &Branch::new("main"), &Branch::new("main"));

        // A top-level leaf is not its folder's index: siblings resolve at the root.
        assert_eq!(resolve_href("faq.md", &ctx), "/faq");
        assert_eq!(ctx.route_prefix, None);
    }

    #[test]
    fn test_resolve_links_lists_hrefs_in_order() {
        let html = r#"<a href="b.md">b</a><a href="https://x.dev">x</a>"#;
        let links = resolve_links(html, &leaf(&["guide", "a"]));
        assert_eq!(
            links,
            vec![
                ResolvedLink {
                    href: "b.md".into(),
                    route: "/guide/b".into()
                },
                ResolvedLink {
                    href: "https://x.dev".into(),
                    route: "https://x.dev".into()
                },
            ]
        );
    }

    #[test]
    fn test_rewrite_links_in_html() {
        let html = r##"<p><a href="setup.md">Setup</a> <a href="https://x.dev">X</a> <a href="#top">top</a></p>"##;
        let out = rewrite_links(html, &folder(&["guide"]));
        assert_eq!(
            out,
            r##"<p><a href="/guide/setup">Setup</a> <a href="https://x.dev">X</a> <a href="#top">top</a></p>"##
        );
    }
}
