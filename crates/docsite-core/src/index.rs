//! Search index construction.

use crate::corpus::load_documents;
use crate::sanitize::{extract_headings, sanitize_body};
use crate::source::DocumentSource;
use crate::{Branch, IndexedDocument, RawDocument, Result, SearchIndex, is_home_slug};
use chrono::Utc;
use std::time::Instant;
use tracing::info;

/// Canonical absolute route for `slug`.
///
/// The home slug contracts to `/`, or to the prefix itself when one is
/// given. Every other route is `prefix + "/" + segments`.
pub fn canonical_route(slug: &[String], route_prefix: Option<&str>) -> String {
    let prefix = route_prefix.unwrap_or("");
    if is_home_slug(slug) || slug.is_empty() {
        return if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        };
    }
    format!("{prefix}/{}", slug.join("/"))
}

/// Denormalize raw documents into a search index. Pure; order is kept.
pub fn index_documents(
    branch: &Branch,
    docs: &[RawDocument],
    default_branch: &Branch,
) -> SearchIndex {
    let prefix = branch.route_prefix(default_branch);
    let documents = docs
        .iter()
        .map(|doc| IndexedDocument {
            title: doc.title.clone(),
            route: canonical_route(&doc.slug, prefix.as_deref()),
            body: sanitize_body(&doc.content),
            headings: extract_headings(&doc.content),
        })
        .collect();

    SearchIndex {
        branch: branch.clone(),
        documents,
        built_at: Utc::now(),
    }
}

/// Load the whole corpus of `branch` and index it.
///
/// All-or-nothing: any enumeration or fetch failure fails the build with
/// [`Error::SourceUnavailable`](crate::Error::SourceUnavailable).
pub async fn build_index<S>(
    source: &S,
    branch: &Branch,
    default_branch: &Branch,
) -> Result<SearchIndex>
where
    S: DocumentSource + ?Sized,
{
    let start = Instant::now();
    let docs = load_documents(source, branch).await?;
    let index = index_documents(branch, &docs, default_branch);
    info!(
        %branch,
        documents = index.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "search index built"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn doc(slug: &[&str], content: &str) -> RawDocument {
        RawDocument {
            slug: slug.iter().map(|s| (*s).to_string()).collect(),
            title: slug.last().copied().unwrap_or_default().to_string(),
            content: content.to_string(),
            source_path: format!("docs/{}.md", slug.join("/")),
            directory_index: false,
        }
    }

    fn slug(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_canonical_routes() {
        assert_eq!(canonical_route(&slug(&["index"]), None), "/");
        assert_eq!(canonical_route(&slug(&["index"]), Some("/dev")), "/dev");
        assert_eq!(canonical_route(&slug(&["guide", "setup"]), None), "/guide/setup");
        assert_eq!(
            canonical_route(&slug(&["guide", "setup"]), Some("/dev")),
            "/dev/guide/setup"
        );
        // Only the exact one-segment slug is home.
        assert_eq!(canonical_route(&slug(&["guide", "index"]), None), "/guide/index");
    }

    #[test]
    fn test_index_documents_denormalizes_in_order() {
        let main = Branch::new("main");
        let docs = vec![
            doc(&["index"], "# Welcome\n\nHello [world](x.md)."),
            doc(&["guide", "setup"], "# Setup\n## Install\ntext"),
        ];

        let index = index_documents(&main, &docs, &main);

        assert_eq!(index.len(), 2);
        assert_eq!(index.documents[0].route, "/");
        assert_eq!(index.documents[0].body, "Welcome\n\nHello world.");
        assert_eq!(index.documents[1].route, "/guide/setup");
        assert_eq!(index.documents[1].headings, vec!["Setup", "Install"]);
    }

    #[test]
    fn test_non_default_branch_routes_are_prefixed() {
        let index = index_documents(
            &Branch::new("dev"),
            &[doc(&["index"], ""), doc(&["api"], "")],
            &Branch::new("main"),
        );
        let routes: Vec<_> = index.documents.iter().map(|d| d.route.as_str()).collect();
        assert_eq!(routes, vec!["/dev", "/dev/api"]);
        assert_eq!(index.branch, Branch::new("dev"));
    }

    fn raw_document() -> impl Strategy<Value = RawDocument> {
        (
            prop::collection::vec("[a-z][a-z0-9-]{0,8}", 1..4),
            "[#*`\\[\\]()|a-z0-9 .\n-]{0,200}",
            any::<bool>(),
        )
            .prop_map(|(slug, content, directory_index)| RawDocument {
                title: slug.join(" "),
                source_path: format!("docs/{}.md", slug.join("/")),
                slug,
                content,
                directory_index,
            })
    }

    proptest! {
        #[test]
        fn prop_reindexing_is_idempotent(
            docs in prop::collection::vec(raw_document(), 0..6),
            on_default in any::<bool>(),
        ) {
            let main = Branch::new("main");
            let branch = if on_default { main.clone() } else { Branch::new("dev") };

            let first = index_documents(&branch, &docs, &main);
            let second = index_documents(&branch, &docs, &main);

            prop_assert_eq!(first.documents.len(), docs.len());
            for (a, b) in first.documents.iter().zip(&second.documents) {
                prop_assert_eq!(&a.route, &b.route);
                prop_assert_eq!(&a.body, &b.body);
                prop_assert_eq!(&a.headings, &b.headings);
            }
        }
    }
}
