//! Query boundary tying sources, the index cache and rendering together.

use crate::config::Config;
use crate::corpus::{find_document, load_documents, load_tree};
use crate::index::build_index;
use crate::index_cache::IndexCache;
use crate::links::{LinkContext, ResolvedLink, resolve_links};
use crate::markdown::{RenderedPage, render_document, render_html};
use crate::nav::{NavEntry, build_nav};
use crate::search::{MIN_QUERY_CHARS, search};
use crate::source::{CachedSource, DocumentSource, GitHubSource, LocalSource};
use crate::{Branch, Error, RawDocument, Result, SearchIndex, SearchResponse};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Message returned to callers when a search cannot be served.
pub const SEARCH_FAILED: &str = "Search failed";

/// Documentation service for the configured repository.
pub struct DocsService {
    source: Arc<dyn DocumentSource>,
    config: Config,
    cache: IndexCache,
}

impl DocsService {
    /// Service over an explicit source; the index TTL comes from `config`.
    pub fn new(source: Arc<dyn DocumentSource>, config: Config) -> Self {
        let cache = IndexCache::new(config.cache.index_ttl());
        Self {
            source,
            config,
            cache,
        }
    }

    /// Build the service from configuration: a local checkout when
    /// `source.local_root` is set, GitHub otherwise. Either way raw fetches
    /// go through a [`CachedSource`].
    pub fn from_config(config: Config) -> Result<Self> {
        let raw_ttl = config.cache.raw_ttl();
        let source: Arc<dyn DocumentSource> = match &config.source.local_root {
            Some(root) => {
                info!(root = %root.display(), "reading documents from local checkouts");
                Arc::new(CachedSource::new(
                    LocalSource::new(root.clone(), config.source.docs_path.clone()),
                    raw_ttl,
                ))
            },
            None => {
                info!(
                    owner = %config.source.owner,
                    repo = %config.source.repo,
                    "reading documents from GitHub"
                );
                Arc::new(CachedSource::new(
                    GitHubSource::from_config(&config.source)?,
                    raw_ttl,
                ))
            },
        };
        Ok(Self::new(source, config))
    }

    /// Effective configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The per-branch index cache.
    pub const fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Search with the configured result limit.
    pub async fn search(&self, branch: Option<&str>, query: &str) -> SearchResponse {
        self.search_limited(branch, query, self.config.search.limit)
            .await
    }

    /// Search returning at most `limit` results. Never fails: errors are
    /// logged and reported as an empty response carrying [`SEARCH_FAILED`].
    pub async fn search_limited(
        &self,
        branch: Option<&str>,
        query: &str,
        limit: usize,
    ) -> SearchResponse {
        if query.trim().chars().count() < MIN_QUERY_CHARS {
            debug!(query, "query too short");
            return SearchResponse::ok(Vec::new());
        }

        match self.index(branch).await {
            Ok(index) => SearchResponse::ok(search(&index, query, limit)),
            Err(err) => {
                error!(
                    branch = branch.unwrap_or(&self.config.branches.default),
                    category = err.category(),
                    error = %err,
                    "search failed"
                );
                SearchResponse::failed(SEARCH_FAILED)
            },
        }
    }

    /// Cached search index for `branch`, rebuilt when stale.
    pub async fn index(&self, branch: Option<&str>) -> Result<Arc<SearchIndex>> {
        let branch = self.config.branch(branch)?;
        let default_branch = self.config.default_branch();
        let (source, branch, default_branch) = (self.source.as_ref(), &branch, &default_branch);
        self.cache
            .get_or_build(branch, move || build_index(source, branch, default_branch))
            .await
    }

    /// Every document on `branch`.
    pub async fn documents(&self, branch: Option<&str>) -> Result<Vec<RawDocument>> {
        let branch = self.config.branch(branch)?;
        load_documents(self.source.as_ref(), &branch).await
    }

    async fn locate(&self, branch: &Branch, slug: &[String]) -> Result<RawDocument> {
        let hidden = slug
            .first()
            .is_some_and(|s| s.starts_with('.') || s.starts_with('_'));
        if hidden {
            return Err(Error::NotFound(slug.join("/")));
        }
        let docs = load_documents(self.source.as_ref(), branch).await?;
        find_document(&docs, slug)
            .cloned()
            .ok_or_else(|| Error::NotFound(slug.join("/")))
    }

    /// Render the document at `slug`.
    pub async fn document(&self, branch: Option<&str>, slug: &[String]) -> Result<RenderedPage> {
        let branch = self.config.branch(branch)?;
        let doc = self.locate(&branch, slug).await?;
        Ok(render_document(&doc, &branch, &self.config.default_branch()))
    }

    /// Links of the document at `slug` with the routes they resolve to.
    pub async fn document_links(
        &self,
        branch: Option<&str>,
        slug: &[String],
    ) -> Result<Vec<ResolvedLink>> {
        let branch = self.config.branch(branch)?;
        let doc = self.locate(&branch, slug).await?;
        let ctx = LinkContext::for_document(&doc, &branch, &self.config.default_branch());
        Ok(resolve_links(&render_html(&doc.content), &ctx))
    }

    /// Sidebar outline for `branch`.
    pub async fn nav(&self, branch: Option<&str>) -> Result<Vec<NavEntry>> {
        let branch = self.config.branch(branch)?;
        let tree = load_tree(self.source.as_ref(), &branch).await.into_result()?;
        Ok(build_nav(&tree, &branch, &self.config.default_branch()))
    }
}
