//! Document sources.
//!
//! A source supplies, per branch, directory listings and raw markdown text.
//! The corpus loader ([`crate::corpus`]) is the only consumer that turns
//! listings into documents; sources never know about slugs.

mod cached;
mod github;
mod local;

pub use cached::CachedSource;
pub use github::GitHubSource;
pub use local::LocalSource;

use crate::{Branch, Result, TreeEntry};
use async_trait::async_trait;
use std::sync::Arc;

/// Backend that can enumerate and fetch documents for a branch.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Path of the documentation root directory, e.g. `docs`.
    fn root_path(&self) -> &str;

    /// List the immediate children of `path`.
    ///
    /// Fails with [`Error::SourceUnavailable`](crate::Error::SourceUnavailable)
    /// when the backend cannot be reached or rejects the request.
    async fn list_dir(&self, path: &str, branch: &Branch) -> Result<Vec<TreeEntry>>;

    /// Fetch the raw text of the file at `path`.
    async fn fetch_raw(&self, path: &str, branch: &Branch) -> Result<String>;
}

#[async_trait]
impl<S: DocumentSource + ?Sized> DocumentSource for Arc<S> {
    fn root_path(&self) -> &str {
        (**self).root_path()
    }

    async fn list_dir(&self, path: &str, branch: &Branch) -> Result<Vec<TreeEntry>> {
        (**self).list_dir(path, branch).await
    }

    async fn fetch_raw(&self, path: &str, branch: &Branch) -> Result<String> {
        (**self).fetch_raw(path, branch).await
    }
}

#[async_trait]
impl<S: DocumentSource + ?Sized> DocumentSource for Box<S> {
    fn root_path(&self) -> &str {
        (**self).root_path()
    }

    async fn list_dir(&self, path: &str, branch: &Branch) -> Result<Vec<TreeEntry>> {
        (**self).list_dir(path, branch).await
    }

    async fn fetch_raw(&self, path: &str, branch: &Branch) -> Result<String> {
        (**self).fetch_raw(path, branch).await
    }
}
