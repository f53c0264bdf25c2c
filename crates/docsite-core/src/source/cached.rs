use crate::source::DocumentSource;
use crate::{Branch, Result, TreeEntry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

type Key = (Branch, String);

struct TtlEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Time-bounded memoization in front of another source.
///
/// Listings and raw text are cached per `(branch, path)`. Freshness is
/// best-effort: concurrent misses may both hit the inner source, and failed
/// fetches are never cached.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    listings: RwLock<HashMap<Key, TtlEntry<Vec<TreeEntry>>>>,
    raw: RwLock<HashMap<Key, TtlEntry<String>>>,
}

impl<S: DocumentSource> CachedSource<S> {
    /// Memoize `inner` for `ttl`.
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            listings: RwLock::new(HashMap::new()),
            raw: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped source.
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

async fn lookup<V: Clone>(map: &RwLock<HashMap<Key, TtlEntry<V>>>, key: &Key) -> Option<V> {
    let guard = map.read().await;
    guard
        .get(key)
        .filter(|entry| entry.expires_at > Instant::now())
        .map(|entry| entry.value.clone())
}

async fn store<V>(map: &RwLock<HashMap<Key, TtlEntry<V>>>, key: Key, value: V, ttl: Duration) {
    let mut guard = map.write().await;
    let now = Instant::now();
    guard.retain(|_, entry| entry.expires_at > now);
    guard.insert(
        key,
        TtlEntry {
            value,
            expires_at: now + ttl,
        },
    );
}

#[async_trait]
impl<S: DocumentSource> DocumentSource for CachedSource<S> {
    fn root_path(&self) -> &str {
        self.inner.root_path()
    }

    async fn list_dir(&self, path: &str, branch: &Branch) -> Result<Vec<TreeEntry>> {
        let key = (branch.clone(), path.to_string());
        if let Some(hit) = lookup(&self.listings, &key).await {
            debug!(%branch, path, "listing cache hit");
            return Ok(hit);
        }
        let entries = self.inner.list_dir(path, branch).await?;
        store(&self.listings, key, entries.clone(), self.ttl).await;
        Ok(entries)
    }

    async fn fetch_raw(&self, path: &str, branch: &Branch) -> Result<String> {
        let key = (branch.clone(), path.to_string());
        if let Some(hit) = lookup(&self.raw, &key).await {
            debug!(%branch, path, "raw cache hit");
            return Ok(hit);
        }
        let content = self.inner.fetch_raw(path, branch).await?;
        store(&self.raw, key, content.clone(), self.ttl).await;
        Ok(content)
    }
}
