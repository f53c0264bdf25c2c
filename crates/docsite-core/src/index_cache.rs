//! Per-branch memoization of search indexes.
//!
//! Every branch has its own slot guarded by an async mutex. A caller that
//! finds the slot stale rebuilds while holding the lock, so concurrent
//! callers for the same branch wait for that one build and reuse its
//! result. Branches never block each other.

use crate::{Branch, Result, SearchIndex};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

struct CachedIndex {
    index: Arc<SearchIndex>,
    built: Instant,
}

#[derive(Default)]
struct Slot {
    entry: Mutex<Option<CachedIndex>>,
}

/// Single-flight, time-bounded cache of one [`SearchIndex`] per branch.
pub struct IndexCache {
    ttl: Duration,
    slots: Mutex<HashMap<Branch, Arc<Slot>>>,
}

impl IndexCache {
    /// Empty cache whose entries go stale after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Freshness window.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn slot(&self, branch: &Branch) -> Arc<Slot> {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(branch.clone()).or_default())
    }

    /// Return the cached index for `branch`, running `build` when it is
    /// missing or older than the TTL.
    ///
    /// If a rebuild fails and an older index exists, the older index is
    /// returned and kept; its age is not reset, so the next call retries.
    /// Transient failures log at `warn`, anything else at `error`.
    pub async fn get_or_build<F, Fut>(&self, branch: &Branch, build: F) -> Result<Arc<SearchIndex>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SearchIndex>>,
    {
        let slot = self.slot(branch).await;
        let mut entry = slot.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.built.elapsed() < self.ttl {
                debug!(%branch, "index cache hit");
                return Ok(Arc::clone(&cached.index));
            }
            debug!(%branch, "index cache entry expired");
        }

        match build().await {
            Ok(index) => {
                let index = Arc::new(index);
                info!(%branch, documents = index.len(), "index cached");
                *entry = Some(CachedIndex {
                    index: Arc::clone(&index),
                    built: Instant::now(),
                });
                Ok(index)
            },
            Err(err) => match entry.as_ref() {
                Some(stale) => {
                    if err.is_recoverable() {
                        warn!(%branch, error = %err, "index rebuild failed, serving stale index");
                    } else {
                        error!(
                            %branch,
                            category = err.category(),
                            error = %err,
                            "index rebuild failed, serving stale index"
                        );
                    }
                    Ok(Arc::clone(&stale.index))
                },
                None => Err(err),
            },
        }
    }
}
