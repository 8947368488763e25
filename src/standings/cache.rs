//! In-memory holder for the latest standings snapshot.
//!
//! Exactly one snapshot is live at a time. `set` swaps the `Arc` under a
//! write lock, so readers observe either the old or the new table in full.
//! There is no TTL: a snapshot stays until it is replaced, and freshness is
//! judged by callers from `fetched_at`.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::models::StandingsSnapshot;

/// Thread-safe, single-slot standings cache.
#[derive(Clone, Default)]
pub struct StandingsCache {
    inner: Arc<RwLock<Option<Arc<StandingsSnapshot>>>>,
}

impl StandingsCache {
    pub fn new() -> Self {
        StandingsCache::default()
    }

    /// Current snapshot, or `None` if nothing has been acquired yet.
    pub async fn get(&self) -> Option<Arc<StandingsSnapshot>> {
        self.inner.read().await.clone()
    }

    /// Replace the current snapshot unconditionally.
    pub async fn set(&self, snapshot: Arc<StandingsSnapshot>) {
        let rows = snapshot.rows.len();
        *self.inner.write().await = Some(snapshot);
        debug!(rows, "StandingsCache: snapshot replaced");
    }
}
