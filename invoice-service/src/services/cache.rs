//! Rendered-view cache with path-based invalidation.
//!
//! Each render records the generation it started from. An invalidation bumps
//! the generation, so a render that raced with a write is never stored.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::services::metrics::CACHE_INVALIDATIONS_TOTAL;

/// Signal that the cached rendering of a view path is stale.
pub trait Revalidate: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

#[derive(Debug, Clone)]
pub struct CachedView {
    pub body: Arc<str>,
    pub rendered_at: DateTime<Utc>,
}

impl CachedView {
    /// Whole seconds since the render, for the `Age` header.
    pub fn age_secs(&self) -> u64 {
        (Utc::now() - self.rendered_at).num_seconds().max(0) as u64
    }
}

#[derive(Debug, Default)]
pub struct ViewCache {
    entries: DashMap<String, CachedView>,
    generation: AtomicU64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<CachedView> {
        self.entries.get(path).map(|entry| entry.value().clone())
    }

    /// Generation to pass to [`ViewCache::store`] once the render completes.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store a render unless the cache was invalidated since `generation`.
    /// Returns whether the render was kept.
    pub fn store(&self, path: &str, generation: u64, body: Arc<str>) -> bool {
        if self.generation() != generation {
            return false;
        }

        self.entries.insert(
            path.to_string(),
            CachedView {
                body,
                rendered_at: Utc::now(),
            },
        );

        // An invalidation may have landed between the check and the insert.
        if self.generation() != generation {
            self.entries.remove(path);
            return false;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Revalidate for ViewCache {
    fn revalidate_path(&self, path: &str) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let evicted = self.entries.remove(path).is_some();

        CACHE_INVALIDATIONS_TOTAL
            .with_label_values(&[path])
            .inc();

        tracing::debug!(path = %path, evicted = evicted, "View cache revalidated");
    }
}
