//! Caching layer for spot listings.
//!
//! Listings are cached per category filter. Entries expire on a TTL, but
//! catalog changes are pushed in explicitly as [`Invalidation`]s so a
//! changed spot never waits out the TTL.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Category, Spot, SpotId};

/// Cache key: the category filter, `None` for the unfiltered listing.
type ListingKey = Option<Category>;

/// Cached listing entry.
type ListingEntry = Arc<Vec<Spot>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 64,
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A catalog change that makes cached listings stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// A spot entered, left, or changed within this category
    CategoryChanged(Category),
    /// A spot moved
    LocationChanged(SpotId),
}

/// Cache for spot listings.
pub struct SpotCache {
    listings: MokaCache<ListingKey, ListingEntry>,
    /// Bumped before every invalidation.
    generation: AtomicU64,
}

impl SpotCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let listings = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            listings,
            generation: AtomicU64::new(0),
        }
    }

    /// Return the cached listing for `filter`, loading it on a miss.
    ///
    /// Loader errors are returned as-is and nothing is cached. If an
    /// invalidation arrives while the loader runs, the loaded listing is
    /// returned but does not stay cached.
    pub async fn get_or_load<F, Fut, E>(
        &self,
        filter: Option<Category>,
        loader: F,
    ) -> Result<ListingEntry, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Spot>, E>>,
    {
        if let Some(cached) = self.listings.get(&filter).await {
            return Ok(cached);
        }

        let started = self.generation.load(Ordering::Acquire);
        let entry = Arc::new(loader().await?);
        self.listings.insert(filter, entry.clone()).await;

        // Checked after the insert: an invalidation that bumps the counter
        // later also removes this entry itself.
        if self.generation.load(Ordering::Acquire) != started {
            tracing::debug!(?filter, "listing invalidated during load, not keeping it");
            self.listings.invalidate(&filter).await;
        }

        Ok(entry)
    }

    /// Drop the listings a catalog change affects.
    ///
    /// A category change hits that category and the unfiltered listing.
    /// A location change hits everything.
    pub async fn invalidate(&self, change: &Invalidation) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        match change {
            Invalidation::CategoryChanged(category) => {
                self.listings.invalidate(&Some(*category)).await;
                self.listings.invalidate(&None).await;
            }
            Invalidation::LocationChanged(spot_id) => {
                tracing::debug!(%spot_id, "location changed, clearing all listings");
                self.listings.invalidate_all();
            }
        }
    }
}
