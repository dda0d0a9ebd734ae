//! Event cache with per-key request coalescing.
//!
//! Merged event lists are cached per locale and single events per
//! (locale, slug). Concurrent misses on the same key share one fetch;
//! failed fetches are not cached.

mod slot;
mod view;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::content::CollectionFetcher;
use crate::models::Event;
use crate::services::{EventRepository, SingleEventResolver};

pub use slot::{LoadStatus, Slot};
pub use view::{EventView, EventsView};

/// Default TTL for cached entries (60 seconds).
pub const DEFAULT_TTL_SECS: u64 = 60;

/// Default maximum number of cached entries per cache.
pub const DEFAULT_MAX_CAPACITY: u64 = 1_000;

/// Error shared by every caller waiting on the same fetch.
pub type SharedError = Arc<anyhow::Error>;

/// Cache tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// Cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Every event of a locale.
    Events { locale: String },
    /// One event of a locale.
    Event { locale: String, slug: String },
}

impl CacheKey {
    pub fn events(locale: &str) -> Self {
        Self::Events {
            locale: locale.to_string(),
        }
    }

    pub fn event(locale: &str, slug: &str) -> Self {
        Self::Event {
            locale: locale.to_string(),
            slug: slug.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Events { locale } => write!(f, "gallery-events-{locale}"),
            Self::Event { locale, slug } => write!(f, "gallery-event-{locale}-{slug}"),
        }
    }
}

/// Cached, coalescing front for the repository and resolver.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct GalleryCache {
    inner: Arc<GalleryCacheInner>,
}

struct GalleryCacheInner {
    repository: EventRepository,
    resolver: SingleEventResolver,
    lists: Cache<CacheKey, Arc<Vec<Event>>>,
    events: Cache<CacheKey, Option<Arc<Event>>>,
}

impl GalleryCache {
    /// Create a cache over a content source.
    pub fn new(
        source: Arc<dyn CollectionFetcher>,
        base_locale: &str,
        settings: CacheSettings,
    ) -> Self {
        let lists = Cache::builder()
            .max_capacity(settings.max_capacity)
            .time_to_live(settings.ttl)
            .build();
        let events = Cache::builder()
            .max_capacity(settings.max_capacity)
            .time_to_live(settings.ttl)
            .build();

        Self {
            inner: Arc::new(GalleryCacheInner {
                repository: EventRepository::new(source.clone(), base_locale),
                resolver: SingleEventResolver::new(source, base_locale),
                lists,
                events,
            }),
        }
    }

    /// Base locale code.
    pub fn base_locale(&self) -> &str {
        self.inner.repository.base_locale()
    }

    /// Merged events for a locale.
    pub async fn events(&self, locale: &str) -> Result<Arc<Vec<Event>>, SharedError> {
        let key = CacheKey::events(locale);
        let repository = &self.inner.repository;
        self.inner
            .lists
            .try_get_with(key.clone(), async move {
                debug!(key = %key, "cache miss");
                repository.list_events(locale).await.map(Arc::new)
            })
            .await
    }

    /// Merged event for a locale and slug; `None` when no base event exists.
    pub async fn event(&self, locale: &str, slug: &str) -> Result<Option<Arc<Event>>, SharedError> {
        let key = CacheKey::event(locale, slug);
        let resolver = &self.inner.resolver;
        self.inner
            .events
            .try_get_with(key.clone(), async move {
                debug!(key = %key, "cache miss");
                resolver
                    .get_event(locale, slug)
                    .await
                    .map(|event| event.map(Arc::new))
            })
            .await
    }

    /// Drop every cached entry (e.g., after content changes on disk).
    pub fn invalidate_all(&self) {
        self.inner.lists.invalidate_all();
        self.inner.events.invalidate_all();
        debug!("gallery cache invalidated");
    }

    /// Get cache statistics (for monitoring).
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            list_entry_count: self.inner.lists.entry_count(),
            event_entry_count: self.inner.events.entry_count(),
        }
    }
}

impl fmt::Debug for GalleryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryCache")
            .field("base_locale", &self.base_locale())
            .finish()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached event lists.
    pub list_entry_count: u64,

    /// Number of cached single events.
    pub event_entry_count: u64,
}
