//! Locale-bound views over the gallery cache.

use std::sync::Arc;

use super::GalleryCache;
use super::slot::{LoadStatus, Slot};
use crate::gather::{self, QueryResult, QuerySpec};
use crate::models::Event;

/// Event list for the most recently requested locale.
#[derive(Debug)]
pub struct EventsView {
    cache: GalleryCache,
    slot: Slot<String, Arc<Vec<Event>>>,
}

impl EventsView {
    pub fn new(cache: GalleryCache) -> Self {
        Self {
            cache,
            slot: Slot::new(),
        }
    }

    /// Load events for `locale`. A slower load for a previous locale that
    /// finishes afterwards is discarded.
    pub async fn load(&self, locale: &str) -> LoadStatus {
        self.slot
            .load(locale.to_string(), self.cache.events(locale))
            .await
    }

    pub fn status(&self) -> LoadStatus {
        self.slot.status()
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_loading()
    }

    /// Locale of the current list.
    pub fn locale(&self) -> Option<String> {
        self.slot.key()
    }

    pub fn error(&self) -> Option<String> {
        self.slot.error()
    }

    pub fn events(&self) -> Option<Arc<Vec<Event>>> {
        self.slot.value()
    }

    /// Filter, sort, and page the current list. Empty until a load succeeds.
    ///
    /// Titles collate by the loaded locale unless `spec` names one.
    pub fn query(&self, spec: &QuerySpec) -> QueryResult {
        match self.slot.value() {
            Some(events) if spec.locale.is_none() => {
                let spec = QuerySpec {
                    locale: self.slot.key(),
                    ..spec.clone()
                };
                gather::query(&events, &spec)
            }
            Some(events) => gather::query(&events, spec),
            None => QueryResult::empty(spec.page(), spec.per_page()),
        }
    }
}

/// A single event for the most recently requested (locale, slug).
#[derive(Debug)]
pub struct EventView {
    cache: GalleryCache,
    slot: Slot<(String, String), Option<Arc<Event>>>,
}

impl EventView {
    pub fn new(cache: GalleryCache) -> Self {
        Self {
            cache,
            slot: Slot::new(),
        }
    }

    pub async fn load(&self, locale: &str, slug: &str) -> LoadStatus {
        self.slot
            .load(
                (locale.to_string(), slug.to_string()),
                self.cache.event(locale, slug),
            )
            .await
    }

    pub fn status(&self) -> LoadStatus {
        self.slot.status()
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.slot.error()
    }

    /// The loaded event; `None` while loading or when it does not exist.
    pub fn event(&self) -> Option<Arc<Event>> {
        self.slot.value().flatten()
    }
}
