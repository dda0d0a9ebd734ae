//! In-memory content collections.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::source::{CollectionFetcher, CollectionQuery};
use crate::models::Event;

/// Content source holding collections in memory.
///
/// Records keep insertion order, which acts as the store order.
#[derive(Debug, Default)]
pub struct InMemoryContentSource {
    collections: RwLock<HashMap<String, Vec<Event>>>,
}

impl InMemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_event(self, collection: &str, event: Event) -> Self {
        self.insert(collection, event);
        self
    }

    /// Append a record to a collection.
    pub fn insert(&self, collection: &str, event: Event) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(event);
    }

    /// Drop every record of a collection.
    pub fn clear(&self, collection: &str) {
        self.collections.write().remove(collection);
    }
}

#[async_trait]
impl CollectionFetcher for InMemoryContentSource {
    async fn fetch_all(&self, collection: &str, query: &CollectionQuery) -> Result<Vec<Event>> {
        let events = self
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default();
        Ok(query.apply(events))
    }

    async fn fetch_one(&self, collection: &str, path: &str) -> Result<Option<Event>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|events| events.iter().find(|e| e.path == path && !e.draft))
            .cloned())
    }
}
