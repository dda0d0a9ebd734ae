//! Content collection access.
//!
//! Events are stored in one collection per locale (`gallery_{locale}`).
//! Everything above this layer reads content through [`CollectionFetcher`].

use anyhow::Result;
use async_trait::async_trait;

use crate::gather::{SortBy, SortOrder};
use crate::models::Event;

/// Prefix shared by every gallery collection name.
pub const COLLECTION_PREFIX: &str = "gallery_";

/// Collection holding the gallery events of a locale.
pub fn collection_name(locale: &str) -> String {
    format!("{COLLECTION_PREFIX}{locale}")
}

/// Content path of an event in a locale.
pub fn event_path(locale: &str, slug: &str) -> String {
    format!("/{locale}/{slug}")
}

/// Ordering applied by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: SortBy,
    pub order: SortOrder,
}

/// Options for listing a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    /// Leave out records marked `draft`.
    pub exclude_drafts: bool,

    /// Store-side ordering (string comparison on the field).
    pub order_by: Option<OrderBy>,
}

impl CollectionQuery {
    /// Published records, in store order.
    pub fn published() -> Self {
        Self {
            exclude_drafts: true,
            order_by: None,
        }
    }

    /// Add store-side ordering.
    pub fn order_by(mut self, field: SortBy, order: SortOrder) -> Self {
        self.order_by = Some(OrderBy { field, order });
        self
    }

    /// Apply draft exclusion and ordering to a loaded collection.
    pub fn apply(&self, mut events: Vec<Event>) -> Vec<Event> {
        if self.exclude_drafts {
            events.retain(|e| !e.draft);
        }
        if let Some(OrderBy { field, order }) = self.order_by {
            events.sort_by(|a, b| {
                let ordering = match field {
                    SortBy::Date => a.date.cmp(&b.date),
                    SortBy::Title => a.title.cmp(&b.title),
                };
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
        events
    }
}

/// Source of gallery records.
///
/// Implementations do no schema validation beyond deserializing the
/// record shape.
#[async_trait]
pub trait CollectionFetcher: Send + Sync {
    /// List the records of a collection.
    async fn fetch_all(&self, collection: &str, query: &CollectionQuery) -> Result<Vec<Event>>;

    /// Load one published record by its content path.
    async fn fetch_one(&self, collection: &str, path: &str) -> Result<Option<Event>>;
}
