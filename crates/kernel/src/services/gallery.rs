//! Gallery event loading with locale fallback.
//!
//! The base locale's collection is authoritative. For any other locale the
//! matching translation (joined by slug) is overlaid onto each base record;
//! events without a translation are returned as-is.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::translation::merge;
use crate::content::{CollectionFetcher, CollectionQuery, collection_name, event_path};
use crate::gather::{SortBy, SortOrder};
use crate::models::{Event, EventPatch};

/// Default base locale.
pub const DEFAULT_BASE_LOCALE: &str = "es";

/// Loads every published event for a locale.
#[derive(Clone)]
pub struct EventRepository {
    source: Arc<dyn CollectionFetcher>,
    base_locale: String,
}

impl EventRepository {
    /// Create a repository over a content source.
    pub fn new(source: Arc<dyn CollectionFetcher>, base_locale: impl Into<String>) -> Self {
        Self {
            source,
            base_locale: base_locale.into(),
        }
    }

    /// Base locale code.
    pub fn base_locale(&self) -> &str {
        &self.base_locale
    }

    /// List events in `active_locale`, in base collection order (date descending).
    pub async fn list_events(&self, active_locale: &str) -> Result<Vec<Event>> {
        let base_collection = collection_name(&self.base_locale);
        let base_events = self
            .source
            .fetch_all(
                &base_collection,
                &CollectionQuery::published().order_by(SortBy::Date, SortOrder::Desc),
            )
            .await
            .with_context(|| format!("failed to fetch {base_collection}"))?;

        if active_locale == self.base_locale {
            return Ok(base_events);
        }

        let locale_collection = collection_name(active_locale);
        let locale_events = self
            .source
            .fetch_all(&locale_collection, &CollectionQuery::published())
            .await
            .with_context(|| format!("failed to fetch {locale_collection}"))?;

        let translations = index_by_slug(locale_events);
        debug!(
            locale = %active_locale,
            base = base_events.len(),
            translated = translations.len(),
            "merging locale events"
        );

        Ok(base_events
            .into_iter()
            .map(|base| match translations.get(base.slug()) {
                Some(translation) => merge(&base, translation),
                None => base,
            })
            .collect())
    }
}

impl std::fmt::Debug for EventRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRepository")
            .field("base_locale", &self.base_locale)
            .finish()
    }
}

/// Resolves a single event by slug.
#[derive(Clone)]
pub struct SingleEventResolver {
    source: Arc<dyn CollectionFetcher>,
    base_locale: String,
}

impl SingleEventResolver {
    /// Create a resolver over a content source.
    pub fn new(source: Arc<dyn CollectionFetcher>, base_locale: impl Into<String>) -> Self {
        Self {
            source,
            base_locale: base_locale.into(),
        }
    }

    /// Base locale code.
    pub fn base_locale(&self) -> &str {
        &self.base_locale
    }

    /// Load the event for `slug` in `active_locale`.
    ///
    /// Returns `None` when the base locale has no such event; translations
    /// alone never produce a result.
    pub async fn get_event(&self, active_locale: &str, slug: &str) -> Result<Option<Event>> {
        let base_collection = collection_name(&self.base_locale);
        let base_path = event_path(&self.base_locale, slug);
        let Some(base) = self
            .source
            .fetch_one(&base_collection, &base_path)
            .await
            .with_context(|| format!("failed to fetch {base_path} from {base_collection}"))?
        else {
            debug!(slug = %slug, "no base event");
            return Ok(None);
        };

        if active_locale == self.base_locale {
            return Ok(Some(base));
        }

        let locale_collection = collection_name(active_locale);
        let locale_path = event_path(active_locale, slug);
        let translation = self
            .source
            .fetch_one(&locale_collection, &locale_path)
            .await
            .with_context(|| format!("failed to fetch {locale_path} from {locale_collection}"))?;

        Ok(Some(match translation {
            Some(translation) => merge(&base, &EventPatch::from(translation)),
            None => base,
        }))
    }
}

impl std::fmt::Debug for SingleEventResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleEventResolver")
            .field("base_locale", &self.base_locale)
            .finish()
    }
}

/// Key translations by slug; a later duplicate replaces the earlier one.
fn index_by_slug(events: Vec<Event>) -> HashMap<String, EventPatch> {
    let mut index = HashMap::with_capacity(events.len());
    for event in events {
        let slug = event.slug().to_string();
        if index.insert(slug.clone(), EventPatch::from(event)).is_some() {
            warn!(slug = %slug, "duplicate slug in locale collection, keeping the later record");
        }
    }
    index
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn event(path: &str, title: &str) -> Event {
        serde_json::from_value(serde_json::json!({
            "id": path,
            "path": path,
            "title": title,
            "location": "L",
            "date": "2024-01-01",
            "description": "D"
        }))
        .unwrap()
    }

    #[test]
    fn index_keeps_later_duplicate() {
        let index = index_by_slug(vec![
            event("/en/tokyo", "First"),
            event("/en/berlin", "Berlin"),
            event("/en/tokyo", "Second"),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index["tokyo"].title.as_deref(), Some("Second"));
    }

    #[test]
    fn debug_shows_base_locale() {
        let source: Arc<dyn CollectionFetcher> =
            Arc::new(crate::content::InMemoryContentSource::new());
        let repo = EventRepository::new(source, DEFAULT_BASE_LOCALE);
        assert!(format!("{repo:?}").contains("\"es\""));
    }
}
