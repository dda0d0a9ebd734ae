#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Event repository, resolver, and cache integration tests.

mod common;

use std::sync::Arc;

use galeria_test_utils::{test_event, translation};
use serde_json::json;

use common::{CountingSource, FailingSource, GatedSource, event, event_json, source};
use galeria_kernel::cache::{CacheSettings, EventView, EventsView, GalleryCache, LoadStatus};
use galeria_kernel::content::{CollectionFetcher, InMemoryContentSource};
use galeria_kernel::gather::QuerySpec;
use galeria_kernel::models::Event;
use galeria_kernel::services::{EventRepository, SingleEventResolver};

fn base_events() -> Vec<Event> {
    vec![
        event(&test_event("/es/tokyo", "Noches de Tokio").with_date("2024-03-01")),
        event(&test_event("/es/berlin", "Berlín").with_date("2024-05-01")),
        event(&test_event("/es/borrador", "Borrador").with_date("2024-06-01").draft()),
    ]
}

fn fixture() -> InMemoryContentSource {
    source(&[
        ("gallery_es", base_events()),
        (
            "gallery_en",
            vec![
                event_json(translation(
                    "/en/tokyo",
                    json!({ "title": "Tokyo Nights", "description": "Night photos" }),
                )),
                event_json(translation("/en/orphan", json!({ "title": "Orphan" }))),
            ],
        ),
        (
            "gallery_de",
            vec![event_json(translation(
                "/de/berlin",
                json!({ "title": "berlin", "location": "Berlin-Mitte" }),
            ))],
        ),
    ])
}

fn repository(source: impl CollectionFetcher + 'static) -> EventRepository {
    EventRepository::new(Arc::new(source), "es")
}

fn titles(events: &[Event]) -> Vec<&str> {
    events.iter().map(|e| e.title.as_str()).collect()
}

// -------------------------------------------------------------------------
// EventRepository tests
// -------------------------------------------------------------------------

#[tokio::test]
async fn base_locale_returns_published_by_date_desc() {
    let events = repository(fixture()).list_events("es").await.unwrap();
    assert_eq!(titles(&events), vec!["Berlín", "Noches de Tokio"]);
}

#[tokio::test]
async fn other_locale_overlays_matching_translations() {
    let events = repository(fixture()).list_events("en").await.unwrap();

    assert_eq!(titles(&events), vec!["Berlín", "Tokyo Nights"]);
    let tokyo = &events[1];
    assert_eq!(tokyo.description, "Night photos");
    // Blank translated fields fall back to the base record.
    assert_eq!(tokyo.location, "Madrid");
    assert_eq!(tokyo.date, "2024-03-01");
}

#[tokio::test]
async fn translations_without_base_are_ignored() {
    let events = repository(fixture()).list_events("en").await.unwrap();
    assert!(events.iter().all(|e| e.slug() != "orphan"));
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn slug_generated_title_keeps_base_title() {
    let events = repository(fixture()).list_events("de").await.unwrap();
    let berlin = events.iter().find(|e| e.slug() == "berlin").unwrap();

    assert_eq!(berlin.title, "Berlín");
    assert_eq!(berlin.location, "Berlin-Mitte");
}

#[tokio::test]
async fn locale_without_translations_returns_base() {
    let events = repository(fixture()).list_events("fr").await.unwrap();
    assert_eq!(events, repository(fixture()).list_events("es").await.unwrap());
}

#[tokio::test]
async fn failing_base_collection_propagates() {
    let result = repository(FailingSource::new(fixture(), "gallery_es"))
        .list_events("en")
        .await;

    let error = result.unwrap_err();
    assert!(format!("{error:#}").contains("store unreachable"));
}

#[tokio::test]
async fn failing_locale_collection_propagates() {
    let result = repository(FailingSource::new(fixture(), "gallery_en"))
        .list_events("en")
        .await;
    assert!(result.is_err());
}

// -------------------------------------------------------------------------
// SingleEventResolver tests
// -------------------------------------------------------------------------

#[tokio::test]
async fn resolver_merges_translation() {
    let resolver = SingleEventResolver::new(Arc::new(fixture()), "es");
    let tokyo = resolver.get_event("en", "tokyo").await.unwrap().unwrap();

    assert_eq!(tokyo.title, "Tokyo Nights");
    assert_eq!(tokyo.location, "Madrid");
}

#[tokio::test]
async fn resolver_without_base_returns_none() {
    let resolver = SingleEventResolver::new(Arc::new(fixture()), "es");

    assert!(resolver.get_event("en", "orphan").await.unwrap().is_none());
    assert!(resolver.get_event("es", "borrador").await.unwrap().is_none());
}

#[tokio::test]
async fn resolver_without_translation_returns_base() {
    let resolver = SingleEventResolver::new(Arc::new(fixture()), "es");
    let berlin = resolver.get_event("en", "berlin").await.unwrap().unwrap();
    assert_eq!(berlin.title, "Berlín");
}

// -------------------------------------------------------------------------
// GalleryCache tests
// -------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_loads_share_one_fetch() {
    let counting = Arc::new(CountingSource::new(fixture()));
    let cache = GalleryCache::new(counting.clone(), "es", CacheSettings::default());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.events("en").await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().len(), 2);
    }

    // One base fetch plus one locale fetch.
    assert_eq!(counting.fetch_all_calls(), 2);
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let counting = Arc::new(CountingSource::new(fixture()));
    let cache = GalleryCache::new(counting.clone(), "es", CacheSettings::default());

    cache.events("es").await.unwrap();
    cache.events("es").await.unwrap();
    assert_eq!(counting.fetch_all_calls(), 1);

    cache.invalidate_all();
    cache.events("es").await.unwrap();
    assert_eq!(counting.fetch_all_calls(), 2);
}

#[tokio::test]
async fn single_events_are_cached_per_locale() {
    let counting = Arc::new(CountingSource::new(fixture()));
    let cache = GalleryCache::new(counting.clone(), "es", CacheSettings::default());

    let en = cache.event("en", "tokyo").await.unwrap().unwrap();
    let es = cache.event("es", "tokyo").await.unwrap().unwrap();
    cache.event("en", "tokyo").await.unwrap();

    assert_eq!(en.title, "Tokyo Nights");
    assert_eq!(es.title, "Noches de Tokio");
    // en: base + translation, es: base only.
    assert_eq!(counting.fetch_one_calls(), 3);
}

#[tokio::test]
async fn cache_surfaces_source_errors() {
    let cache = GalleryCache::new(
        Arc::new(FailingSource::new(fixture(), "gallery_es")),
        "es",
        CacheSettings::default(),
    );
    assert!(cache.events("es").await.is_err());
}

// -------------------------------------------------------------------------
// View tests
// -------------------------------------------------------------------------

#[tokio::test]
async fn slow_previous_locale_does_not_overwrite_current() {
    let gated = Arc::new(GatedSource::new(fixture(), "gallery_en"));
    let cache = GalleryCache::new(gated.clone(), "es", CacheSettings::default());
    let view = Arc::new(EventsView::new(cache));

    let slow = {
        let view = view.clone();
        tokio::spawn(async move { view.load("en").await })
    };
    gated.started.notified().await;
    assert!(view.is_loading());

    assert_eq!(view.load("de").await, LoadStatus::Success);
    gated.release.notify_one();
    slow.await.unwrap();

    assert_eq!(view.locale().as_deref(), Some("de"));
    assert_eq!(view.status(), LoadStatus::Success);
    let result = view.query(&QuerySpec::default());
    assert_eq!(
        result.page.iter().map(|e| e.location.as_str()).collect::<Vec<_>>(),
        vec!["Berlin-Mitte", "Madrid"]
    );
}

#[tokio::test]
async fn view_reports_errors() {
    let cache = GalleryCache::new(
        Arc::new(FailingSource::new(fixture(), "gallery_en")),
        "es",
        CacheSettings::default(),
    );
    let view = EventsView::new(cache);

    assert_eq!(view.load("en").await, LoadStatus::Error);
    assert!(view.error().unwrap().contains("store unreachable"));
    assert_eq!(view.query(&QuerySpec::default()).total, 0);
}

#[tokio::test]
async fn event_view_follows_latest_slug() {
    let cache = GalleryCache::new(Arc::new(fixture()), "es", CacheSettings::default());
    let view = EventView::new(cache);

    view.load("en", "tokyo").await;
    view.load("en", "berlin").await;

    assert_eq!(view.event().unwrap().title, "Berlín");
}
