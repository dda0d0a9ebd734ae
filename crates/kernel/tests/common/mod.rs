#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Builds real kernel components over in-memory content, plus content
//! sources that count calls, fail, or block until released.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use galeria_test_utils::TestEvent;
use http_body_util::BodyExt;
use tokio::sync::Notify;
use tower::ServiceExt;

use galeria_kernel::content::{CollectionFetcher, CollectionQuery, InMemoryContentSource};
use galeria_kernel::models::Event;
use galeria_kernel::{AppState, Config};

/// Convert a fixture into a kernel event.
pub fn event(fixture: &TestEvent) -> Event {
    serde_json::from_value(fixture.to_json()).expect("fixture is a valid event")
}

/// Convert raw JSON into a kernel event.
pub fn event_json(value: serde_json::Value) -> Event {
    serde_json::from_value(value).expect("valid event JSON")
}

/// In-memory source holding the given records per collection.
pub fn source(collections: &[(&str, Vec<Event>)]) -> InMemoryContentSource {
    let source = InMemoryContentSource::new();
    for (collection, events) in collections {
        for event in events {
            source.insert(collection, event.clone());
        }
    }
    source
}

/// Content source that counts `fetch_all` calls per run.
pub struct CountingSource {
    inner: InMemoryContentSource,
    pub fetch_all_calls: AtomicUsize,
    pub fetch_one_calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(inner: InMemoryContentSource) -> Self {
        Self {
            inner,
            fetch_all_calls: AtomicUsize::new(0),
            fetch_one_calls: AtomicUsize::new(0),
        }
    }

    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_one_calls(&self) -> usize {
        self.fetch_one_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectionFetcher for CountingSource {
    async fn fetch_all(&self, collection: &str, query: &CollectionQuery) -> Result<Vec<Event>> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to pile up on the same key.
        tokio::task::yield_now().await;
        self.inner.fetch_all(collection, query).await
    }

    async fn fetch_one(&self, collection: &str, path: &str) -> Result<Option<Event>> {
        self.fetch_one_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_one(collection, path).await
    }
}

/// Content source failing every call for one collection.
pub struct FailingSource {
    inner: InMemoryContentSource,
    failing_collection: String,
}

impl FailingSource {
    pub fn new(inner: InMemoryContentSource, failing_collection: &str) -> Self {
        Self {
            inner,
            failing_collection: failing_collection.to_string(),
        }
    }
}

#[async_trait]
impl CollectionFetcher for FailingSource {
    async fn fetch_all(&self, collection: &str, query: &CollectionQuery) -> Result<Vec<Event>> {
        if collection == self.failing_collection {
            anyhow::bail!("store unreachable");
        }
        self.inner.fetch_all(collection, query).await
    }

    async fn fetch_one(&self, collection: &str, path: &str) -> Result<Option<Event>> {
        if collection == self.failing_collection {
            anyhow::bail!("store unreachable");
        }
        self.inner.fetch_one(collection, path).await
    }
}

/// Content source whose `fetch_all` for one collection waits for `release`.
pub struct GatedSource {
    inner: InMemoryContentSource,
    gated_collection: String,
    pub started: Notify,
    pub release: Notify,
}

impl GatedSource {
    pub fn new(inner: InMemoryContentSource, gated_collection: &str) -> Self {
        Self {
            inner,
            gated_collection: gated_collection.to_string(),
            started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl CollectionFetcher for GatedSource {
    async fn fetch_all(&self, collection: &str, query: &CollectionQuery) -> Result<Vec<Event>> {
        if collection == self.gated_collection {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.inner.fetch_all(collection, query).await
    }

    async fn fetch_one(&self, collection: &str, path: &str) -> Result<Option<Event>> {
        self.inner.fetch_one(collection, path).await
    }
}

/// Test application wrapping the real router.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new(source: Arc<dyn CollectionFetcher>) -> Self {
        let state = AppState::with_source(&Config::default(), source);
        let router = galeria_kernel::routes::app(state.clone());
        Self { state, router }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// GET a URI, optionally with an Accept-Language header, and parse JSON.
    pub async fn get_json(
        &self,
        uri: &str,
        accept_language: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = accept_language {
            builder = builder.header("accept-language", value);
        }
        let (status, body) = self.request(builder.body(Body::empty()).unwrap()).await;
        let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
