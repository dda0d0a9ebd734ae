//! Keyed load slot.
//!
//! A slot holds the latest value for the key it was last asked to load.
//! A fetch that finishes after the slot moved on to another key is
//! dropped, so a slow response for an old locale never overwrites the
//! current one.

use std::fmt::{self, Debug, Display};
use std::future::Future;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

/// Load state of a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch for the current key is in flight.
    Pending,
    /// The current key's value is available.
    Success,
    /// The current key's fetch failed.
    Error,
}

struct SlotState<K, V> {
    key: Option<K>,
    status: LoadStatus,
    value: Option<V>,
    error: Option<String>,
}

/// Holds the latest result for the most recently requested key.
pub struct Slot<K, V> {
    state: Mutex<SlotState<K, V>>,
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Self {
            state: Mutex::new(SlotState {
                key: None,
                status: LoadStatus::Idle,
                value: None,
                error: None,
            }),
        }
    }
}

impl<K, V> Slot<K, V>
where
    K: Clone + PartialEq + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as the one being loaded.
    ///
    /// Switching to a different key clears the previous value; reloading
    /// the same key keeps it visible until the new result lands.
    pub fn begin(&self, key: K) {
        let mut state = self.state.lock();
        if state.key.as_ref() != Some(&key) {
            state.value = None;
            state.key = Some(key);
        }
        state.status = LoadStatus::Pending;
        state.error = None;
    }

    /// Store the result of a fetch for `key`.
    ///
    /// Returns `false` and drops the result when `key` is no longer the
    /// slot's current key.
    pub fn finish<E: Display>(&self, key: &K, result: Result<V, E>) -> bool {
        let mut state = self.state.lock();
        if state.key.as_ref() != Some(key) {
            debug!(key = ?key, current = ?state.key, "discarding stale result");
            return false;
        }

        match result {
            Ok(value) => {
                state.value = Some(value);
                state.status = LoadStatus::Success;
                state.error = None;
            }
            Err(e) => {
                state.status = LoadStatus::Error;
                state.error = Some(format!("{e:#}"));
            }
        }
        true
    }

    /// Begin `key`, await `fetch`, and store its result if still current.
    pub async fn load<F, E>(&self, key: K, fetch: F) -> LoadStatus
    where
        F: Future<Output = Result<V, E>>,
        E: Display,
    {
        self.begin(key.clone());
        let result = fetch.await;
        self.finish(&key, result);
        self.status()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.lock().status
    }

    pub fn is_loading(&self) -> bool {
        self.status() == LoadStatus::Pending
    }

    /// Key most recently passed to [`begin`](Self::begin).
    pub fn key(&self) -> Option<K> {
        self.state.lock().key.clone()
    }

    /// Value for the current key, if loaded.
    pub fn value(&self) -> Option<V> {
        self.state.lock().value.clone()
    }

    /// Error message of the last failed fetch for the current key.
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }
}

impl<K: Debug, V> Debug for Slot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Slot")
            .field("key", &state.key)
            .field("status", &state.status)
            .finish()
    }
}
