//! Kernel services.
//!
//! Event loading with locale fallback and the translation overlay that
//! backs it.

pub mod gallery;
pub mod translation;

pub use gallery::{DEFAULT_BASE_LOCALE, EventRepository, SingleEventResolver};
pub use translation::{EventField, MergePolicy, is_auto_title, merge, merge_with};
