//! Content source module.
//!
//! This module provides:
//! - CollectionFetcher: async access to per-locale gallery collections
//! - MarkdownContentSource: collections read from Markdown files on disk
//! - InMemoryContentSource: collections held in memory

mod error;
mod markdown;
mod memory;
mod source;

pub use error::ContentError;
pub use markdown::MarkdownContentSource;
pub use memory::InMemoryContentSource;
pub use source::{
    COLLECTION_PREFIX, CollectionFetcher, CollectionQuery, OrderBy, collection_name, event_path,
};
