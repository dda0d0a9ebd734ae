//! Gather query engine module.
//!
//! This module provides:
//! - query: search, tag filter, sort, and pagination over merged events
//! - Types: QuerySpec, QueryResult, SortBy, SortOrder

mod engine;
pub mod types;

pub use engine::{distinct_tags, parse_timestamp, query};
pub use types::{DEFAULT_PER_PAGE, QueryResult, QuerySpec, SortBy, SortOrder};
