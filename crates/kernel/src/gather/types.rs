//! Gather query engine types.
//!
//! Provides type definitions for querying gallery events:
//! - QuerySpec: search, tag filter, sort, and pager parameters
//! - QueryResult: the requested page plus facets over the whole set

use serde::{Deserialize, Serialize};

use crate::models::Event;

/// Default page size.
pub const DEFAULT_PER_PAGE: u32 = 6;

/// Caller-supplied filter, sort, and pagination parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Case-insensitive substring matched against title, description,
    /// location, and tags.
    #[serde(default)]
    pub search: Option<String>,

    /// Keep events carrying any of these tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub sort_order: SortOrder,

    /// Page number (1-indexed, 0 means the first page).
    #[serde(default)]
    pub page: Option<u32>,

    /// Items per page (0 means the default).
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Locale whose collation orders titles. Root collation when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl QuerySpec {
    /// Effective page number.
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    /// Effective page size.
    pub fn per_page(&self) -> u32 {
        self.per_page.filter(|p| *p > 0).unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Lower-cased search term, if searching is enabled.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Requested tags, if tag filtering is enabled.
    pub fn selected_tags(&self) -> Option<&[String]> {
        self.tags.as_deref().filter(|t| !t.is_empty())
    }
}

/// Sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Event date, compared as a timestamp.
    #[default]
    Date,
    /// Title, compared with the collation rules of the query locale.
    Title,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Result from querying events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Events on the requested page.
    pub page: Vec<Event>,

    /// Every event that passed the filters, sorted, before paging.
    pub all_filtered: Vec<Event>,

    /// Distinct tags across the unfiltered input, sorted ascending.
    pub tags: Vec<String>,

    /// Count of `all_filtered`.
    pub total: u64,

    /// Total number of pages.
    pub page_count: u32,

    /// Current page number (1-indexed).
    pub current_page: u32,

    /// Items per page.
    pub per_page: u32,

    /// Whether there's a next page.
    pub has_next: bool,

    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl QueryResult {
    /// Create a new result with paging calculations.
    pub fn new(
        page: Vec<Event>,
        all_filtered: Vec<Event>,
        tags: Vec<String>,
        current_page: u32,
        per_page: u32,
    ) -> Self {
        let total = all_filtered.len() as u64;
        let page_count = total.div_ceil(u64::from(per_page.max(1))) as u32;

        Self {
            page,
            all_filtered,
            tags,
            total,
            page_count,
            current_page,
            per_page,
            has_next: current_page < page_count,
            has_prev: current_page > 1,
        }
    }

    /// Create an empty result.
    pub fn empty(current_page: u32, per_page: u32) -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), current_page, per_page)
    }
}
