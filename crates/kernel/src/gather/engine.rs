//! In-memory query execution over merged events.
//!
//! Processing order is fixed: search filter, tag filter, sort, page.
//! Tag facets are computed over the unfiltered input so filter UIs can list
//! every tag regardless of the current selection.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;
use tracing::warn;

use super::types::{QueryResult, QuerySpec, SortBy, SortOrder};
use crate::models::Event;

/// Filter, sort, and page a set of events.
pub fn query(events: &[Event], spec: &QuerySpec) -> QueryResult {
    let search = spec.search_term();
    let selected_tags = spec.selected_tags();

    let filtered = events
        .iter()
        .filter(|event| search.as_deref().is_none_or(|term| matches_search(event, term)))
        .filter(|event| selected_tags.is_none_or(|tags| has_any_tag(event, tags)));

    let all_filtered: Vec<Event> = match spec.sort_by {
        SortBy::Date => {
            let mut keyed: Vec<(Option<i64>, &Event)> = filtered
                .map(|event| (parse_timestamp(&event.date), event))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| compare_timestamps(*a, *b, spec.sort_order));
            keyed.into_iter().map(|(_, event)| event.clone()).collect()
        }
        SortBy::Title => {
            let collator = title_collator(spec.locale.as_deref());
            let mut sorted: Vec<&Event> = filtered.collect();
            sorted.sort_by(|a, b| {
                directed(
                    compare_titles(collator.as_ref(), &a.title, &b.title),
                    spec.sort_order,
                )
            });
            sorted.into_iter().cloned().collect()
        }
    };

    let current_page = spec.page();
    let per_page = spec.per_page();
    let start = (current_page as usize - 1).saturating_mul(per_page as usize);
    let page = all_filtered
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect();

    QueryResult::new(page, all_filtered, distinct_tags(events), current_page, per_page)
}

/// Distinct tags across `events`, sorted ascending.
pub fn distinct_tags(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .flat_map(|event| event.tags.iter().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Parse an event date into epoch milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, and `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(date: &str) -> Option<i64> {
    let date = date.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn matches_search(event: &Event, term: &str) -> bool {
    event.title.to_lowercase().contains(term)
        || event.description.to_lowercase().contains(term)
        || event.location.to_lowercase().contains(term)
        || event.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}

fn has_any_tag(event: &Event, selected: &[String]) -> bool {
    selected.iter().any(|tag| event.tags.contains(tag))
}

/// Unparseable dates sort after every parseable date in both directions.
fn compare_timestamps(a: Option<i64>, b: Option<i64>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b), order),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Collator for `locale`, falling back to root collation for unknown or
/// unparseable tags.
fn title_collator(locale: Option<&str>) -> Option<Collator> {
    let locale = locale
        .and_then(|tag| tag.parse::<Locale>().ok())
        .unwrap_or(Locale::UND);

    match Collator::try_new(&(&locale).into(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!(locale = %locale, error = %e, "no collator, comparing by code point");
            None
        }
    }
}

/// Collation order; on a tie, lowercase sorts first.
fn compare_titles(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(collator) => collator.compare(a, b),
        None => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
            .then_with(|| b.cmp(a)),
    }
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}
