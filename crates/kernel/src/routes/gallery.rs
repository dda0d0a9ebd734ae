//! Gallery API routes.
//!
//! Read-only JSON endpoints over the merged, locale-resolved event catalog.

use axum::{
    Extension, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::gather::{self, QueryResult, QuerySpec, SortBy, SortOrder};
use crate::middleware::ResolvedLanguage;
use crate::models::Event;
use crate::state::AppState;

/// Create the gallery router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/gallery/events", get(list_events))
        .route("/api/gallery/events/{slug}", get(get_event))
        .route("/api/gallery/tags", get(list_tags))
}

// -------------------------------------------------------------------------
// Request types
// -------------------------------------------------------------------------

/// Query string of the event listing.
#[derive(Debug, Default, Deserialize)]
struct ListParams {
    search: Option<String>,
    /// Comma-separated tag list.
    tags: Option<String>,
    sort_by: Option<SortBy>,
    sort_order: Option<SortOrder>,
    page: Option<u32>,
    per_page: Option<u32>,
}

impl ListParams {
    fn into_spec(self) -> QuerySpec {
        let tags = self.tags.map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()
        });

        QuerySpec {
            search: self.search,
            tags,
            sort_by: self.sort_by.unwrap_or_default(),
            sort_order: self.sort_order.unwrap_or_default(),
            page: self.page,
            per_page: self.per_page,
            locale: None,
        }
    }
}

// -------------------------------------------------------------------------
// Response types
// -------------------------------------------------------------------------

#[derive(Serialize)]
struct EventResponse {
    locale: String,
    event: Event,
}

#[derive(Serialize)]
struct TagsResponse {
    locale: String,
    tags: Vec<String>,
}

// -------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------

/// List events for the active locale.
async fn list_events(
    State(state): State<AppState>,
    Extension(ResolvedLanguage(locale)): Extension<ResolvedLanguage>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<QueryResult>> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let spec = QuerySpec {
        locale: Some(locale.clone()),
        ..params.into_spec()
    };

    let events = state.cache().events(&locale).await?;
    tracing::debug!(locale = %locale, total = events.len(), "listing events");

    Ok(Json(gather::query(&events, &spec)))
}

/// Get a single event by slug.
async fn get_event(
    State(state): State<AppState>,
    Extension(ResolvedLanguage(locale)): Extension<ResolvedLanguage>,
    Path(slug): Path<String>,
) -> AppResult<Json<EventResponse>> {
    let event = state
        .cache()
        .event(&locale, &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(EventResponse {
        locale,
        event: (*event).clone(),
    }))
}

/// Distinct tags across every event of the active locale.
async fn list_tags(
    State(state): State<AppState>,
    Extension(ResolvedLanguage(locale)): Extension<ResolvedLanguage>,
) -> AppResult<Json<TagsResponse>> {
    let events = state.cache().events(&locale).await?;
    Ok(Json(TagsResponse {
        tags: gather::distinct_tags(&events),
        locale,
    }))
}
