//! HTTP route handlers.

pub mod gallery;
pub mod health;

use axum::Router;

use crate::middleware::negotiate_language;
use crate::state::AppState;

/// Build the application router with locale negotiation applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(gallery::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            negotiate_language,
        ))
        .with_state(state)
}
