//! Galeria Kernel Library
//!
//! Multilingual gallery-event catalog: locale-fallback merging, content
//! sources, query engine, cache, and the HTTP surface.
//! The main entry point for running the server is the `galeria` binary.

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod gather;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use cache::{EventView, EventsView, GalleryCache, LoadStatus};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
