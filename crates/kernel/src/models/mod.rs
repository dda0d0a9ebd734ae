//! Content models.

pub mod event;

pub use event::{Body, Cover, Event, EventPatch, Link, Photo, Seo, slug_of};
