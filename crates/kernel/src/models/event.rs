//! Gallery event model.
//!
//! Events live in one content collection per locale. The base locale holds
//! complete records; other locales hold partial translations that are joined
//! to their base record by slug (the final path segment).

use serde::{Deserialize, Serialize};

/// Gallery event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Content-source identifier.
    pub id: String,

    /// Locale-prefixed path (e.g., "/es/my-event").
    pub path: String,

    pub title: String,

    pub location: String,

    /// Event date (ISO `YYYY-MM-DD`).
    pub date: String,

    /// Free-form duration (e.g., "3 days").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation: Option<String>,

    /// Related links, in display order.
    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,

    /// Tags for filtering, in authored order.
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,

    /// Photo gallery, in display order.
    #[serde(default)]
    pub photos: Vec<Photo>,

    /// Icon shown in listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Unpublished events never leave the content source.
    #[serde(default)]
    pub draft: bool,

    /// Rendered rich content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

impl Event {
    /// Slug of this event (cross-locale join key).
    pub fn slug(&self) -> &str {
        slug_of(&self.path)
    }
}

/// Related link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// SEO overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Cover image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    pub src: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Gallery photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub src: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Rich content document.
///
/// Either a tree of child nodes or a single flat value. Nodes are opaque to
/// the kernel; only emptiness matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub children: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl Body {
    /// Wrap a flat value (e.g., rendered HTML).
    pub fn from_value(value: impl Into<serde_json::Value>) -> Self {
        Self {
            children: Vec::new(),
            value: Some(value.into()),
        }
    }

    /// Whether the document carries any content.
    pub fn has_content(&self) -> bool {
        !self.children.is_empty() || self.value.as_ref().is_some_and(is_truthy)
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Partial event used as a translation overlay.
///
/// Absent fields fall back to the base record. Converting a full [`Event`]
/// yields a patch with every field present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPatch {
    pub id: Option<String>,
    pub path: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub about: Option<String>,
    pub participation: Option<String>,
    pub links: Option<Vec<Link>>,
    pub seo: Option<Seo>,
    pub tags: Option<Vec<String>>,
    pub cover: Option<Cover>,
    pub photos: Option<Vec<Photo>>,
    pub icon: Option<String>,
    pub draft: Option<bool>,
    pub body: Option<Body>,
}

impl EventPatch {
    /// Slug derived from the patch's own path, or "" when it has none.
    pub fn slug(&self) -> &str {
        self.path.as_deref().map(slug_of).unwrap_or_default()
    }
}

impl From<Event> for EventPatch {
    fn from(event: Event) -> Self {
        Self {
            id: Some(event.id),
            path: Some(event.path),
            title: Some(event.title),
            location: Some(event.location),
            date: Some(event.date),
            duration: event.duration,
            description: Some(event.description),
            about: event.about,
            participation: event.participation,
            links: Some(event.links),
            seo: event.seo,
            tags: Some(event.tags),
            cover: event.cover,
            photos: Some(event.photos),
            icon: event.icon,
            draft: Some(event.draft),
            body: event.body,
        }
    }
}

/// Final `/`-separated segment of a content path.
pub fn slug_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}
