//! Galeria test utilities.
//!
//! Helpers for integration testing: gallery event fixtures, Markdown file
//! rendering, and assertion utilities for JSON responses.

use serde_json::{Map, Value as JsonValue, json};

/// Create a test event with default values.
///
/// `path` is the full event path, e.g. `/es/tokyo`.
pub fn test_event(path: &str, title: &str) -> TestEvent {
    TestEvent {
        path: path.to_string(),
        title: title.to_string(),
        location: "Madrid".to_string(),
        date: "2024-01-01".to_string(),
        description: "Test description".to_string(),
        tags: Vec::new(),
        draft: false,
        body: None,
        extra: Map::new(),
    }
}

/// A test event builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestEvent {
    pub path: String,
    pub title: String,
    pub location: String,
    pub date: String,
    pub description: String,
    pub tags: Vec<String>,
    pub draft: bool,
    /// Body text; rendered as Markdown on disk and kept verbatim in JSON.
    pub body: Option<String>,
    /// Any other fields (cover, seo, photos, ...).
    pub extra: Map<String, JsonValue>,
}

impl TestEvent {
    /// Slug: the last path segment.
    pub fn slug(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Set the location.
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    /// Set the date.
    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Set the body text.
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Add any other field.
    pub fn with_field(mut self, name: &str, value: JsonValue) -> Self {
        self.extra.insert(name.to_string(), value);
        self
    }

    /// Set as draft.
    pub fn draft(mut self) -> Self {
        self.draft = true;
        self
    }

    /// Record JSON as a content store returns it.
    pub fn to_json(&self) -> JsonValue {
        let mut value = self.front_matter();
        value.insert("id".to_string(), json!(self.path));
        value.insert("path".to_string(), json!(self.path));
        if let Some(body) = &self.body {
            value.insert("body".to_string(), json!({ "children": [], "value": body }));
        }
        JsonValue::Object(value)
    }

    /// Markdown file contents: YAML front matter followed by the body.
    pub fn to_markdown(&self) -> String {
        let front = serde_yml::to_string(&JsonValue::Object(self.front_matter()))
            .unwrap_or_default();
        format!("---\n{front}---\n\n{}\n", self.body.as_deref().unwrap_or(""))
    }

    fn front_matter(&self) -> Map<String, JsonValue> {
        let mut value = self.extra.clone();
        value.insert("title".to_string(), json!(self.title));
        value.insert("location".to_string(), json!(self.location));
        value.insert("date".to_string(), json!(self.date));
        value.insert("description".to_string(), json!(self.description));
        value.insert("tags".to_string(), json!(self.tags));
        value.insert("draft".to_string(), json!(self.draft));
        value
    }
}

/// A translation record carrying only the given fields.
///
/// Unlike [`TestEvent`], missing fields stay missing, which is how a
/// partially translated record looks.
pub fn translation(path: &str, fields: JsonValue) -> JsonValue {
    let mut value = match fields {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    };
    value.insert("id".to_string(), json!(path));
    value.insert("path".to_string(), json!(path));
    for required in ["title", "location", "date", "description"] {
        value.entry(required).or_insert_with(|| json!(""));
    }
    JsonValue::Object(value)
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{}', got: {}",
            key,
            value
        );
    }

    /// Assert the titles of a JSON array of events, in order.
    pub fn titles(events: &Value, expected: &[&str]) {
        let actual: Vec<&str> = events
            .as_array()
            .map(|events| events.iter().filter_map(|e| e["title"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(actual, expected, "event titles mismatch in: {}", events);
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }
}
