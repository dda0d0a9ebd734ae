//! Content translation overlay.
//!
//! Combines a base-locale event with a partial translation, field by field.
//! Every field carries a [`MergePolicy`]; [`merge`] walks the fixed field
//! table and applies each policy. Blank or missing translation values fall
//! back to the base record.

use crate::models::{Body, Cover, Event, EventPatch, Link, Photo, Seo};

/// How a translated value is combined with the base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Replace a scalar unless the translated value is absent or blank.
    SkipIfEmpty,
    /// Replace a whole list unless the translated list is absent or empty.
    ReplaceWholesale,
    /// Per-key union of the two objects; translated keys win.
    ShallowMergeObject,
    /// As `SkipIfEmpty`, but titles generated from the slug are ignored.
    TitleGuard,
    /// Replace the whole document, only when the translation has content.
    BodyReplaceIfNonEmpty,
}

/// Fields of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventField {
    Id,
    Path,
    Title,
    Location,
    Date,
    Duration,
    Description,
    About,
    Participation,
    Links,
    Seo,
    Tags,
    Cover,
    Photos,
    Icon,
    Draft,
    Body,
}

impl EventField {
    /// Every field, in declaration order.
    pub const ALL: [EventField; 17] = [
        EventField::Id,
        EventField::Path,
        EventField::Title,
        EventField::Location,
        EventField::Date,
        EventField::Duration,
        EventField::Description,
        EventField::About,
        EventField::Participation,
        EventField::Links,
        EventField::Seo,
        EventField::Tags,
        EventField::Cover,
        EventField::Photos,
        EventField::Icon,
        EventField::Draft,
        EventField::Body,
    ];

    /// Merge policy for this field.
    pub fn policy(self) -> MergePolicy {
        match self {
            EventField::Title => MergePolicy::TitleGuard,
            EventField::Body => MergePolicy::BodyReplaceIfNonEmpty,
            EventField::Seo | EventField::Cover => MergePolicy::ShallowMergeObject,
            EventField::Links | EventField::Tags | EventField::Photos => {
                MergePolicy::ReplaceWholesale
            }
            _ => MergePolicy::SkipIfEmpty,
        }
    }

    /// Field name as it appears in content documents.
    pub fn name(self) -> &'static str {
        match self {
            EventField::Id => "id",
            EventField::Path => "path",
            EventField::Title => "title",
            EventField::Location => "location",
            EventField::Date => "date",
            EventField::Duration => "duration",
            EventField::Description => "description",
            EventField::About => "about",
            EventField::Participation => "participation",
            EventField::Links => "links",
            EventField::Seo => "seo",
            EventField::Tags => "tags",
            EventField::Cover => "cover",
            EventField::Photos => "photos",
            EventField::Icon => "icon",
            EventField::Draft => "draft",
            EventField::Body => "body",
        }
    }
}

/// Overlay a translation onto a base event.
///
/// Returns a new event; neither input is modified. `merge(base, &EventPatch::default())`
/// equals `base`.
pub fn merge(base: &Event, patch: &EventPatch) -> Event {
    merge_with(base, patch, EventField::policy)
}

/// Overlay a translation using `policies` in place of the built-in table.
pub fn merge_with(
    base: &Event,
    patch: &EventPatch,
    policies: impl Fn(EventField) -> MergePolicy,
) -> Event {
    let mut merged = base.clone();
    let slug = patch.slug();

    for field in EventField::ALL {
        let pair = FieldPair::of(field, &mut merged, patch);
        match policies(field) {
            MergePolicy::SkipIfEmpty | MergePolicy::ReplaceWholesale => replace_unless_empty(pair),
            MergePolicy::ShallowMergeObject => shallow_merge(pair),
            MergePolicy::TitleGuard => guard_title(pair, slug),
            MergePolicy::BodyReplaceIfNonEmpty => replace_if_content(pair),
        }
    }

    merged
}

/// A field of the event being built, paired with the translated value.
enum FieldPair<'a> {
    Text(&'a mut String, Option<&'a str>),
    OptionalText(&'a mut Option<String>, Option<&'a str>),
    Flag(&'a mut bool, Option<bool>),
    Links(&'a mut Vec<Link>, Option<&'a [Link]>),
    Tags(&'a mut Vec<String>, Option<&'a [String]>),
    Photos(&'a mut Vec<Photo>, Option<&'a [Photo]>),
    Seo(&'a mut Option<Seo>, Option<&'a Seo>),
    Cover(&'a mut Option<Cover>, Option<&'a Cover>),
    Body(&'a mut Option<Body>, Option<&'a Body>),
}

impl<'a> FieldPair<'a> {
    fn of(field: EventField, event: &'a mut Event, patch: &'a EventPatch) -> Self {
        match field {
            EventField::Id => Self::Text(&mut event.id, patch.id.as_deref()),
            EventField::Path => Self::Text(&mut event.path, patch.path.as_deref()),
            EventField::Title => Self::Text(&mut event.title, patch.title.as_deref()),
            EventField::Location => Self::Text(&mut event.location, patch.location.as_deref()),
            EventField::Date => Self::Text(&mut event.date, patch.date.as_deref()),
            EventField::Duration => {
                Self::OptionalText(&mut event.duration, patch.duration.as_deref())
            }
            EventField::Description => {
                Self::Text(&mut event.description, patch.description.as_deref())
            }
            EventField::About => Self::OptionalText(&mut event.about, patch.about.as_deref()),
            EventField::Participation => {
                Self::OptionalText(&mut event.participation, patch.participation.as_deref())
            }
            EventField::Links => Self::Links(&mut event.links, patch.links.as_deref()),
            EventField::Seo => Self::Seo(&mut event.seo, patch.seo.as_ref()),
            EventField::Tags => Self::Tags(&mut event.tags, patch.tags.as_deref()),
            EventField::Cover => Self::Cover(&mut event.cover, patch.cover.as_ref()),
            EventField::Photos => Self::Photos(&mut event.photos, patch.photos.as_deref()),
            EventField::Icon => Self::OptionalText(&mut event.icon, patch.icon.as_deref()),
            EventField::Draft => Self::Flag(&mut event.draft, patch.draft),
            EventField::Body => Self::Body(&mut event.body, patch.body.as_ref()),
        }
    }
}

/// Replace the whole value unless the translation's is absent, blank or empty.
fn replace_unless_empty(pair: FieldPair<'_>) {
    match pair {
        FieldPair::Text(target, value) => replace_text(target, value),
        FieldPair::OptionalText(target, value) => replace_optional_text(target, value),
        FieldPair::Flag(target, value) => {
            // `false` counts as empty.
            if value == Some(true) {
                *target = true;
            }
        }
        FieldPair::Links(target, value) => replace_list(target, value),
        FieldPair::Tags(target, value) => replace_list(target, value),
        FieldPair::Photos(target, value) => replace_list(target, value),
        FieldPair::Seo(target, value) => replace_object(target, value),
        FieldPair::Cover(target, value) => replace_object(target, value),
        FieldPair::Body(target, value) => replace_object(target, value),
    }
}

fn shallow_merge(pair: FieldPair<'_>) {
    match pair {
        FieldPair::Seo(target, Some(seo)) => {
            *target = Some(merge_seo(target.as_ref(), seo));
        }
        FieldPair::Cover(target, Some(cover)) => {
            *target = Some(merge_cover(target.as_ref(), cover));
        }
        other => replace_unless_empty(other),
    }
}

fn guard_title(pair: FieldPair<'_>, slug: &str) {
    match pair {
        FieldPair::Text(target, value) => {
            if let Some(title) = non_blank(value)
                && !is_auto_title(title, slug)
            {
                *target = title.to_string();
            }
        }
        FieldPair::OptionalText(target, value) => {
            if let Some(title) = non_blank(value)
                && !is_auto_title(title, slug)
            {
                *target = Some(title.to_string());
            }
        }
        other => replace_unless_empty(other),
    }
}

fn replace_if_content(pair: FieldPair<'_>) {
    match pair {
        FieldPair::Body(target, value) => {
            if let Some(body) = value.filter(|b| b.has_content()) {
                *target = Some(body.clone());
            }
        }
        other => replace_unless_empty(other),
    }
}

/// Whether a title looks generated from the URL slug rather than authored.
///
/// Compares the title lower-cased with whitespace runs collapsed to `-`
/// against the lower-cased slug.
pub fn is_auto_title(title: &str, slug: &str) -> bool {
    if title == slug {
        return true;
    }
    let mut normalized = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                normalized.push('-');
            }
            in_whitespace = true;
        } else {
            normalized.push(c);
            in_whitespace = false;
        }
    }
    normalized == slug.to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn replace_text(target: &mut String, value: Option<&str>) {
    if let Some(v) = non_blank(value) {
        *target = v.to_string();
    }
}

fn replace_optional_text(target: &mut Option<String>, value: Option<&str>) {
    if let Some(v) = non_blank(value) {
        *target = Some(v.to_string());
    }
}

fn replace_list<T: Clone>(target: &mut Vec<T>, value: Option<&[T]>) {
    if let Some(items) = value.filter(|items| !items.is_empty()) {
        *target = items.to_vec();
    }
}

fn replace_object<T: Clone>(target: &mut Option<T>, value: Option<&T>) {
    if let Some(v) = value {
        *target = Some(v.clone());
    }
}

fn merge_seo(base: Option<&Seo>, overlay: &Seo) -> Seo {
    let base = base.cloned().unwrap_or_default();
    Seo {
        title: overlay.title.clone().or(base.title),
        description: overlay.description.clone().or(base.description),
    }
}

fn merge_cover(base: Option<&Cover>, overlay: &Cover) -> Cover {
    Cover {
        src: overlay.src.clone(),
        alt: overlay
            .alt
            .clone()
            .or_else(|| base.and_then(|b| b.alt.clone())),
    }
}
