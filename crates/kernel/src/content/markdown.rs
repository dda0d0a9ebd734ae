//! Markdown-backed content collections.
//!
//! Layout: `{root}/{locale}/gallery/**/*.md`. Each file is YAML front matter
//! between `---` fences followed by a Markdown body. The file's path below
//! `gallery/` (without extension) becomes the event path under `/{locale}`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use pulldown_cmark::{Options, Parser, html};
use serde::Deserialize;
use tracing::{debug, info};

use super::error::ContentError;
use super::source::{COLLECTION_PREFIX, CollectionFetcher, CollectionQuery};
use crate::models::{Body, Cover, Event, Link, Photo, Seo, slug_of};

/// Directory below each locale that holds gallery events.
const GALLERY_DIR: &str = "gallery";

/// Front matter fields.
///
/// Text fields default to empty so partial translations load; the merge
/// treats blanks as untranslated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    location: String,
    date: String,
    duration: Option<String>,
    description: String,
    about: Option<String>,
    participation: Option<String>,
    links: Vec<Link>,
    seo: Option<Seo>,
    tags: Vec<String>,
    cover: Option<Cover>,
    photos: Vec<Photo>,
    icon: Option<String>,
    draft: bool,
}

/// Content source reading Markdown files from disk.
#[derive(Debug, Clone)]
pub struct MarkdownContentSource {
    root: PathBuf,
}

impl MarkdownContentSource {
    /// Create a source rooted at the content directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Content root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn load_collection(&self, collection: &str) -> Result<Vec<Event>> {
        let locale = collection
            .strip_prefix(COLLECTION_PREFIX)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| ContentError::UnknownCollection(collection.to_string()))?;

        let dir = self.root.join(locale).join(GALLERY_DIR);
        let exists = tokio::fs::try_exists(&dir)
            .await
            .map_err(|source| ContentError::Io {
                path: dir.clone(),
                source,
            })?;
        if !exists {
            debug!(collection = %collection, dir = %dir.display(), "collection directory missing");
            return Ok(Vec::new());
        }

        let files = markdown_files(&dir).await?;
        let mut events = Vec::with_capacity(files.len());
        for file in files {
            let event = load_event(collection, locale, &dir, &file)
                .await
                .with_context(|| format!("failed to load {collection} record"))?;
            events.push(event);
        }

        info!(collection = %collection, count = events.len(), "loaded collection");
        Ok(events)
    }
}

#[async_trait]
impl CollectionFetcher for MarkdownContentSource {
    async fn fetch_all(&self, collection: &str, query: &CollectionQuery) -> Result<Vec<Event>> {
        let events = self.load_collection(collection).await?;
        Ok(query.apply(events))
    }

    async fn fetch_one(&self, collection: &str, path: &str) -> Result<Option<Event>> {
        let events = self
            .fetch_all(collection, &CollectionQuery::published())
            .await?;
        Ok(events.into_iter().find(|e| e.path == path))
    }
}

/// Every `.md` file below `dir`, sorted by path.
async fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&current)
            .await
            .map_err(|source| ContentError::Io {
                path: current.clone(),
                source,
            })?;

        while let Some(entry) = entries.next_entry().await.map_err(|source| ContentError::Io {
            path: current.clone(),
            source,
        })? {
            let path = entry.path();
            let is_hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_none_or(|n| n.starts_with('.'));
            if is_hidden {
                continue;
            }

            let file_type = entry.file_type().await.map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && path.extension().is_some_and(|ext| ext == "md") {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

async fn load_event(collection: &str, locale: &str, dir: &Path, file: &Path) -> Result<Event> {
    let text = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| ContentError::Io {
            path: file.to_path_buf(),
            source,
        })?;

    let relative = file
        .strip_prefix(dir)
        .with_context(|| format!("{} is outside {}", file.display(), dir.display()))?;
    let relative_file = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let stem = relative_file
        .strip_suffix(".md")
        .unwrap_or(&relative_file)
        .to_string();

    let (front, body) = parse_document(&text, file)?;
    let path = format!("/{locale}/{stem}");
    let title = front
        .title
        .unwrap_or_else(|| title_from_slug(slug_of(&path)));

    Ok(Event {
        id: format!("{collection}/{locale}/{GALLERY_DIR}/{relative_file}"),
        path,
        title,
        location: front.location,
        date: front.date,
        duration: front.duration,
        description: front.description,
        about: front.about,
        participation: front.participation,
        links: front.links,
        seo: front.seo,
        tags: front.tags,
        cover: front.cover,
        photos: front.photos,
        icon: front.icon,
        draft: front.draft,
        body: render_body(body),
    })
}

/// Split a document into parsed front matter and the Markdown body.
fn parse_document<'a>(
    text: &'a str,
    file: &Path,
) -> std::result::Result<(FrontMatter, &'a str), ContentError> {
    let (yaml, body) = split_front_matter(text).ok_or_else(|| ContentError::MissingFrontMatter {
        path: file.to_path_buf(),
    })?;

    if yaml.trim().is_empty() {
        return Ok((FrontMatter::default(), body));
    }

    let front = serde_yml::from_str(yaml).map_err(|source| ContentError::InvalidFrontMatter {
        path: file.to_path_buf(),
        source,
    })?;
    Ok((front, body))
}

/// Split `---` fenced front matter from the rest of the document.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Render a Markdown body to HTML; blank bodies have no document.
fn render_body(markdown: &str) -> Option<Body> {
    if markdown.trim().is_empty() {
        return None;
    }
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    Some(Body::from_value(out))
}

/// Title the content store derives when none is authored (`my-event` → `My Event`).
fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
