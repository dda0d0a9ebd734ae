#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Markdown content source integration tests.

use std::path::Path;
use std::sync::Arc;

use galeria_test_utils::test_event;
use tempfile::TempDir;

use galeria_kernel::content::{CollectionFetcher, CollectionQuery, MarkdownContentSource};
use galeria_kernel::gather::{SortBy, SortOrder};
use galeria_kernel::services::{EventRepository, SingleEventResolver};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn content_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "es/gallery/tokyo.md",
        &test_event("/es/tokyo", "Noches de Tokio")
            .with_date("2024-03-10")
            .with_tags(&["foto"])
            .with_body("Fotos de **Tokio**.")
            .to_markdown(),
    );
    write(
        root,
        "es/gallery/2024/primavera.md",
        &test_event("/es/2024/primavera", "Primavera")
            .with_date("2024-04-01")
            .to_markdown(),
    );
    write(
        root,
        "es/gallery/borrador.md",
        &test_event("/es/borrador", "Borrador")
            .with_date("2024-06-01")
            .draft()
            .to_markdown(),
    );
    write(root, "es/gallery/.hidden.md", "not front matter");
    write(root, "es/gallery/notes.txt", "ignored");

    // Partial translation without an authored title.
    write(
        root,
        "en/gallery/tokyo.md",
        "---\ndescription: Night photos of Tokyo\n---\n\nPhotos of *Tokyo*.\n",
    );

    dir
}

#[tokio::test]
async fn reads_published_events_in_order() {
    let dir = content_tree();
    let source = MarkdownContentSource::new(dir.path());

    let events = source
        .fetch_all(
            "gallery_es",
            &CollectionQuery::published().order_by(SortBy::Date, SortOrder::Desc),
        )
        .await
        .unwrap();

    let paths: Vec<&str> = events.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/es/2024/primavera", "/es/tokyo"]);
    assert_eq!(events[0].slug(), "primavera");
    assert_eq!(events[1].id, "gallery_es/es/gallery/tokyo.md");
    assert_eq!(events[1].tags, vec!["foto"]);
}

#[tokio::test]
async fn renders_markdown_body() {
    let dir = content_tree();
    let source = MarkdownContentSource::new(dir.path());

    let tokyo = source
        .fetch_one("gallery_es", "/es/tokyo")
        .await
        .unwrap()
        .unwrap();
    let html = tokyo.body.unwrap().value.unwrap();
    assert!(html.as_str().unwrap().contains("<strong>Tokio</strong>"));
}

#[tokio::test]
async fn drafts_are_not_fetched_individually() {
    let dir = content_tree();
    let source = MarkdownContentSource::new(dir.path());
    assert!(source
        .fetch_one("gallery_es", "/es/borrador")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn missing_locale_directory_is_empty() {
    let dir = content_tree();
    let source = MarkdownContentSource::new(dir.path());
    let events = source
        .fetch_all("gallery_de", &CollectionQuery::published())
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn unreadable_collection_directory_is_an_error() {
    let dir = content_tree();
    // A file where the locale directory should be
    write(dir.path(), "fr", "not a directory");
    let source = MarkdownContentSource::new(dir.path());

    let error = source
        .fetch_all("gallery_fr", &CollectionQuery::published())
        .await
        .unwrap_err();
    assert!(format!("{error:#}").contains("gallery"));
}

#[tokio::test]
async fn unknown_collection_name_is_an_error() {
    let dir = content_tree();
    let source = MarkdownContentSource::new(dir.path());
    assert!(source
        .fetch_all("events_es", &CollectionQuery::published())
        .await
        .is_err());
}

#[tokio::test]
async fn file_without_front_matter_is_an_error() {
    let dir = content_tree();
    write(dir.path(), "es/gallery/broken.md", "# Just a heading\n");
    let source = MarkdownContentSource::new(dir.path());

    let error = source
        .fetch_all("gallery_es", &CollectionQuery::published())
        .await
        .unwrap_err();
    assert!(format!("{error:#}").contains("broken.md"));
}

#[tokio::test]
async fn partial_translation_merges_over_markdown_base() {
    let dir = content_tree();
    let source: Arc<dyn CollectionFetcher> = Arc::new(MarkdownContentSource::new(dir.path()));
    let repository = EventRepository::new(source.clone(), "es");

    let events = repository.list_events("en").await.unwrap();
    let tokyo = events.iter().find(|e| e.slug() == "tokyo").unwrap();

    // The derived "Tokyo" title is slug-generated, so the base title stays.
    assert_eq!(tokyo.title, "Noches de Tokio");
    assert_eq!(tokyo.description, "Night photos of Tokyo");
    assert_eq!(tokyo.date, "2024-03-10");
    assert_eq!(tokyo.tags, vec!["foto"]);

    let resolver = SingleEventResolver::new(source, "es");
    let single = resolver.get_event("en", "tokyo").await.unwrap().unwrap();
    assert_eq!(&single, tokyo);
    let html = single.body.unwrap().value.unwrap();
    assert!(html.as_str().unwrap().contains("<em>Tokyo</em>"));
}
