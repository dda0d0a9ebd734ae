//! Application state shared across all handlers.

use std::sync::Arc;

use tracing::info;

use crate::cache::GalleryCache;
use crate::config::Config;
use crate::content::{CollectionFetcher, MarkdownContentSource};
use crate::middleware::language::{LanguageNegotiator, default_negotiators};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Cached event loading for every locale.
    cache: GalleryCache,

    /// Base locale code.
    base_locale: String,

    /// Known locale codes, base locale first.
    known_languages: Vec<String>,

    /// Locale negotiators, sorted by priority (highest first).
    language_negotiators: Vec<Arc<dyn LanguageNegotiator>>,
}

impl AppState {
    /// Create state reading Markdown content from `config.content_dir`.
    pub fn new(config: &Config) -> Self {
        info!(content_dir = %config.content_dir.display(), "using Markdown content source");
        let source = Arc::new(MarkdownContentSource::new(config.content_dir.clone()));
        Self::with_source(config, source)
    }

    /// Create state over an arbitrary content source.
    pub fn with_source(config: &Config, source: Arc<dyn CollectionFetcher>) -> Self {
        let cache = GalleryCache::new(source, &config.base_locale, config.cache_settings());
        let known_languages = config.locales.clone();
        let language_negotiators = default_negotiators(&known_languages);

        info!(
            base_locale = %config.base_locale,
            locales = ?known_languages,
            "gallery state ready"
        );

        Self {
            inner: Arc::new(AppStateInner {
                cache,
                base_locale: config.base_locale.clone(),
                known_languages,
                language_negotiators,
            }),
        }
    }

    /// Get the gallery cache.
    pub fn cache(&self) -> &GalleryCache {
        &self.inner.cache
    }

    /// Get the base locale code.
    pub fn base_locale(&self) -> &str {
        &self.inner.base_locale
    }

    /// Get the known locale codes.
    pub fn known_languages(&self) -> &[String] {
        &self.inner.known_languages
    }

    /// Get the locale negotiators.
    pub fn language_negotiators(&self) -> &[Arc<dyn LanguageNegotiator>] {
        &self.inner.language_negotiators
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("base_locale", &self.inner.base_locale)
            .field("known_languages", &self.inner.known_languages)
            .finish()
    }
}
