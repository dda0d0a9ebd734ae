//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::{CacheSettings, DEFAULT_MAX_CAPACITY, DEFAULT_TTL_SECS};
use crate::services::DEFAULT_BASE_LOCALE;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Root of the Markdown content tree (default: ./content).
    pub content_dir: PathBuf,

    /// Base locale code (default: es).
    pub base_locale: String,

    /// Known locale codes, base locale first (default: es,en,de).
    pub locales: Vec<String>,

    /// Cache entry time-to-live in seconds (default: 60).
    pub cache_ttl_secs: u64,

    /// Maximum cached entries (default: 1000).
    pub cache_max_capacity: u64,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            content_dir: PathBuf::from("./content"),
            base_locale: DEFAULT_BASE_LOCALE.to_string(),
            locales: normalize_locales(DEFAULT_BASE_LOCALE, split_list("es,en,de")),
            cache_ttl_secs: DEFAULT_TTL_SECS,
            cache_max_capacity: DEFAULT_MAX_CAPACITY,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let content_dir = env::var("CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./content"));

        let base_locale = env::var("BASE_LOCALE")
            .map(|v| v.trim().to_lowercase())
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_LOCALE.to_string());

        let locales = env::var("LOCALES")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| split_list("es,en,de"));
        let locales = normalize_locales(&base_locale, locales);

        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .context("CACHE_TTL_SECS must be a valid u64")?;

        let cache_max_capacity = env::var("CACHE_MAX_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_MAX_CAPACITY.to_string())
            .parse()
            .context("CACHE_MAX_CAPACITY must be a valid u64")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            content_dir,
            base_locale,
            locales,
            cache_ttl_secs,
            cache_max_capacity,
            cors_allowed_origins,
        })
    }

    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            ttl: Duration::from_secs(self.cache_ttl_secs),
            max_capacity: self.cache_max_capacity,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Put the base locale first and drop duplicates.
fn normalize_locales(base_locale: &str, locales: Vec<String>) -> Vec<String> {
    let mut result = vec![base_locale.to_string()];
    for locale in locales {
        if !result.contains(&locale) {
            result.push(locale);
        }
    }
    result
}
