//! Locale negotiation middleware.
//!
//! Resolves the active locale for each request using a chain of negotiators.
//! Resolution order: `locale` query parameter → Accept-Language → base locale.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::ACCEPT_LANGUAGE},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Query parameter carrying an explicit locale.
pub const LOCALE_QUERY_PARAM: &str = "locale";

/// The resolved locale for the current request.
///
/// Stored in request extensions for per-request access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage(pub String);

/// Trait for locale negotiation strategies.
///
/// Implementations inspect the request and return a locale code if they
/// can determine the desired locale. The middleware chains negotiators
/// by priority (highest first) and uses the first known match.
pub trait LanguageNegotiator: Send + Sync {
    /// Attempt to negotiate a locale from the request.
    fn negotiate(&self, request: &Request<Body>) -> Option<String>;

    /// Priority of this negotiator (higher = checked first).
    fn priority(&self) -> i32;
}

/// Negotiates the locale from the `locale` query parameter (e.g. `?locale=en`).
#[derive(Debug, Default)]
pub struct QueryParamNegotiator;

impl QueryParamNegotiator {
    /// Extract the percent-decoded locale parameter from a raw query string.
    fn extract(query: &str) -> Option<String> {
        query.split('&').find_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            if name != LOCALE_QUERY_PARAM {
                return None;
            }
            let value = urlencoding::decode(value).ok()?;
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_lowercase())
        })
    }
}

impl LanguageNegotiator for QueryParamNegotiator {
    fn negotiate(&self, request: &Request<Body>) -> Option<String> {
        Self::extract(request.uri().query()?)
    }

    fn priority(&self) -> i32 {
        100
    }
}

/// One entry of an Accept-Language header.
#[derive(Debug, Clone, PartialEq)]
struct LanguageRange {
    tag: String,
    quality: f32,
}

impl LanguageRange {
    /// Parse `tag;q=0.8`. A missing or malformed weight counts as 1.
    fn parse(entry: &str) -> Option<Self> {
        let mut params = entry.split(';').map(str::trim);
        let tag = params.next().filter(|t| !t.is_empty())?.to_lowercase();
        let quality = params
            .find_map(|p| p.strip_prefix("q="))
            .and_then(|q| q.trim().parse::<f32>().ok())
            .map_or(1.0, |q| q.clamp(0.0, 1.0));
        Some(Self { tag, quality })
    }

    /// Primary language subtag (`pt-br` → `pt`).
    fn primary(&self) -> &str {
        self.tag.split('-').next().unwrap_or(&self.tag)
    }
}

/// Acceptable ranges in preference order. Weight 0 means "not acceptable"
/// and is dropped; equal weights keep header order.
fn preferred_ranges(header: &str) -> Vec<LanguageRange> {
    let mut ranges: Vec<LanguageRange> = header
        .split(',')
        .filter_map(LanguageRange::parse)
        .filter(|r| r.quality > 0.0)
        .collect();
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}

/// Negotiates the locale from the Accept-Language header, falling back from
/// a regional tag to its primary subtag.
pub struct AcceptLanguageNegotiator {
    known_languages: HashSet<String>,
}

impl AcceptLanguageNegotiator {
    pub fn new(known_languages: Vec<String>) -> Self {
        Self {
            known_languages: known_languages.into_iter().collect(),
        }
    }

    fn known(&self, range: &LanguageRange) -> Option<String> {
        [range.tag.as_str(), range.primary()]
            .into_iter()
            .find(|tag| self.known_languages.contains(*tag))
            .map(str::to_string)
    }
}

impl LanguageNegotiator for AcceptLanguageNegotiator {
    fn negotiate(&self, request: &Request<Body>) -> Option<String> {
        let header = request.headers().get(ACCEPT_LANGUAGE)?.to_str().ok()?;
        preferred_ranges(header)
            .iter()
            .find_map(|range| self.known(range))
    }

    fn priority(&self) -> i32 {
        50
    }
}

/// Build the default negotiator chain, sorted by priority descending.
pub fn default_negotiators(known_languages: &[String]) -> Vec<Arc<dyn LanguageNegotiator>> {
    let mut negotiators: Vec<Arc<dyn LanguageNegotiator>> = vec![
        Arc::new(QueryParamNegotiator),
        Arc::new(AcceptLanguageNegotiator::new(known_languages.to_vec())),
    ];
    negotiators.sort_by_key(|n| std::cmp::Reverse(n.priority()));
    negotiators
}

/// Middleware to negotiate the active locale for each request.
pub async fn negotiate_language(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let language = select_language(
        state.known_languages(),
        state.language_negotiators(),
        &request,
        state.base_locale(),
    );

    request.extensions_mut().insert(ResolvedLanguage(language));

    next.run(request).await
}

/// Select the active locale: first known negotiator result, else the base locale.
fn select_language(
    known_languages: &[String],
    negotiators: &[Arc<dyn LanguageNegotiator>],
    request: &Request<Body>,
    base_locale: &str,
) -> String {
    for negotiator in negotiators {
        if let Some(lang) = negotiator.negotiate(request) {
            if known_languages.iter().any(|k| k == &lang) {
                return lang;
            }
            tracing::warn!(
                requested_locale = %lang,
                "negotiator returned unknown locale, ignoring"
            );
        }
    }

    base_locale.to_string()
}
