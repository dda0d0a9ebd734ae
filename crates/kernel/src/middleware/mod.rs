//! HTTP middleware components.
//!
//! Provides per-request locale negotiation.

pub mod language;

pub use language::{
    AcceptLanguageNegotiator, LanguageNegotiator, QueryParamNegotiator, ResolvedLanguage,
    default_negotiators, negotiate_language,
};
