//! Content source error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading content files.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("{}: missing front matter", path.display())]
    MissingFrontMatter { path: PathBuf },

    #[error("{}: invalid front matter", path.display())]
    InvalidFrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
