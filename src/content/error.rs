//! Errors raised by the blog content pipeline

use std::path::PathBuf;
use thiserror::Error;

use super::frontmatter::FrontMatterError;

/// Result alias for content operations
pub type Result<T> = std::result::Result<T, BlogError>;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("post not found: {slug}")]
    NotFound { slug: String },

    #[error("invalid post slug: {slug:?}")]
    InvalidSlug { slug: String },

    #[error("bad front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BlogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogError::NotFound { .. })
    }
}
