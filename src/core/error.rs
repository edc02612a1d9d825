//! Error types for loading and querying a document store

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the store
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised while loading or querying a [`DocumentStore`](super::store::DocumentStore)
#[derive(Debug, Error)]
pub enum StoreError {
    /// The content directory does not exist
    #[error("content directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The content path exists but is not a directory
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// No document with this id was loaded
    #[error("unknown document id: {0}")]
    UnknownId(String),

    /// Two files normalize to the same document id
    #[error("duplicate document id '{id}': {} and {}", .first.display(), .second.display())]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A file or directory entry could not be read or decoded as UTF-8
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured separator cannot be used
    #[error("invalid separator: {0}")]
    InvalidSeparator(String),

    /// The directory watcher could not be started
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl StoreError {
    /// True for a missing content directory or a missing document id
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DirectoryNotFound(_) | Self::UnknownId(_))
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
