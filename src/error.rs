//! Error types for the persistence and vocabulary layers.
//!
//! None of these are fatal to a typing session: stores log them and fall
//! back to defaults. They exist so the fallback sites can say what went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing one of the on-disk stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read, created or written.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but its contents could not be decoded.
    #[error("malformed data in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A CSV record could not be written.
    #[error("csv error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Malformed {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the underlying file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Failures loading an embedded vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("vocabulary file not found: {0}")]
    NotFound(String),

    #[error("vocabulary file {0} is not valid utf-8")]
    NotUtf8(String),

    #[error("unable to deserialize vocabulary {name}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("vocabulary {0} has no words")]
    Empty(String),
}
