//! Error taxonomy for store construction, load, and save.

use std::path::PathBuf;

/// Errors surfaced by [`crate::Store`].
///
/// Only [`StoreError::Config`] is returned under the lenient policy; the rest
/// are logged and swallowed unless [`crate::config::ErrorPolicy::Strict`] is set.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A construction option was rejected.
    #[error("invalid store config: {0}")]
    Config(String),

    /// The store file exists but could not be read.
    #[error("read store {path}: {source}")]
    Read {
        /// Store file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The store file is not a JSON object of entries.
    #[error("parse store {path}: {source}")]
    Parse {
        /// Store file path.
        path: PathBuf,
        /// Underlying decode failure.
        source: serde_json::Error,
    },

    /// A single entry could not be reconstituted into a record.
    #[error("decode entry {key}: {source}")]
    Decode {
        /// Key of the failed entry.
        key: String,
        /// Underlying decode failure.
        source: serde_json::Error,
    },

    /// The mapping could not be serialized.
    #[error("encode store: {0}")]
    Encode(#[source] serde_json::Error),

    /// The store file could not be written.
    #[error("write store {path}: {source}")]
    Write {
        /// Store file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
