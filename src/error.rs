//! Error taxonomy for the world export pipeline (see `spec.md` §7).

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type returned by every public operation in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Any file or directory operation failed.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Region file header mismatch or BSON parse failure on reopen.
    #[error("format error: {0}")]
    Format(String),

    /// Blob-index points into the segment store but length/bounds are inconsistent.
    #[error("corrupt region file: {0}")]
    Corruption(String),

    /// Caller passed an `(x,y,z)` or palette index outside the defined domain.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Cooperative cancellation was requested.
    #[error("cancelled")]
    Cancelled,

    /// Tile-selection active but not exactly one dimension selected, backup
    /// directory missing when the target already exists, etc.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invariant violation inside the pipeline — always a bug.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
