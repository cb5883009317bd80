//! Error types for the engine.
//!
//! `recommend` never surfaces these; browse operations and snapshot
//! builds do.

use data_loader::DataLoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Source data could not be read or is missing required columns
    #[error("Failed to load source data: {0}")]
    Load(#[from] DataLoadError),

    #[error("Cache I/O error at {path}: {source}")]
    CacheIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A cache artifact could not be encoded or decoded
    #[error("Cache artifact {path} is unreadable: {source}")]
    CacheCodec {
        path: String,
        #[source]
        source: bincode::Error,
    },

    /// The cache was written by another format version or for other source data
    #[error("Stale cache: {0}")]
    StaleCache(String),

    #[error("Snapshot shape mismatch: {records} movies but a {matrix_size}x{matrix_size} matrix")]
    SnapshotShape { records: usize, matrix_size: usize },

    #[error("Similarity matrix is not symmetric with entries in [0, 1] and a unit diagonal")]
    MalformedMatrix,

    #[error("Invalid role '{0}', expected 'cast' or 'director'")]
    UnknownRole(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
