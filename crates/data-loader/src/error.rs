//! Error types for the data-loader crate.
//!
//! Only fatal ingestion problems live here. Malformed list fields are
//! not errors: the normalizer recovers them locally as empty lists.

use thiserror::Error;

/// Errors that can occur while loading and normalizing the movie catalog
///
/// The `#[derive(Error)]` macro from thiserror implements `Display` and
/// `std::error::Error` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected a row or header
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A source file lacks columns the catalog cannot be built without
    #[error("Missing required columns in {file}: {columns:?}")]
    MissingColumns { file: String, columns: Vec<String> },

    /// A JSON metadata file could not be decoded
    #[error("Invalid metadata file {path}: {source}")]
    Metadata {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
