//! Enrichment metadata sources.
//!
//! The network client that fetches posters, ratings and collection ids is
//! an external collaborator. The catalog only needs something that answers
//! "what do you know about movie N?", and a lookup that fails must yield
//! [`MovieMetadata::default`] rather than an error.

use crate::error::{DataLoadError, Result};
use crate::types::{MovieId, MovieMetadata};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Per-movie metadata keyed by numeric external id
pub trait MetadataSource: Send + Sync {
    /// Look up one movie. Unknown ids return the unknown default.
    fn lookup(&self, id: MovieId) -> MovieMetadata;

    /// Name for logs
    fn name(&self) -> &'static str;
}

/// A source that knows nothing; every lookup is the unknown default
#[derive(Debug, Default, Clone, Copy)]
pub struct UnknownMetadata;

impl MetadataSource for UnknownMetadata {
    fn lookup(&self, _id: MovieId) -> MovieMetadata {
        MovieMetadata::default()
    }

    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// In-memory metadata, e.g. pre-fetched by the enrichment client
#[derive(Debug, Default, Clone)]
pub struct MetadataMap {
    entries: HashMap<MovieId, MovieMetadata>,
}

impl MetadataMap {
    pub fn new(entries: HashMap<MovieId, MovieMetadata>) -> Self {
        Self { entries }
    }

    /// Load a JSON object mapping ids to metadata:
    ///
    /// ```json
    /// { "862": { "poster_path": "/uXDf.jpg", "year": "1995", "genres": ["Animation"],
    ///            "vote_average": 7.7, "vote_count": 5415.0, "collection_id": 10194,
    ///            "original_language": "en" } }
    /// ```
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DataLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let text = fs::read_to_string(path)?;
        let raw: HashMap<String, MovieMetadata> =
            serde_json::from_str(&text).map_err(|source| DataLoadError::Metadata {
                path: path.display().to_string(),
                source,
            })?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, metadata) in raw {
            let id = key.trim().parse::<MovieId>().map_err(|_| {
                DataLoadError::ValidationError(format!(
                    "metadata key {:?} in {} is not a numeric id",
                    key,
                    path.display()
                ))
            })?;
            entries.insert(id, metadata);
        }

        info!(path = %path.display(), entries = entries.len(), "Loaded metadata file");
        Ok(Self { entries })
    }

    pub fn insert(&mut self, id: MovieId, metadata: MovieMetadata) {
        self.entries.insert(id, metadata);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetadataSource for MetadataMap {
    fn lookup(&self, id: MovieId) -> MovieMetadata {
        self.entries.get(&id).cloned().unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

/// Year label from a `YYYY-MM-DD` release date
pub fn year_from_release_date(date: &str) -> Option<String> {
    let year = date.trim().split('-').next()?;
    (year.len() == 4 && year.chars().all(|c| c.is_ascii_digit())).then(|| year.to_string())
}
