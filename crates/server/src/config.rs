//! Engine configuration.

use data_loader::SourceFiles;
use std::path::PathBuf;

pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/200x300/333/999?text=No+Poster";

/// Upper bound on recommendations per query
pub const MAX_RESULTS: usize = 20;

/// Tunables for building and querying the catalog.
///
/// ```ignore
/// let config = EngineConfig::default()
///     .with_data_dir("data")
///     .with_cache_dir("cache")
///     .with_max_results(10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Directory holding the TMDB CSV files
    pub data_dir: PathBuf,
    /// Directory for the two cache artifacts
    pub cache_dir: PathBuf,
    /// Pre-fetched enrichment metadata (JSON), used with the raw CSV layout
    pub metadata_file: Option<PathBuf>,

    /// Maximum recommendations per query
    pub max_results: usize,
    /// Maximum franchise entries per query
    pub franchise_limit: usize,
    /// Known ratings below this are skipped by the similarity layer
    pub min_rating: f32,
    pub highly_similar_threshold: f32,
    pub genre_style_ratio: f32,
    /// Minimum normalized Levenshtein similarity for approximate title matches
    pub fuzzy_cutoff: f64,
    /// Vocabulary cap for the vectorizer
    pub max_features: usize,

    /// Vote-count floor for browse lists
    pub browse_min_votes: f32,
    /// Vote-count floor for the top-rated list
    pub top_rated_min_votes: f32,
    /// Size of capped browse lists
    pub browse_limit: usize,

    pub image_base_url: String,
    pub placeholder_poster_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cache_dir: PathBuf::from("cache"),
            metadata_file: None,
            max_results: MAX_RESULTS,
            franchise_limit: 3,
            min_rating: 6.0,
            highly_similar_threshold: 0.8,
            genre_style_ratio: 0.7,
            fuzzy_cutoff: 0.6,
            max_features: features::vectorizer::DEFAULT_MAX_FEATURES,
            browse_min_votes: 10.0,
            top_rated_min_votes: 100.0,
            browse_limit: 10,
            image_base_url: TMDB_IMAGE_BASE_URL.to_string(),
            placeholder_poster_url: PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_metadata_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_file = Some(path.into());
        self
    }

    /// Results per query, capped at [`MAX_RESULTS`]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.min(MAX_RESULTS);
        self
    }

    pub fn with_franchise_limit(mut self, limit: usize) -> Self {
        self.franchise_limit = limit;
        self
    }

    pub fn with_min_rating(mut self, min_rating: f32) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_highly_similar_threshold(mut self, threshold: f32) -> Self {
        self.highly_similar_threshold = threshold;
        self
    }

    pub fn with_genre_style_ratio(mut self, ratio: f32) -> Self {
        self.genre_style_ratio = ratio;
        self
    }

    pub fn with_fuzzy_cutoff(mut self, cutoff: f64) -> Self {
        self.fuzzy_cutoff = cutoff;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_browse_limit(mut self, limit: usize) -> Self {
        self.browse_limit = limit;
        self
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    pub fn source_files(&self) -> SourceFiles {
        SourceFiles::in_dir(&self.data_dir)
    }
}
