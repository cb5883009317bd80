//! Core domain types for the movie catalog.
//!
//! Records move through two typed shapes:
//! - `NormalizedMovie`: what the ingestion boundary produces from one source row
//! - `MovieRecord`: the catalog entry, carrying the derived mood and tag string
//!
//! Nothing downstream of the parser sees raw stringified fields.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (TMDB id, or synthesized from a non-numeric id)
pub type MovieId = i64;

/// Year label used when the release year is not known
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Language code used when the original language is not known
pub const UNKNOWN_LANGUAGE: &str = "N/A";

// =============================================================================
// Mood
// =============================================================================

/// Closed set of mood labels.
///
/// Movies are labelled with a subset (never `Relaxing` or `Drama`), user
/// requests with another subset (never `Sad`). The label strings are part
/// of the external interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    #[serde(rename = "Horror")]
    Horror,
    #[serde(rename = "Intense/Mystery")]
    IntenseMystery,
    #[serde(rename = "Romcom")]
    Romcom,
    #[serde(rename = "Happy")]
    Happy,
    #[serde(rename = "Sad")]
    Sad,
    #[serde(rename = "Romantic/Dramatic")]
    RomanticDramatic,
    #[serde(rename = "Thought-Provoking")]
    ThoughtProvoking,
    #[serde(rename = "Action/Adventure")]
    ActionAdventure,
    #[serde(rename = "Escapist")]
    Escapist,
    #[serde(rename = "Relaxing")]
    Relaxing,
    #[serde(rename = "Drama")]
    Drama,
}

impl Mood {
    pub const ALL: [Mood; 11] = [
        Mood::Horror,
        Mood::IntenseMystery,
        Mood::Romcom,
        Mood::Happy,
        Mood::Sad,
        Mood::RomanticDramatic,
        Mood::ThoughtProvoking,
        Mood::ActionAdventure,
        Mood::Escapist,
        Mood::Relaxing,
        Mood::Drama,
    ];

    /// Display label, e.g. "Intense/Mystery"
    pub fn label(self) -> &'static str {
        match self {
            Mood::Horror => "Horror",
            Mood::IntenseMystery => "Intense/Mystery",
            Mood::Romcom => "Romcom",
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::RomanticDramatic => "Romantic/Dramatic",
            Mood::ThoughtProvoking => "Thought-Provoking",
            Mood::ActionAdventure => "Action/Adventure",
            Mood::Escapist => "Escapist",
            Mood::Relaxing => "Relaxing",
            Mood::Drama => "Drama",
        }
    }

    /// Exact (case-sensitive) label lookup
    pub fn from_label(label: &str) -> Option<Mood> {
        Mood::ALL.into_iter().find(|mood| mood.label() == label)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Enrichment Metadata
// =============================================================================

/// Per-movie metadata supplied by the enrichment collaborator.
///
/// `Default` is the well-defined "unknown" value a failed lookup yields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieMetadata {
    pub poster_path: Option<String>,
    /// Release year as text, `UNKNOWN_YEAR` when absent
    pub year: String,
    pub genres: Vec<String>,
    pub vote_average: Option<f32>,
    pub vote_count: Option<f32>,
    /// Shared by every entry of a franchise
    pub collection_id: Option<i64>,
    pub original_language: String,
}

impl Default for MovieMetadata {
    fn default() -> Self {
        Self {
            poster_path: None,
            year: UNKNOWN_YEAR.to_string(),
            genres: Vec::new(),
            vote_average: None,
            vote_count: None,
            collection_id: None,
            original_language: UNKNOWN_LANGUAGE.to_string(),
        }
    }
}

impl MovieMetadata {
    /// True when no field carries information
    pub fn is_unknown(&self) -> bool {
        *self == MovieMetadata::default()
    }

    /// Fill every unknown field from `fallback`, keeping known values.
    pub fn or_fill_from(mut self, fallback: MovieMetadata) -> Self {
        if self.poster_path.is_none() {
            self.poster_path = fallback.poster_path;
        }
        if self.year == UNKNOWN_YEAR {
            self.year = fallback.year;
        }
        if self.genres.is_empty() {
            self.genres = fallback.genres;
        }
        if self.vote_average.is_none() {
            self.vote_average = fallback.vote_average;
        }
        if self.vote_count.is_none() {
            self.vote_count = fallback.vote_count;
        }
        if self.collection_id.is_none() {
            self.collection_id = fallback.collection_id;
        }
        if self.original_language == UNKNOWN_LANGUAGE {
            self.original_language = fallback.original_language;
        }
        self
    }
}

// =============================================================================
// Movie shapes
// =============================================================================

/// One source row after the ingestion boundary: every list field is a
/// canonical `Vec<String>`, metadata is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMovie {
    pub id: MovieId,
    pub title: String,
    /// Raw overview, kept verbatim for display
    pub overview_text: String,
    /// Genres from the source file (feed the tag string)
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    /// At most three names, billing order
    pub cast: Vec<String>,
    pub director: Vec<String>,
    pub metadata: MovieMetadata,
}

impl NormalizedMovie {
    /// Genres used for mood, overlap and display: enrichment genres,
    /// or the source genres when enrichment knows none.
    pub fn display_genres(&self) -> &[String] {
        if self.metadata.genres.is_empty() {
            &self.genres
        } else {
            &self.metadata.genres
        }
    }
}

/// A catalog entry. Positional order in the catalog is the row/column
/// order of the similarity matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub overview_text: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    pub cast: Vec<String>,
    pub director: Vec<String>,
    pub poster_path: Option<String>,
    pub year: String,
    pub vote_average: Option<f32>,
    pub vote_count: Option<f32>,
    pub collection_id: Option<i64>,
    pub original_language: String,
    pub mood_category: Mood,
    /// Stemmed bag of words, only used for vectorization
    pub tag_string: String,
}

impl MovieRecord {
    /// Combine a normalized movie with its derived fields.
    pub fn from_normalized(movie: NormalizedMovie, mood_category: Mood, tag_string: String) -> Self {
        let genres = movie.display_genres().to_vec();
        let NormalizedMovie {
            id,
            title,
            overview_text,
            keywords,
            cast,
            director,
            metadata,
            ..
        } = movie;

        Self {
            id,
            title,
            overview_text,
            genres,
            keywords,
            cast,
            director,
            poster_path: metadata.poster_path,
            year: metadata.year,
            vote_average: metadata.vote_average,
            vote_count: metadata.vote_count,
            collection_id: metadata.collection_id,
            original_language: metadata.original_language,
            mood_category,
            tag_string,
        }
    }

    /// Release year as a number, when the year label is all digits.
    ///
    /// Any digit string that fits a `u32` is a year, plausible or not.
    pub fn numeric_year(&self) -> Option<u32> {
        if !self.year.is_empty() && self.year.chars().all(|c| c.is_ascii_digit()) {
            self.year.parse().ok()
        } else {
            None
        }
    }

    /// Case-insensitive genre membership
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g.eq_ignore_ascii_case(genre))
    }

    /// Lowercased genre names
    pub fn genres_lower(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.to_lowercase()).collect()
    }
}
