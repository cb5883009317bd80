//! Shared types for candidate generation.

use data_loader::MovieId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Why a movie was recommended. Labels are part of the result format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationReason {
    #[serde(rename = "Same Franchise")]
    SameFranchise,
    #[serde(rename = "Highly Similar")]
    HighlySimilar,
    #[serde(rename = "Similar Genre & Style")]
    SimilarGenreStyle,
    #[serde(rename = "Similar Content")]
    SimilarContent,
}

impl RecommendationReason {
    pub fn label(self) -> &'static str {
        match self {
            RecommendationReason::SameFranchise => "Same Franchise",
            RecommendationReason::HighlySimilar => "Highly Similar",
            RecommendationReason::SimilarGenreStyle => "Similar Genre & Style",
            RecommendationReason::SimilarContent => "Similar Content",
        }
    }
}

impl fmt::Display for RecommendationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the franchise layer found its matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FranchiseMatch {
    /// Shared collection id
    Collection,
    /// Title-prefix heuristic plus genre overlap
    TitlePrefix,
}

/// Which source generated a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    Franchise(FranchiseMatch),
    Similarity,
}

/// A movie proposed for the result list
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Catalog position (also the similarity-matrix row)
    pub position: usize,
    pub movie_id: MovieId,
    pub source: CandidateSource,
    /// Cosine similarity to the query movie; set by the similarity layer only
    pub similarity: Option<f32>,
    pub reason: RecommendationReason,
}

impl Candidate {
    pub fn franchise(position: usize, movie_id: MovieId, matched: FranchiseMatch) -> Self {
        Self {
            position,
            movie_id,
            source: CandidateSource::Franchise(matched),
            similarity: None,
            reason: RecommendationReason::SameFranchise,
        }
    }

    pub fn similar(position: usize, movie_id: MovieId, similarity: f32, reason: RecommendationReason) -> Self {
        Self {
            position,
            movie_id,
            source: CandidateSource::Similarity,
            similarity: Some(similarity),
            reason,
        }
    }

    pub fn is_franchise(&self) -> bool {
        matches!(self.source, CandidateSource::Franchise(_))
    }
}

/// Everything candidate generation needs to know about the query movie.
///
/// Built once per query by [`crate::query_context::build_query_context`].
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub base_position: usize,
    pub base_id: MovieId,
    pub base_title: String,
    /// Distinct lowercased genres of the query movie
    pub base_genres: HashSet<String>,
    /// Titles already in the result list (exact text)
    pub included_titles: HashSet<String>,
}

impl QueryContext {
    /// Number of distinct genres shared with the query movie
    pub fn genre_overlap(&self, genres: &[String]) -> usize {
        let other: HashSet<String> = genres.iter().map(|g| g.to_lowercase()).collect();
        other.intersection(&self.base_genres).count()
    }

    pub fn is_included(&self, title: &str) -> bool {
        self.included_titles.contains(title)
    }

    pub fn include(&mut self, title: &str) {
        self.included_titles.insert(title.to_string());
    }
}
