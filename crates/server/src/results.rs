//! Result records returned to callers.

use data_loader::{MovieId, MovieRecord, Mood, UNKNOWN_LANGUAGE};
use serde::{Deserialize, Serialize};
use sources::RecommendationReason;

const NOT_AVAILABLE: &str = "N/A";

/// Display fields of one movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// `None` only on sentinel results
    pub movie_id: Option<MovieId>,
    pub title: String,
    pub poster_url: String,
    pub year: String,
    pub genres: Vec<String>,
    pub vote_average: Option<f32>,
    pub language: String,
    pub cast: Vec<String>,
    pub directors: Vec<String>,
    pub overview: String,
}

impl MovieSummary {
    pub fn is_sentinel(&self) -> bool {
        self.movie_id.is_none()
    }
}

/// One entry of a recommendation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub movie: MovieSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_reason: Option<RecommendationReason>,
    /// Composite ranking score
    #[serde(default)]
    pub score: f64,
}

impl Recommendation {
    pub fn is_sentinel(&self) -> bool {
        self.movie.is_sentinel()
    }
}

/// Movies for a free-text mood request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodResults {
    pub mood: Mood,
    pub movies: Vec<MovieSummary>,
}

/// Movies for a category name, with the normalized category label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResults {
    pub category: String,
    pub movies: Vec<MovieSummary>,
}

/// Turns catalog records into display records
#[derive(Debug, Clone)]
pub struct ResultFormatter {
    image_base_url: String,
    placeholder_url: String,
}

impl ResultFormatter {
    pub fn new(image_base_url: impl Into<String>, placeholder_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into(),
            placeholder_url: placeholder_url.into(),
        }
    }

    pub fn summary(&self, record: &MovieRecord) -> MovieSummary {
        MovieSummary {
            movie_id: Some(record.id),
            title: record.title.clone(),
            poster_url: self.poster_url(record.poster_path.as_deref()),
            year: record.year.clone(),
            genres: record.genres.clone(),
            vote_average: record.vote_average,
            language: display_language(&record.original_language),
            cast: record.cast.clone(),
            directors: record.director.clone(),
            overview: record.overview_text.clone(),
        }
    }

    pub fn poster_url(&self, poster_path: Option<&str>) -> String {
        match poster_path.map(str::trim) {
            Some(path) if !path.is_empty() => format!("{}{}", self.image_base_url, path),
            _ => self.placeholder_url.clone(),
        }
    }

    /// A result that carries a message in its title and no movie
    pub fn sentinel(&self, message: impl Into<String>) -> Recommendation {
        Recommendation {
            movie: MovieSummary {
                movie_id: None,
                title: message.into(),
                poster_url: self.placeholder_url.clone(),
                year: NOT_AVAILABLE.to_string(),
                genres: Vec::new(),
                vote_average: None,
                language: NOT_AVAILABLE.to_string(),
                cast: Vec::new(),
                directors: Vec::new(),
                overview: String::new(),
            },
            similarity_score: None,
            recommendation_reason: None,
            score: 0.0,
        }
    }

    pub fn not_found(&self, query: &str) -> Recommendation {
        self.sentinel(format!("Movie '{}' not found in database.", query))
    }

    pub fn error(&self, error: &anyhow::Error) -> Recommendation {
        self.sentinel(format!("Error processing recommendation: {:#}", error))
    }

    pub fn not_ready(&self) -> Recommendation {
        self.sentinel("Recommendation system not ready.")
    }
}

fn display_language(code: &str) -> String {
    let code = code.trim();
    if code.is_empty() || code == UNKNOWN_LANGUAGE {
        NOT_AVAILABLE.to_string()
    } else {
        code.to_uppercase()
    }
}
