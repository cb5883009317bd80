//! # Features Crate
//!
//! Turns normalized movies into what the ranker consumes: a stemmed tag
//! string and a mood label per movie, and the pairwise similarity matrix
//! over the tag strings.
//!
//! ## Main Components
//!
//! - **tokenizer**: bag-of-words tag strings with stemming
//! - **sentiment**: compound sentiment scores (VADER)
//! - **mood**: rule cascades for movie moods and user-requested moods
//! - **vectorizer**: capped-vocabulary term counts
//! - **similarity**: the cosine similarity matrix
//!
//! ## Learning Goals
//!
//! 1. **Static tables of rules**: `fn` pointers in `static` slices keep the
//!    cascade order auditable
//! 2. **Deterministic parallelism**: rayon's indexed iterators collect in
//!    input order, so parallel builds stay reproducible
//! 3. **Sparse math**: an inverted index avoids the dense N x V matrix

pub mod mood;
pub mod sentiment;
pub mod similarity;
pub mod tokenizer;
pub mod vectorizer;

pub use mood::{MoodClassifier, mood_of_movie, mood_of_query};
pub use sentiment::{ConstantScorer, SentimentScorer, VaderScorer};
pub use similarity::{SimilarityMatrix, cosine_similarity};
pub use tokenizer::{tag_string, tokenize};
pub use vectorizer::{CountVectorizer, TermCounts, Vocabulary};

use data_loader::{MovieRecord, NormalizedMovie};
use rayon::prelude::*;
use tracing::info;

/// Derive tag string and mood for every movie, preserving input order
pub fn derive_records(movies: Vec<NormalizedMovie>, classifier: &MoodClassifier) -> Vec<MovieRecord> {
    let records: Vec<MovieRecord> = movies
        .into_par_iter()
        .map(|movie| {
            let tags = tag_string(&movie);
            let mood = classifier.classify_movie(&movie.overview_text, movie.display_genres());
            MovieRecord::from_normalized(movie, mood, tags)
        })
        .collect();

    info!(records = records.len(), "Derived tag strings and moods");
    records
}

/// Vectorize the tag strings and compute their similarity matrix
pub fn build_matrix(tag_strings: &[String], vectorizer: &CountVectorizer) -> (Vocabulary, SimilarityMatrix) {
    let (vocabulary, vectors) = vectorizer.fit_transform(tag_strings);
    let matrix = cosine_similarity(&vectors, vocabulary.len());
    (vocabulary, matrix)
}
