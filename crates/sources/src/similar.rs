//! Similarity Source - content matches from the similarity matrix
//!
//! ## Algorithm
//! 1. Read the query movie's row of the similarity matrix
//! 2. Order every other movie by descending similarity (ties keep catalog order)
//! 3. Tag each with a reason:
//!    - "Highly Similar" above the high-similarity threshold
//!    - "Similar Genre & Style" when it shares at least `genre_style_ratio`
//!      of the query's genres
//!    - "Similar Content" otherwise
//!
//! Quality and diversity filtering happens downstream in the pipeline.

use crate::types::{Candidate, QueryContext, RecommendationReason};
use data_loader::Catalog;
use features::SimilarityMatrix;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Generates content-similarity candidates
pub struct SimilaritySource {
    catalog: Arc<Catalog>,
    matrix: Arc<SimilarityMatrix>,

    /// Similarity above which a match is "Highly Similar"
    highly_similar_threshold: f32,

    /// Share of the query's genres a match must have for "Similar Genre & Style"
    genre_style_ratio: f32,
}

impl SimilaritySource {
    pub fn new(catalog: Arc<Catalog>, matrix: Arc<SimilarityMatrix>) -> Self {
        Self {
            catalog,
            matrix,
            highly_similar_threshold: 0.8,
            genre_style_ratio: 0.7,
        }
    }

    /// Configure the "Highly Similar" threshold (default: 0.8)
    pub fn with_highly_similar_threshold(mut self, threshold: f32) -> Self {
        self.highly_similar_threshold = threshold;
        self
    }

    /// Configure the genre share for "Similar Genre & Style" (default: 0.7)
    pub fn with_genre_style_ratio(mut self, ratio: f32) -> Self {
        self.genre_style_ratio = ratio;
        self
    }

    /// Every other movie, most similar first
    #[instrument(skip(self, context), fields(base = %context.base_title))]
    pub fn get_candidates(&self, context: &QueryContext) -> Vec<Candidate> {
        let base = context.base_position;
        if base >= self.matrix.size() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .matrix
            .row(base)
            .iter()
            .copied()
            .enumerate()
            .filter(|&(pos, _)| pos != base)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

        let candidates: Vec<Candidate> = scored
            .into_iter()
            .filter_map(|(pos, score)| {
                let record = self.catalog.get(pos)?;
                let overlap = context.genre_overlap(&record.genres);
                let reason = self.reason(score, overlap, context.base_genres.len());
                Some(Candidate::similar(pos, record.id, score, reason))
            })
            .collect();

        debug!(count = candidates.len(), "Generated similarity candidates");
        candidates
    }

    /// Reason label for a content match
    pub fn reason(&self, score: f32, genre_overlap: usize, base_genre_count: usize) -> RecommendationReason {
        if score > self.highly_similar_threshold {
            RecommendationReason::HighlySimilar
        } else if genre_overlap as f32 >= base_genre_count as f32 * self.genre_style_ratio {
            RecommendationReason::SimilarGenreStyle
        } else {
            RecommendationReason::SimilarContent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_context::build_query_context;
    use crate::test_support::{create_test_catalog, create_test_matrix};

    fn create_source() -> (Arc<Catalog>, SimilaritySource) {
        let catalog = Arc::new(create_test_catalog());
        let source = SimilaritySource::new(catalog.clone(), Arc::new(create_test_matrix()));
        (catalog, source)
    }

    #[test]
    fn test_sorted_descending_without_base() {
        let (catalog, source) = create_source();
        let context = build_query_context(&catalog, 0).unwrap();

        let candidates = source.get_candidates(&context);
        assert_eq!(candidates.len(), catalog.len() - 1);
        assert!(candidates.iter().all(|c| c.position != 0));

        let positions: Vec<usize> = candidates.iter().take(5).map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 2, 9, 3, 5]);
        assert!(
            candidates
                .windows(2)
                .all(|w| w[0].similarity.unwrap() >= w[1].similarity.unwrap())
        );
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let (catalog, source) = create_source();
        let context = build_query_context(&catalog, 3).unwrap();

        // Row 3 only has an explicit score against 0; the rest tie at 0.1
        let positions: Vec<usize> = source.get_candidates(&context).iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_reasons() {
        let (catalog, source) = create_source();
        let context = build_query_context(&catalog, 0).unwrap();
        let candidates = source.get_candidates(&context);

        assert_eq!(candidates[0].reason, RecommendationReason::HighlySimilar);
        // Toy Story 3 scores 0.85 against Toy Story
        assert_eq!(candidates[1].reason, RecommendationReason::HighlySimilar);
        // Toy Story of Terror!: 0.7, shares 2 of 3 genres (< 2.1)
        assert_eq!(candidates[2].reason, RecommendationReason::SimilarContent);
        // Monsters, Inc.: shares all 3 genres
        assert_eq!(candidates[3].reason, RecommendationReason::SimilarGenreStyle);
    }

    #[test]
    fn test_reason_thresholds() {
        let (_, source) = create_source();
        assert_eq!(source.reason(0.81, 0, 3), RecommendationReason::HighlySimilar);
        assert_eq!(source.reason(0.8, 3, 4), RecommendationReason::SimilarGenreStyle);
        assert_eq!(source.reason(0.5, 2, 4), RecommendationReason::SimilarContent);

        let strict = SimilaritySource::new(Arc::new(Catalog::default()), Arc::new(create_test_matrix()))
            .with_highly_similar_threshold(0.95)
            .with_genre_style_ratio(1.0);
        assert_eq!(strict.reason(0.9, 3, 4), RecommendationReason::SimilarContent);
    }
}
