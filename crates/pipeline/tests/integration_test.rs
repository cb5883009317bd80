//! Integration tests for the pipeline.
//!
//! These tests run similarity candidates through the full filter chain
//! in the order the recommender uses.

use data_loader::{Catalog, Mood, MovieRecord};
use features::SimilarityMatrix;
use pipeline::FilterPipeline;
use pipeline::filters::*;
use sources::{RecommendationReason, SimilaritySource, build_query_context};
use std::sync::Arc;

fn movie(id: i64, title: &str, genres: &[&str], rating: Option<f32>) -> MovieRecord {
    MovieRecord {
        id,
        title: title.to_string(),
        overview_text: format!("{} overview", title),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        keywords: Vec::new(),
        cast: Vec::new(),
        director: Vec::new(),
        poster_path: None,
        year: "2001".to_string(),
        vote_average: rating,
        vote_count: Some(250.0),
        collection_id: None,
        original_language: "en".to_string(),
        mood_category: Mood::Escapist,
        tag_string: String::new(),
    }
}

fn create_test_setup() -> (Arc<Catalog>, Arc<SimilarityMatrix>) {
    let catalog = Catalog::new(vec![
        movie(1, "Dune", &["Science Fiction", "Adventure"], Some(7.8)),
        movie(2, "Dune", &["Science Fiction"], Some(6.2)),
        movie(3, "Star Voyage", &["Science Fiction"], Some(5.0)),
        movie(4, "Desert Romance", &["Romance"], Some(7.0)),
        movie(5, "Sand Quest", &["adventure"], None),
        movie(6, "Planet X", &["Science Fiction"], Some(7.1)),
    ]);

    let n = catalog.len();
    let row0 = [1.0, 0.95, 0.9, 0.85, 0.6, 0.4];
    let mut values = vec![0.2f32; n * n];
    for i in 0..n {
        values[i * n + i] = 1.0;
        values[i] = row0[i];
        values[i * n] = row0[i];
    }
    let matrix = SimilarityMatrix::from_parts(n, values).unwrap();

    (Arc::new(catalog), Arc::new(matrix))
}

fn create_pipeline(catalog: &Arc<Catalog>) -> FilterPipeline {
    FilterPipeline::new()
        .add_filter(MinimumRatingFilter::new(catalog.clone(), 6.0))
        .add_filter(GenreOverlapFilter::new(catalog.clone()))
        .add_filter(AlreadyIncludedFilter::new(catalog.clone()))
}

#[test]
fn test_full_pipeline_filters_correctly() {
    let (catalog, matrix) = create_test_setup();
    let context = build_query_context(&catalog, 0).unwrap();

    let candidates = SimilaritySource::new(catalog.clone(), matrix).get_candidates(&context);
    assert_eq!(candidates.len(), 5);

    let filtered = create_pipeline(&catalog).apply(candidates, &context).unwrap();

    // Dropped:
    // - the second "Dune" (same title as the query)
    // - Star Voyage (rated 5.0)
    // - Desert Romance (no shared genre)
    let titles: Vec<&str> = filtered
        .iter()
        .map(|c| catalog.get(c.position).unwrap().title.as_str())
        .collect();
    assert_eq!(titles, vec!["Sand Quest", "Planet X"]);
    assert!(
        filtered
            .iter()
            .all(|c| c.reason == RecommendationReason::SimilarContent)
    );
}

#[test]
fn test_pipeline_keeps_similarity_order() {
    let (catalog, matrix) = create_test_setup();
    let context = build_query_context(&catalog, 0).unwrap();

    let candidates = SimilaritySource::new(catalog.clone(), matrix).get_candidates(&context);
    let filtered = create_pipeline(&catalog).apply(candidates, &context).unwrap();

    assert!(
        filtered
            .windows(2)
            .all(|w| w[0].similarity.unwrap() >= w[1].similarity.unwrap())
    );
}

#[test]
fn test_franchise_titles_block_similarity_duplicates() {
    let (catalog, matrix) = create_test_setup();
    let mut context = build_query_context(&catalog, 0).unwrap();
    context.include("Planet X");

    let candidates = SimilaritySource::new(catalog.clone(), matrix).get_candidates(&context);
    let filtered = create_pipeline(&catalog).apply(candidates, &context).unwrap();

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].movie_id, 5);
}
