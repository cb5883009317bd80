//! # Recommendation Orchestrator
//!
//! Produces the "more like this" list for one query title:
//! 1. Resolve the title (exact, then approximate)
//! 2. Franchise layer: other entries of the same series
//! 3. Similarity layer, when the list is not full yet: similarity
//!    candidates through the quality and diversity filters
//! 4. Composite-score ranking and the result cap
//!
//! ## Ranking
//! Each result carries `100 (franchise) + similarity * 50 + rating * 5 +
//! (year - 1900) / 100`. Franchise entries stay first in release order;
//! the composite score orders everything after them.
//!
//! ## Learning Goals
//!
//! - Keeping a fallible pipeline behind an infallible boundary
//! - `anyhow::Context` to explain where a query failed
//! - Instrumentation and timing per query

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument, warn};

use data_loader::{Catalog, normalize_title};
use pipeline::FilterPipeline;
use pipeline::filters::{AlreadyIncludedFilter, GenreOverlapFilter, MinimumRatingFilter};
use sources::{Candidate, FranchiseSource, SimilaritySource, build_query_context};

use crate::config::EngineConfig;
use crate::results::{Recommendation, ResultFormatter};
use crate::snapshot::CatalogSnapshot;

const FRANCHISE_BONUS: f64 = 100.0;
const SIMILARITY_WEIGHT: f64 = 50.0;
const RATING_WEIGHT: f64 = 5.0;

/// Answers recommendation queries against one snapshot
pub struct Recommender {
    snapshot: Arc<CatalogSnapshot>,
    franchise: FranchiseSource,
    similar: SimilaritySource,
    filters: FilterPipeline,
    formatter: ResultFormatter,
    max_results: usize,
    fuzzy_cutoff: f64,
}

impl Recommender {
    pub fn new(snapshot: Arc<CatalogSnapshot>, config: &EngineConfig) -> Self {
        let catalog = snapshot.catalog().clone();
        let franchise = FranchiseSource::new(catalog.clone()).with_limit(config.franchise_limit);
        let similar = SimilaritySource::new(catalog.clone(), snapshot.matrix().clone())
            .with_highly_similar_threshold(config.highly_similar_threshold)
            .with_genre_style_ratio(config.genre_style_ratio);
        let filters = default_filters(&catalog, config.min_rating);

        Self {
            snapshot,
            franchise,
            similar,
            filters,
            formatter: ResultFormatter::new(&config.image_base_url, &config.placeholder_poster_url),
            max_results: config.max_results,
            fuzzy_cutoff: config.fuzzy_cutoff,
        }
    }

    /// Replace the similarity-layer filters
    pub fn with_filter_pipeline(mut self, filters: FilterPipeline) -> Self {
        self.filters = filters;
        self
    }

    /// Ranked recommendations for `query`.
    ///
    /// Never fails: an unknown title yields one "not found" sentinel and an
    /// internal failure yields one "error" sentinel.
    #[instrument(skip(self))]
    pub fn recommend(&self, query: &str) -> Vec<Recommendation> {
        let start = Instant::now();

        let results = match self.resolve(query) {
            None => {
                info!("No catalog title matches the query");
                vec![self.formatter.not_found(query)]
            }
            Some(position) => match self.recommend_for(position) {
                Ok(results) => results,
                Err(e) => {
                    warn!(error = %format!("{:#}", e), "Recommendation failed");
                    vec![self.formatter.error(&e)]
                }
            },
        };

        info!(count = results.len(), elapsed = ?start.elapsed(), "Recommendation complete");
        results
    }

    /// Catalog position for a query: exact normalized title first, then the
    /// closest title by normalized Levenshtein similarity above the cutoff.
    pub fn resolve(&self, query: &str) -> Option<usize> {
        let catalog = self.snapshot.catalog();
        if let Some(position) = catalog.find_title(query) {
            return Some(position);
        }

        let query = normalize_title(query);
        let (score, position) = catalog
            .titles()
            .map(|(title, position)| (strsim::normalized_levenshtein(&query, title), position))
            .filter(|&(score, _)| score >= self.fuzzy_cutoff)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal).then(b.1.cmp(&a.1)))?;

        debug!(score, position, "Approximate title match");
        Some(position)
    }

    /// Both layers and ranking for a resolved movie
    pub fn recommend_for(&self, position: usize) -> Result<Vec<Recommendation>> {
        let catalog = self.snapshot.catalog();
        let mut context =
            build_query_context(catalog, position).context("Failed to build query context")?;

        let (mut selected, matched) = self.franchise.get_candidates(&context);
        for candidate in &selected {
            let record = lookup(catalog, candidate)?;
            context.include(&record.title);
        }
        debug!(?matched, franchise = selected.len(), "Franchise layer complete");

        if selected.len() < self.max_results {
            let candidates = self.similar.get_candidates(&context);
            let filtered = self
                .filters
                .apply(candidates, &context)
                .context("Failed to apply similarity filters")?;

            let room = self.max_results - selected.len();
            selected.extend(filtered.into_iter().take(room));
        }

        self.rank(catalog, selected)
    }

    /// Score every candidate, keep franchise entries first, cap the list.
    fn rank(&self, catalog: &Catalog, candidates: Vec<Candidate>) -> Result<Vec<Recommendation>> {
        let mut franchise = Vec::new();
        let mut similar = Vec::new();

        for candidate in candidates {
            let record = lookup(catalog, &candidate)?;
            let recommendation = Recommendation {
                movie: self.formatter.summary(record),
                similarity_score: candidate.similarity,
                recommendation_reason: Some(candidate.reason),
                score: composite_score(
                    candidate.is_franchise(),
                    candidate.similarity,
                    record.vote_average,
                    record.numeric_year(),
                ),
            };
            if candidate.is_franchise() {
                franchise.push(recommendation);
            } else {
                similar.push(recommendation);
            }
        }

        similar.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let mut ranked = franchise;
        ranked.extend(similar);
        ranked.truncate(self.max_results);
        Ok(ranked)
    }
}

/// The similarity layer's filters, in the order they run
pub fn default_filters(catalog: &Arc<Catalog>, min_rating: f32) -> FilterPipeline {
    FilterPipeline::new()
        .add_filter(MinimumRatingFilter::new(catalog.clone(), min_rating))
        .add_filter(GenreOverlapFilter::new(catalog.clone()))
        .add_filter(AlreadyIncludedFilter::new(catalog.clone()))
}

/// `100 (franchise) + similarity * 50 + rating * 5 + (year - 1900) / 100`
pub fn composite_score(
    is_franchise: bool,
    similarity: Option<f32>,
    rating: Option<f32>,
    year: Option<u32>,
) -> f64 {
    let mut score = 0.0;
    if is_franchise {
        score += FRANCHISE_BONUS;
    }
    score += similarity.map_or(0.0, f64::from) * SIMILARITY_WEIGHT;
    score += rating.map_or(0.0, f64::from) * RATING_WEIGHT;
    if let Some(year) = year {
        score += (f64::from(year) - 1900.0) / 100.0;
    }
    score
}

fn lookup<'a>(catalog: &'a Catalog, candidate: &Candidate) -> Result<&'a data_loader::MovieRecord> {
    catalog
        .get(candidate.position)
        .ok_or_else(|| anyhow!("candidate position {} is outside the catalog", candidate.position))
}
