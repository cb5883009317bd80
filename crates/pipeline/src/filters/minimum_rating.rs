//! Filter to enforce a quality floor.
//!
//! Removes movies whose rating is known and below the floor. Movies
//! without a rating are kept.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Catalog;
use sources::{Candidate, QueryContext};
use std::sync::Arc;

/// Removes candidates rated below `min_rating`.
pub struct MinimumRatingFilter {
    catalog: Arc<Catalog>,
    min_rating: f32,
}

impl MinimumRatingFilter {
    /// Create a new MinimumRatingFilter.
    ///
    /// # Arguments
    /// * `catalog` - Shared catalog for rating lookups
    /// * `min_rating` - Minimum vote average (typically 6.0)
    pub fn new(catalog: Arc<Catalog>, min_rating: f32) -> Self {
        Self { catalog, min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _context: &QueryContext) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| match self.catalog.get(candidate.position) {
                Some(movie) => movie.vote_average.is_none_or(|rating| rating >= self.min_rating),
                None => false,
            })
            .collect();

        Ok(filtered)
    }
}
