//! Filter to keep only movies sharing a genre with the query movie.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Catalog;
use sources::{Candidate, QueryContext};
use std::sync::Arc;

/// Keeps candidates with at least one genre in common with the query movie.
///
/// ## Algorithm
/// Genre names are compared lowercased against `QueryContext::base_genres`.
/// A query movie without genres therefore passes nothing.
pub struct GenreOverlapFilter {
    catalog: Arc<Catalog>,
}

impl GenreOverlapFilter {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl Filter for GenreOverlapFilter {
    fn name(&self) -> &str {
        "GenreOverlapFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &QueryContext) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                self.catalog
                    .get(candidate.position)
                    .is_some_and(|movie| context.genre_overlap(&movie.genres) > 0)
            })
            .collect();
        Ok(filtered)
    }
}
