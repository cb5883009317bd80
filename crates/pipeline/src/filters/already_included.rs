//! Filter to keep each title at most once in the result list.
//!
//! Runs last, so only candidates that survived every other filter claim
//! their title.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Catalog;
use sources::{Candidate, QueryContext};
use std::collections::HashSet;
use std::sync::Arc;

/// Removes candidates whose title is already in the result list.
///
/// ## Algorithm
/// Starts from `QueryContext::included_titles` (the query movie and any
/// franchise entries) and keeps the first candidate for each new title.
pub struct AlreadyIncludedFilter {
    catalog: Arc<Catalog>,
}

impl AlreadyIncludedFilter {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl Filter for AlreadyIncludedFilter {
    fn name(&self) -> &str {
        "AlreadyIncludedFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &QueryContext) -> Result<Vec<Candidate>> {
        let mut seen: HashSet<&str> = context.included_titles.iter().map(String::as_str).collect();

        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| match self.catalog.get(candidate.position) {
                Some(movie) => seen.insert(movie.title.as_str()),
                None => false,
            })
            .collect();
        Ok(filtered)
    }
}
