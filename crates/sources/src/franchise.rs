//! Franchise Source - sequels and other entries of the same series
//!
//! ## Algorithm
//! 1. If the query movie has a collection id, take every other movie in
//!    that collection
//! 2. Otherwise take movies whose lowercased title contains the query's
//!    title prefix (text before the first `:` or `-`) and that share at
//!    least one genre with it
//! 3. Drop movies whose title equals the query's (case-insensitive)
//! 4. Order by release year ascending, unknown years last, and keep the
//!    first few

use crate::types::{Candidate, FranchiseMatch, QueryContext};
use data_loader::{Catalog, MovieRecord};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Finds other entries of the query movie's franchise
pub struct FranchiseSource {
    catalog: Arc<Catalog>,

    /// Maximum franchise entries returned
    limit: usize,
}

impl FranchiseSource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog, limit: 3 }
    }

    /// Configure the number of franchise entries kept (default: 3)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Franchise candidates for the query movie, oldest first.
    ///
    /// Also reports how the match was made; `None` when nothing matched.
    #[instrument(skip(self, context), fields(base = %context.base_title))]
    pub fn get_candidates(&self, context: &QueryContext) -> (Vec<Candidate>, Option<FranchiseMatch>) {
        let Some(base) = self.catalog.get(context.base_position) else {
            return (Vec::new(), None);
        };
        let base_title = base.title.to_lowercase();

        let (matched, mut positions): (FranchiseMatch, Vec<usize>) = match base.collection_id {
            Some(collection) => (
                FranchiseMatch::Collection,
                self.catalog
                    .in_collection(collection)
                    .iter()
                    .copied()
                    .filter(|&pos| self.title_differs(pos, &base_title))
                    .collect(),
            ),
            None => {
                let prefix = title_prefix(&base.title);
                let positions = self
                    .catalog
                    .records()
                    .iter()
                    .enumerate()
                    .filter(|(_, record)| record.title.to_lowercase().contains(&prefix))
                    .filter(|(_, record)| context.genre_overlap(&record.genres) > 0)
                    .map(|(pos, _)| pos)
                    .filter(|&pos| self.title_differs(pos, &base_title))
                    .collect();
                (FranchiseMatch::TitlePrefix, positions)
            }
        };

        positions.sort_by_key(|&pos| self.catalog.get(pos).map(year_key).unwrap_or((1, 0)));
        positions.truncate(self.limit);

        let candidates: Vec<Candidate> = positions
            .into_iter()
            .filter_map(|pos| {
                let record = self.catalog.get(pos)?;
                Some(Candidate::franchise(pos, record.id, matched))
            })
            .collect();

        debug!(?matched, count = candidates.len(), "Generated franchise candidates");
        let matched = (!candidates.is_empty()).then_some(matched);
        (candidates, matched)
    }

    fn title_differs(&self, pos: usize, base_title_lower: &str) -> bool {
        self.catalog
            .get(pos)
            .is_some_and(|record| record.title.to_lowercase() != base_title_lower)
    }
}

/// Lowercased text before the first `:` or `-`, trimmed
pub fn title_prefix(title: &str) -> String {
    let lower = title.to_lowercase();
    let before_colon = lower.split(':').next().unwrap_or("");
    before_colon.split('-').next().unwrap_or("").trim().to_string()
}

/// Numeric years first, ascending; everything else after
fn year_key(record: &MovieRecord) -> (u8, u32) {
    match record.numeric_year() {
        Some(year) => (0, year),
        None => (1, 0),
    }
}
