//! # Sources Crate
//!
//! Candidate generation for "more like this" recommendations and the
//! catalog browse lists.
//!
//! ## Components
//!
//! ### Franchise Source
//! Other entries of the query movie's series:
//! - Same collection id when the movie has one
//! - Otherwise titles sharing the query's title prefix plus a genre
//! - At most 3, oldest first
//!
//! ### Similarity Source
//! Content matches ranked by the precomputed cosine-similarity row,
//! each tagged with a recommendation reason.
//!
//! ### Discovery Source
//! Browse without a query movie: mood, category, genre, person,
//! top rated, search suggestions and overview lookup.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{FranchiseSource, SimilaritySource, build_query_context};
//! use std::sync::Arc;
//!
//! let context = build_query_context(&catalog, position)?;
//!
//! let franchise = FranchiseSource::new(catalog.clone());
//! let similar = SimilaritySource::new(catalog.clone(), matrix.clone());
//!
//! let (franchise_candidates, _) = franchise.get_candidates(&context);
//! let similar_candidates = similar.get_candidates(&context);
//! ```
//!
//! ## Learning Goals
//!
//! 1. **Arc for Sharing**: one catalog and matrix shared by every source
//! 2. **Builder Pattern**: thresholds and limits via `with_*` methods
//! 3. **Deterministic Ordering**: stable sorts with explicit tiebreaks
//! 4. **Instrumentation**: `#[instrument]` spans around candidate generation

pub mod discovery;
pub mod franchise;
pub mod query_context;
pub mod similar;
pub mod types;

#[cfg(test)]
mod test_support;

pub use discovery::{DiscoverySource, Selector};
pub use franchise::{FranchiseSource, title_prefix};
pub use query_context::build_query_context;
pub use similar::SimilaritySource;
pub use types::{Candidate, CandidateSource, FranchiseMatch, QueryContext, RecommendationReason};
