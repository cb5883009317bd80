//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_included;
pub mod genre_overlap;
pub mod minimum_rating;

// Re-export for convenience
pub use already_included::AlreadyIncludedFilter;
pub use genre_overlap::GenreOverlapFilter;
pub use minimum_rating::MinimumRatingFilter;
