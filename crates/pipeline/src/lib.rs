//! Quality and diversity filtering of similarity candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! Similarity candidates arrive ordered by descending similarity and pass
//! through the filters in the order they were added:
//! 1. `MinimumRatingFilter` drops movies with a known rating below the floor
//! 2. `GenreOverlapFilter` drops movies sharing no genre with the query movie
//! 3. `AlreadyIncludedFilter` drops titles already in the result list
//!
//! Every filter keeps the relative order of the candidates it passes.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(MinimumRatingFilter::new(catalog.clone(), 6.0))
//!     .add_filter(GenreOverlapFilter::new(catalog.clone()))
//!     .add_filter(AlreadyIncludedFilter::new(catalog.clone()));
//!
//! let filtered = pipeline.apply(candidates, &context)?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;
