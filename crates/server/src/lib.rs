//! Server crate for the ReelRecs recommendation engine.
//!
//! This crate turns the lower crates into a running engine:
//! - **builder**: source files to an immutable catalog snapshot
//! - **cache**: bincode artifacts stamped with a hash of the source data
//! - **snapshot**: the snapshot type and the store that swaps it atomically
//! - **orchestrator**: the "more like this" ranker
//! - **engine**: the `MovieEngine` facade with recommendation and browse calls
//!
//! ## Example Usage
//!
//! ```ignore
//! use server::{EngineConfig, MovieEngine};
//!
//! let engine = MovieEngine::new(EngineConfig::default().with_data_dir("data"));
//! engine.load_or_build_catalog()?;
//! for rec in engine.recommend("toy story") {
//!     println!("{} ({})", rec.movie.title, rec.movie.year);
//! }
//! ```

pub mod builder;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod results;
pub mod snapshot;

#[cfg(test)]
mod test_support;

pub use cache::CacheManager;
pub use config::EngineConfig;
pub use engine::MovieEngine;
pub use error::{EngineError, Result};
pub use orchestrator::{Recommender, composite_score};
pub use results::{CategoryResults, MoodResults, MovieSummary, Recommendation, ResultFormatter};
pub use snapshot::{CatalogSnapshot, SnapshotStore};
