//! # Data Loader Crate
//!
//! The ingestion boundary of the recommender: reads the TMDB CSV files,
//! normalizes heterogeneous raw fields into canonical typed lists, attaches
//! enrichment metadata, and provides the positional `Catalog` every later
//! stage indexes into.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (`MovieRecord`, `NormalizedMovie`, `Mood`, `MovieMetadata`)
//! - **normalize**: Tagged-variant parsing of stringified list fields
//! - **parser**: CSV readers for the enriched and raw file layouts
//! - **metadata**: Enrichment sources keyed by numeric id
//! - **index**: The `Catalog` and its title/genre/person/collection lookups
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{load_movies, SourceFiles, UnknownMetadata};
//! use std::path::Path;
//!
//! let files = SourceFiles::in_dir(Path::new("data"));
//! let movies = load_movies(&files, &UnknownMetadata)?;
//! println!("Loaded {} movies", movies.len());
//! ```

pub mod error;
pub mod index;
pub mod metadata;
pub mod normalize;
pub mod parser;
pub mod types;

pub use error::{DataLoadError, Result};
pub use index::{Catalog, PersonRole, normalize_title};
pub use metadata::{MetadataMap, MetadataSource, UnknownMetadata};
pub use normalize::{RawField, parse_entity_list};
pub use parser::{SourceFiles, load_movies};
pub use types::{
    MovieId, MovieMetadata, MovieRecord, Mood, NormalizedMovie, UNKNOWN_LANGUAGE, UNKNOWN_YEAR,
};
