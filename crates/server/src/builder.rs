//! Full snapshot build: source files to catalog and similarity matrix.

use crate::error::Result;
use crate::snapshot::CatalogSnapshot;
use data_loader::{Catalog, MetadataSource, SourceFiles, load_movies};
use features::{CountVectorizer, MoodClassifier, build_matrix, derive_records};
use std::time::Instant;
use tracing::{info, instrument};

/// Load, normalize, derive tags and moods, and compute the matrix.
///
/// Catalog order is the load order and is never changed afterwards, so
/// matrix row `i` always belongs to catalog position `i`.
#[instrument(skip_all, fields(enriched = files.enriched.exists()))]
pub fn build_snapshot(
    files: &SourceFiles,
    metadata: &dyn MetadataSource,
    classifier: &MoodClassifier,
    vectorizer: &CountVectorizer,
) -> Result<CatalogSnapshot> {
    let start = Instant::now();

    let movies = load_movies(files, metadata)?;
    info!(movies = movies.len(), elapsed = ?start.elapsed(), "Loaded source movies");

    let records = derive_records(movies, classifier);
    let tags: Vec<String> = records.iter().map(|r| r.tag_string.clone()).collect();
    let (vocabulary, matrix) = build_matrix(&tags, vectorizer);

    let snapshot = CatalogSnapshot::new(Catalog::new(records), matrix)?;
    info!(
        movies = snapshot.len(),
        vocabulary = vocabulary.len(),
        elapsed = ?start.elapsed(),
        "Built catalog snapshot"
    );
    Ok(snapshot)
}
