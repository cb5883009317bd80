//! Build a QueryContext for a resolved query movie.

use crate::types::QueryContext;
use anyhow::{Result, anyhow};
use data_loader::Catalog;

/// Gather what the sources and filters need about the movie at `position`.
///
/// The query movie's own title counts as included, so neither layer can
/// recommend the movie back to itself under a duplicate row.
pub fn build_query_context(catalog: &Catalog, position: usize) -> Result<QueryContext> {
    let base = catalog
        .get(position)
        .ok_or_else(|| anyhow!("catalog position {} out of range ({} movies)", position, catalog.len()))?;

    let mut context = QueryContext {
        base_position: position,
        base_id: base.id,
        base_title: base.title.clone(),
        base_genres: base.genres.iter().map(|g| g.to_lowercase()).collect(),
        ..QueryContext::default()
    };
    context.include(&base.title);

    Ok(context)
}
