//! Immutable catalog snapshots and the store that swaps them.
//!
//! A snapshot pairs the catalog with its similarity matrix. Both are
//! validated together once and never mutated; a rebuild produces a new
//! snapshot and replaces the store's reference in one step. Readers keep
//! whatever snapshot they cloned for as long as they need it.

use crate::error::{EngineError, Result};
use data_loader::Catalog;
use features::SimilarityMatrix;
use std::sync::{Arc, Mutex, RwLock};
use tracing::info;

/// Catalog plus the similarity matrix built over it
#[derive(Debug)]
pub struct CatalogSnapshot {
    catalog: Arc<Catalog>,
    matrix: Arc<SimilarityMatrix>,
    source_stamp: Option<String>,
}

impl CatalogSnapshot {
    /// Pair a catalog with its matrix; row `i` must belong to catalog position `i`.
    pub fn new(catalog: Catalog, matrix: SimilarityMatrix) -> Result<Self> {
        if catalog.len() != matrix.size() {
            return Err(EngineError::SnapshotShape {
                records: catalog.len(),
                matrix_size: matrix.size(),
            });
        }
        Ok(Self {
            catalog: Arc::new(catalog),
            matrix: Arc::new(matrix),
            source_stamp: None,
        })
    }

    pub fn with_source_stamp(mut self, stamp: impl Into<String>) -> Self {
        self.source_stamp = Some(stamp.into());
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn matrix(&self) -> &Arc<SimilarityMatrix> {
        &self.matrix
    }

    /// Stamp of the source data this snapshot was built from, when known
    pub fn source_stamp(&self) -> Option<&str> {
        self.source_stamp.as_deref()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

/// Holds the current snapshot.
///
/// Builds are serialized by `build_lock` so a process never runs two
/// expensive builds (or two cache writers) at once.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
    build_lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot, if one has been installed
    pub fn get(&self) -> Option<Arc<CatalogSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Return the current snapshot, building one first if there is none.
    ///
    /// Concurrent callers wait for a single build.
    pub fn get_or_try_init<F>(&self, build: F) -> Result<Arc<CatalogSnapshot>>
    where
        F: FnOnce() -> Result<CatalogSnapshot>,
    {
        if let Some(snapshot) = self.get() {
            return Ok(snapshot);
        }

        let _guard = self.build_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(snapshot) = self.get() {
            return Ok(snapshot);
        }
        self.install(build()?)
    }

    /// Build a new snapshot and swap it in; the old one stays valid for
    /// readers still holding it.
    pub fn replace_with<F>(&self, build: F) -> Result<Arc<CatalogSnapshot>>
    where
        F: FnOnce() -> Result<CatalogSnapshot>,
    {
        let _guard = self.build_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.install(build()?)
    }

    fn install(&self, snapshot: CatalogSnapshot) -> Result<Arc<CatalogSnapshot>> {
        let snapshot = Arc::new(snapshot);
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(snapshot.clone());
        info!(movies = snapshot.len(), "Installed catalog snapshot");
        Ok(snapshot)
    }
}
