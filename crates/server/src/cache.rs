//! Persisted catalog and similarity artifacts.
//!
//! Two bincode files, each wrapped in an envelope carrying the cache
//! format version and a SHA-256 stamp of the source data:
//! - `catalog_cache.bin`: the catalog records in catalog order
//! - `similarity_cache.bin`: the similarity matrix
//!
//! The pair is only accepted when both envelopes carry the current format
//! version and the same stamp, the stamp matches the current source data,
//! and the shapes agree. Files are written to a temporary file in the cache
//! directory and renamed into place.

use crate::error::{EngineError, Result};
use crate::snapshot::CatalogSnapshot;
use bincode::Options;
use data_loader::{Catalog, MovieRecord};
use features::SimilarityMatrix;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CACHE_FORMAT_VERSION: u32 = 1;
pub const CATALOG_CACHE_FILE: &str = "catalog_cache.bin";
pub const SIMILARITY_CACHE_FILE: &str = "similarity_cache.bin";

#[derive(Serialize, Deserialize)]
struct CacheEnvelope<T> {
    format_version: u32,
    source_stamp: String,
    payload: T,
}

/// Reads and writes the cache artifacts in one directory
#[derive(Debug, Clone)]
pub struct CacheManager {
    dir: PathBuf,
}

impl CacheManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(CATALOG_CACHE_FILE)
    }

    pub fn matrix_path(&self) -> PathBuf {
        self.dir.join(SIMILARITY_CACHE_FILE)
    }

    pub fn exists(&self) -> bool {
        self.catalog_path().exists() && self.matrix_path().exists()
    }

    /// Load the cached snapshot.
    ///
    /// `Ok(None)` when either artifact is absent. When `expected_stamp` is
    /// given, a different stored stamp is a `StaleCache` error.
    pub fn load(&self, expected_stamp: Option<&str>) -> Result<Option<CatalogSnapshot>> {
        if !self.exists() {
            debug!(dir = %self.dir.display(), "No cache artifacts");
            return Ok(None);
        }

        let catalog: CacheEnvelope<Vec<MovieRecord>> = read_artifact(&self.catalog_path())?;
        let matrix: CacheEnvelope<SimilarityMatrix> = read_artifact(&self.matrix_path())?;

        for version in [catalog.format_version, matrix.format_version] {
            if version != CACHE_FORMAT_VERSION {
                return Err(EngineError::StaleCache(format!(
                    "format version {} (current {})",
                    version, CACHE_FORMAT_VERSION
                )));
            }
        }
        if catalog.source_stamp != matrix.source_stamp {
            return Err(EngineError::StaleCache(
                "catalog and similarity artifacts come from different builds".to_string(),
            ));
        }
        if expected_stamp.is_some_and(|expected| expected != catalog.source_stamp) {
            return Err(EngineError::StaleCache("source data changed since the cache was written".to_string()));
        }
        if !matrix.payload.is_well_formed() {
            return Err(EngineError::MalformedMatrix);
        }

        let snapshot = CatalogSnapshot::new(Catalog::new(catalog.payload), matrix.payload)?
            .with_source_stamp(catalog.source_stamp);
        info!(movies = snapshot.len(), "Loaded catalog snapshot from cache");
        Ok(Some(snapshot))
    }

    /// Persist both artifacts under `stamp`
    pub fn store(&self, snapshot: &CatalogSnapshot, stamp: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| cache_io(&self.dir, source))?;

        let catalog = CacheEnvelope {
            format_version: CACHE_FORMAT_VERSION,
            source_stamp: stamp.to_string(),
            payload: snapshot.catalog().records(),
        };
        let matrix = CacheEnvelope {
            format_version: CACHE_FORMAT_VERSION,
            source_stamp: stamp.to_string(),
            payload: snapshot.matrix().as_ref(),
        };

        write_artifact(&self.dir, &self.catalog_path(), &catalog)?;
        write_artifact(&self.dir, &self.matrix_path(), &matrix)?;
        info!(dir = %self.dir.display(), movies = snapshot.len(), "Wrote cache artifacts");
        Ok(())
    }

    /// Delete both artifacts; missing files are fine
    pub fn clear(&self) -> Result<()> {
        for path in [self.catalog_path(), self.matrix_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(cache_io(&path, source)),
            }
        }
        Ok(())
    }
}

/// SHA-256 over the cache format version, build parameters and the
/// contents of every input file, as lowercase hex.
pub fn source_stamp(inputs: &[&Path], parameters: &str) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(CACHE_FORMAT_VERSION.to_le_bytes());
    hasher.update(parameters.as_bytes());

    for path in inputs {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        hasher.update(name.as_bytes());
        hasher.update([0u8]);

        let mut file = File::open(path).map_err(|source| cache_io(path, source))?;
        io::copy(&mut file, &mut hasher).map_err(|source| cache_io(path, source))?;
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Decode one artifact; no length prefix may claim more bytes than the file holds.
fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| cache_io(path, source))?;
    let len = file.metadata().map_err(|source| cache_io(path, source))?.len();
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(len)
        .deserialize_from(BufReader::new(file))
        .map_err(|source| EngineError::CacheCodec {
            path: path.display().to_string(),
            source,
        })
}

fn write_artifact<T: Serialize>(dir: &Path, path: &Path, value: &T) -> Result<()> {
    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| cache_io(dir, source))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        bincode::serialize_into(&mut writer, value).map_err(|source| EngineError::CacheCodec {
            path: path.display().to_string(),
            source,
        })?;
        writer.flush().map_err(|source| cache_io(path, source))?;
    }
    tmp.persist(path).map_err(|e| cache_io(path, e.error))?;
    Ok(())
}

fn cache_io(path: &Path, source: io::Error) -> EngineError {
    EngineError::CacheIo {
        path: path.display().to_string(),
        source,
    }
}
