//! The engine facade used by callers.
//!
//! `MovieEngine` owns the configuration, the snapshot store and the mood
//! classifier. The first call that needs data loads the cached snapshot or
//! builds one; every query then runs against an immutable snapshot.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use data_loader::{DataLoadError, MetadataMap, MetadataSource, MovieId, PersonRole, UnknownMetadata};
use features::{CountVectorizer, MoodClassifier, SentimentScorer, VaderScorer};
use sources::DiscoverySource;

use crate::builder::build_snapshot;
use crate::cache::{CacheManager, source_stamp};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::orchestrator::Recommender;
use crate::results::{CategoryResults, MoodResults, MovieSummary, Recommendation, ResultFormatter};
use crate::snapshot::{CatalogSnapshot, SnapshotStore};

pub struct MovieEngine {
    config: EngineConfig,
    metadata: Option<Arc<dyn MetadataSource>>,
    classifier: MoodClassifier,
    store: SnapshotStore,
}

impl MovieEngine {
    /// Engine with VADER sentiment and metadata from `config.metadata_file`
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            metadata: None,
            classifier: MoodClassifier::new(Arc::new(VaderScorer::new())),
            store: SnapshotStore::new(),
        }
    }

    /// Use this enrichment source instead of the configured metadata file
    pub fn with_metadata_source(mut self, source: Arc<dyn MetadataSource>) -> Self {
        self.metadata = Some(source);
        self
    }

    pub fn with_sentiment_scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.classifier = MoodClassifier::new(scorer);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> CacheManager {
        CacheManager::new(&self.config.cache_dir)
    }

    /// The installed snapshot, without loading one
    pub fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        self.store.get()
    }

    /// Current snapshot; loads the cache or builds on first use.
    pub fn load_or_build_catalog(&self) -> Result<Arc<CatalogSnapshot>> {
        self.store.get_or_try_init(|| self.load_or_build())
    }

    /// Build from source data regardless of the cache, persist, and swap in.
    #[instrument(skip(self))]
    pub fn rebuild(&self) -> Result<Arc<CatalogSnapshot>> {
        self.store.replace_with(|| {
            let stamp = self.current_stamp()?;
            self.build_and_persist(&stamp)
        })
    }

    /// Ranked recommendations for a title; never fails.
    pub fn recommend(&self, title: &str) -> Vec<Recommendation> {
        match self.load_or_build_catalog() {
            Ok(snapshot) => Recommender::new(snapshot, &self.config).recommend(title),
            Err(e) => {
                warn!(error = %e, "Catalog unavailable");
                vec![self.formatter().not_ready()]
            }
        }
    }

    /// Detect the mood of free text and list movies for it
    pub fn movies_by_mood_text(&self, text: &str) -> Result<MoodResults> {
        let mood = self.classifier.classify_query(text);
        let (snapshot, discovery) = self.discovery()?;
        let movies = self.summaries(&snapshot, &discovery.by_mood(mood));
        info!(%mood, count = movies.len(), "Mood request");
        Ok(MoodResults { mood, movies })
    }

    pub fn movies_by_category(&self, category: &str) -> Result<CategoryResults> {
        let (snapshot, discovery) = self.discovery()?;
        let (category, positions) = discovery.by_category(category);
        Ok(CategoryResults {
            category,
            movies: self.summaries(&snapshot, &positions),
        })
    }

    pub fn movies_by_genre(&self, genre: &str) -> Result<Vec<MovieSummary>> {
        let (snapshot, discovery) = self.discovery()?;
        Ok(self.summaries(&snapshot, &discovery.by_genre(genre)))
    }

    /// `role` is "cast" or "director"
    pub fn movies_by_person(&self, role: &str, name: &str) -> Result<Vec<MovieSummary>> {
        let role: PersonRole = role.parse().map_err(|_| EngineError::UnknownRole(role.to_string()))?;
        let (snapshot, discovery) = self.discovery()?;
        Ok(self.summaries(&snapshot, &discovery.by_person(role, name)))
    }

    pub fn top_rated(&self) -> Result<Vec<MovieSummary>> {
        let (snapshot, discovery) = self.discovery()?;
        Ok(self.summaries(&snapshot, &discovery.top_rated()))
    }

    pub fn search_suggestions(&self, query: &str) -> Result<Vec<String>> {
        let (_, discovery) = self.discovery()?;
        Ok(discovery.search_suggestions(query))
    }

    pub fn overview(&self, id: Option<MovieId>, title: Option<&str>) -> Result<String> {
        let (_, discovery) = self.discovery()?;
        Ok(discovery.overview(id, title))
    }

    fn load_or_build(&self) -> Result<CatalogSnapshot> {
        let cache = self.cache();
        let stamp = match self.current_stamp() {
            Ok(stamp) => Some(stamp),
            Err(e) if cache.exists() => {
                warn!(error = %e, "Source data unavailable, using cache without a staleness check");
                None
            }
            Err(e) => return Err(e),
        };

        match cache.load(stamp.as_deref()) {
            Ok(Some(snapshot)) => return Ok(snapshot),
            Ok(None) => info!("No cached snapshot, building from source data"),
            Err(e) => warn!(error = %e, "Cached snapshot rejected, rebuilding"),
        }

        let stamp = match stamp {
            Some(stamp) => stamp,
            None => self.current_stamp()?,
        };
        self.build_and_persist(&stamp)
    }

    fn build_and_persist(&self, stamp: &str) -> Result<CatalogSnapshot> {
        let metadata = self.metadata_source()?;
        let vectorizer = CountVectorizer::new().with_max_features(self.config.max_features);
        let snapshot = build_snapshot(
            &self.config.source_files(),
            metadata.as_ref(),
            &self.classifier,
            &vectorizer,
        )?
        .with_source_stamp(stamp);

        if let Err(e) = self.cache().store(&snapshot, stamp) {
            warn!(error = %e, "Could not write cache, continuing with the in-memory snapshot");
        }
        Ok(snapshot)
    }

    /// Stamp over the files the next build would read and the build parameters
    fn current_stamp(&self) -> Result<String> {
        let files = self.config.source_files();
        let mut inputs: Vec<&Path> = files.active();
        let uses_metadata = !files.enriched.exists();
        if uses_metadata && self.metadata.is_none() {
            if let Some(path) = &self.config.metadata_file {
                inputs.push(path.as_path());
            }
        }

        if let Some(missing) = inputs.iter().find(|path| !path.exists()) {
            return Err(DataLoadError::FileNotFound {
                path: missing.display().to_string(),
            }
            .into());
        }

        let metadata_name = match (&self.metadata, uses_metadata) {
            (Some(source), true) => source.name(),
            _ => "",
        };
        let parameters = format!("max_features={};metadata={}", self.config.max_features, metadata_name);
        source_stamp(&inputs, &parameters)
    }

    fn metadata_source(&self) -> Result<Arc<dyn MetadataSource>> {
        if let Some(source) = &self.metadata {
            return Ok(source.clone());
        }
        match &self.config.metadata_file {
            Some(path) if !self.config.source_files().enriched.exists() => {
                Ok(Arc::new(MetadataMap::from_json_file(path)?))
            }
            _ => Ok(Arc::new(UnknownMetadata)),
        }
    }

    fn discovery(&self) -> Result<(Arc<CatalogSnapshot>, DiscoverySource)> {
        let snapshot = self.load_or_build_catalog()?;
        let discovery = DiscoverySource::new(snapshot.catalog().clone())
            .with_min_vote_count(self.config.browse_min_votes)
            .with_top_min_vote_count(self.config.top_rated_min_votes)
            .with_list_limit(self.config.browse_limit);
        Ok((snapshot, discovery))
    }

    fn summaries(&self, snapshot: &CatalogSnapshot, positions: &[usize]) -> Vec<MovieSummary> {
        let formatter = self.formatter();
        positions
            .iter()
            .filter_map(|&pos| snapshot.catalog().get(pos))
            .map(|record| formatter.summary(record))
            .collect()
    }

    fn formatter(&self) -> ResultFormatter {
        ResultFormatter::new(&self.config.image_base_url, &self.config.placeholder_poster_url)
    }
}
