use crate::{
    error::EngineError,
    models::RecommendationSet,
    services::{
        diagnostics::{self, DiagnosticRun},
        index::{CatalogIndex, IndexSettings},
        stats::CatalogStats,
    },
};
use std::{
    path::Path,
    sync::{Arc, Mutex, PoisonError, RwLock},
};
use tracing::{info, warn};

/// Serves queries from the current catalog snapshot and swaps in rebuilt ones.
///
/// Readers clone the `Arc` and work on it lock-free; a rebuild builds a complete new
/// snapshot first and replaces the pointer in one step.
pub struct RecommendationService {
    current: RwLock<Arc<CatalogIndex>>,
    rebuild_lock: Mutex<()>,
    settings: IndexSettings,
    default_recommendations: usize,
}

impl RecommendationService {
    pub fn new(index: CatalogIndex, settings: IndexSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
            rebuild_lock: Mutex::new(()),
            settings,
            default_recommendations: 5,
        }
    }

    pub fn from_catalog_path(path: &Path, settings: IndexSettings) -> Result<Self, EngineError> {
        let index = CatalogIndex::from_path(path, settings)?;
        Ok(Self::new(index, settings))
    }

    pub fn with_default_recommendations(mut self, count: usize) -> Self {
        self.default_recommendations = count.max(1);
        self
    }

    pub fn default_recommendations(&self) -> usize {
        self.default_recommendations
    }

    pub fn snapshot(&self) -> Arc<CatalogIndex> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn recommend(&self, query: &str, k: usize) -> Result<RecommendationSet, EngineError> {
        self.snapshot().recommend(query, k)
    }

    pub fn stats(&self) -> CatalogStats {
        self.snapshot().stats()
    }

    pub fn diagnostics(&self) -> Vec<DiagnosticRun> {
        diagnostics::sample_runs(
            &self.snapshot(),
            diagnostics::DEFAULT_SAMPLES,
            diagnostics::DEFAULT_SAMPLE_RECOMMENDATIONS,
        )
    }

    /// Reload the catalog from `path` and publish the new snapshot.
    ///
    /// Concurrent rebuilds are serialised. On failure the previous snapshot stays live.
    pub fn rebuild(&self, path: &Path) -> Result<Arc<CatalogIndex>, EngineError> {
        let _guard = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let previous = self.snapshot().id();
        info!("Rebuilding catalog index from {}", path.display());

        let rebuilt = match CatalogIndex::from_path(path, self.settings) {
            Ok(index) => Arc::new(index),
            Err(e) => {
                warn!("Rebuild failed, keeping index {}: {}", previous, e);
                return Err(e);
            }
        };

        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = rebuilt.clone();
        info!("Swapped catalog index {} for {}", previous, rebuilt.id());
        Ok(rebuilt)
    }
}
