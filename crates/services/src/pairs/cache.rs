use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use vote_core::model::{LanguageCode, LanguageSpec};

use super::loader::{PairSet, load_pairs};
use crate::error::PairLoadError;

type CacheKey = (PathBuf, LanguageCode);

/// Memoizes loaded pair sets per (source path, language).
///
/// A cached set keeps its shuffled order until [`PairCache::clear`] is
/// called, so every request in between sees the same presentation order.
pub struct PairCache {
    entries: Mutex<HashMap<CacheKey, Arc<PairSet>>>,
    rng: Mutex<StdRng>,
}

impl Default for PairCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PairCache {
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Cache whose shuffles are reproducible from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Return the cached set for `(path, language)`, loading it on first use.
    ///
    /// Failed loads are not cached.
    ///
    /// # Errors
    ///
    /// Propagates `PairLoadError` from the loader.
    pub fn get_or_load(
        &self,
        path: &Path,
        language: &LanguageSpec,
    ) -> Result<Arc<PairSet>, PairLoadError> {
        let key = (path.to_path_buf(), language.code.clone());
        if let Some(hit) = self.lock_entries().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let loaded = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::new(load_pairs(path, language, &mut *rng)?)
        };

        // A concurrent load of the same key may have won; keep the first one.
        let mut entries = self.lock_entries();
        let entry = entries.entry(key).or_insert(loaded);
        Ok(Arc::clone(entry))
    }

    /// Drop every cached set; the next load reshuffles.
    pub fn clear(&self) {
        self.lock_entries().clear();
        tracing::debug!("pair cache cleared");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Arc<PairSet>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
