//! On-disk compatibility cache
//!
//! The cache is one JSON object mapping normalized titles to records.
//! Loading never fails outward (an unreadable or corrupt file is an empty
//! cache) and saving reports success as a boolean. Each save writes the
//! full mapping, so repeated saves are idempotent.

use crate::types::CompatCache;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Storage backing for the compatibility cache
pub trait CompatStore: Send + Sync {
    /// Load the cache, or an empty mapping when nothing usable exists
    fn load(&self) -> CompatCache;

    /// Persist the full cache snapshot; returns whether the write succeeded
    fn save(&self, cache: &CompatCache) -> bool;
}

/// File-backed store holding the cache as a single JSON object
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompatStore for CacheStore {
    fn load(&self) -> CompatCache {
        if !self.path.exists() {
            return CompatCache::new();
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Error reading compat cache");
                return CompatCache::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(cache) => cache,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Error parsing compat cache");
                CompatCache::new()
            }
        }
    }

    fn save(&self, cache: &CompatCache) -> bool {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!(path = %parent.display(), error = %e, "Error creating cache directory");
                return false;
            }
        }

        let json = match serde_json::to_string_pretty(cache) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Error serializing compat cache");
                return false;
            }
        };

        match std::fs::write(&self.path, json) {
            Ok(()) => {
                info!(entries = cache.len(), path = %self.path.display(), "Saved compat cache");
                true
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Error saving compat cache");
                false
            }
        }
    }
}
