//! Resume cache for audit resolution.
//!
//! Resolving a large set of requirement blocks can be interrupted and
//! restarted. The cache records the resolved requirements of each block
//! alongside the fingerprint of the rules they were resolved from, so a rerun
//! can skip blocks whose input has not changed.
//!
//! The cache is a plain value owned by the caller and persisted as JSON.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::domain::Requirement;

/// Errors reading or writing a cache file.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache file could not be read or written.
    #[error("failed to access cache file {path}: {source}")]
    Io {
        /// Path of the cache file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The cache file is not a valid cache.
    #[error("failed to parse cache file {path}: {source}")]
    Parse {
        /// Path of the cache file.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
}

/// The cached resolution of one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Fingerprint of the rules the requirements were resolved from.
    pub fingerprint: String,

    /// When the block was resolved.
    pub resolved_at: DateTime<Utc>,

    /// The resolved requirements.
    pub requirements: Vec<Requirement>,
}

/// Resolved blocks keyed by block identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeCache {
    entries: BTreeMap<String, CacheEntry>,
}

impl ResumeCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a cache from a JSON file.
    ///
    /// A missing file yields an empty cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No cache at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| CacheError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the cache to a JSON file, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| CacheError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The cached entry for `block`, if it was resolved from input with the
    /// given fingerprint.
    ///
    /// A stale entry is treated as absent.
    #[must_use]
    pub fn get(&self, block: &str, fingerprint: &str) -> Option<&CacheEntry> {
        self.entries
            .get(block)
            .filter(|entry| entry.fingerprint == fingerprint)
    }

    /// Records the resolution of `block`, replacing any previous entry.
    pub fn insert(
        &mut self,
        block: impl Into<String>,
        fingerprint: impl Into<String>,
        requirements: Vec<Requirement>,
    ) {
        self.entries.insert(
            block.into(),
            CacheEntry {
                fingerprint: fingerprint.into(),
                resolved_at: Utc::now(),
                requirements,
            },
        );
    }

    /// Drops the entry for `block`.
    pub fn remove(&mut self, block: &str) -> Option<CacheEntry> {
        self.entries.remove(block)
    }

    /// The number of cached blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no block is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn requirements() -> Vec<Requirement> {
        vec![Requirement::Marker {
            label: "Entry Level Writing Required".to_owned(),
        }]
    }

    #[test]
    fn fingerprint_must_match() {
        let mut cache = ResumeCache::new();
        cache.insert("U-MAJOR-0201", "abc", requirements());

        assert_eq!(
            cache.get("U-MAJOR-0201", "abc").map(|e| &e.requirements),
            Some(&requirements())
        );
        assert!(cache.get("U-MAJOR-0201", "def").is_none());
        assert!(cache.get("U-MAJOR-0202", "abc").is_none());
    }

    #[test]
    fn insert_replaces_entry() {
        let mut cache = ResumeCache::new();
        cache.insert("U-MAJOR-0201", "abc", Vec::new());
        cache.insert("U-MAJOR-0201", "def", requirements());

        assert_eq!(cache.len(), 1);
        assert!(cache.get("U-MAJOR-0201", "abc").is_none());
        assert!(cache.get("U-MAJOR-0201", "def").is_some());

        assert!(cache.remove("U-MAJOR-0201").is_some());
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let cache = ResumeCache::load(&dir.path().join("cache.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = ResumeCache::new();
        cache.insert("U-MAJOR-0201", "abc", requirements());
        cache.save(&path).unwrap();

        let loaded = ResumeCache::load(&path).unwrap();
        assert_eq!(loaded, cache);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["U-MAJOR-0201"]["resolvedAt"].is_string());
        assert_eq!(raw["U-MAJOR-0201"]["fingerprint"], "abc");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            ResumeCache::load(&path),
            Err(CacheError::Parse { .. })
        ));
    }
}
