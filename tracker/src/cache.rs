//! Flat JSON cache of the last reported progress.
//!
//! The cache file (`.progress_cache`) lives next to the manifest and stores
//! the passing count and passing positions from the last run that reported
//! progress:
//!
//! ```json
//! {"count": 12, "passing_indices": [0, 1, 4]}
//! ```
//!
//! A missing or unreadable cache means "no previous progress". There is no
//! locking; concurrent runs race and the last writer wins.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::ProgressSnapshot;

/// File name of the cache inside a project directory.
pub const CACHE_FILE: &str = ".progress_cache";

/// Persisted progress state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Passing count at the time of the write.
    #[serde(default)]
    pub count: usize,

    /// Ascending positions of passing records.
    #[serde(default)]
    pub passing_indices: Vec<usize>,
}

impl CacheRecord {
    #[must_use]
    pub fn from_snapshot(snapshot: &ProgressSnapshot) -> Self {
        Self {
            count: snapshot.passing,
            passing_indices: snapshot.passing_indices.iter().copied().collect(),
        }
    }

    /// Passing positions as a set.
    #[must_use]
    pub fn passing_set(&self) -> BTreeSet<usize> {
        self.passing_indices.iter().copied().collect()
    }
}

/// Handle to a cache file.
#[derive(Debug, Clone)]
pub struct ProgressCache {
    path: PathBuf,
}

impl ProgressCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache stored as [`CACHE_FILE`] inside `project_dir`.
    #[must_use]
    pub fn in_dir(project_dir: &Path) -> Self {
        Self::new(project_dir.join(CACHE_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads and parses the cache file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read or a JSON error if it
    /// does not hold a cache record.
    pub fn read(&self) -> Result<CacheRecord> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Loads the cached record, treating a missing or corrupt file as no
    /// previous progress.
    #[must_use]
    pub fn load(&self) -> CacheRecord {
        if !self.exists() {
            debug!(path = %self.path.display(), "No progress cache yet");
            return CacheRecord::default();
        }

        match self.read() {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable progress cache"
                );
                CacheRecord::default()
            }
        }
    }

    /// Overwrites the cache file with `record`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn store(&self, record: &CacheRecord) -> Result<()> {
        let contents = serde_json::to_string(record)?;
        fs::write(&self.path, contents)?;
        debug!(
            path = %self.path.display(),
            count = record.count,
            "Progress cache written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_cache_loads_default() {
        let dir = TempDir::new().unwrap();
        let cache = ProgressCache::in_dir(dir.path());

        assert!(!cache.exists());
        assert_eq!(cache.load(), CacheRecord::default());
    }

    #[test]
    fn test_corrupt_cache_loads_default() {
        let dir = TempDir::new().unwrap();
        let cache = ProgressCache::in_dir(dir.path());
        fs::write(cache.path(), "{not json").unwrap();

        assert!(cache.exists());
        assert!(cache.read().is_err());
        assert_eq!(cache.load(), CacheRecord::default());
    }

    #[test]
    fn test_negative_count_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let cache = ProgressCache::in_dir(dir.path());
        fs::write(cache.path(), r#"{"count": -3, "passing_indices": []}"#).unwrap();

        assert_eq!(cache.load(), CacheRecord::default());
    }

    #[test]
    fn test_missing_fields_default() {
        let dir = TempDir::new().unwrap();
        let cache = ProgressCache::in_dir(dir.path());
        fs::write(cache.path(), r#"{"count": 4}"#).unwrap();

        let record = cache.load();
        assert_eq!(record.count, 4);
        assert!(record.passing_indices.is_empty());
    }

    #[test]
    fn test_store_then_load() {
        let dir = TempDir::new().unwrap();
        let cache = ProgressCache::in_dir(dir.path());
        let snapshot = ProgressSnapshot::new(10, BTreeSet::from([7, 1, 3]));

        cache
            .store(&CacheRecord::from_snapshot(&snapshot))
            .expect("store should succeed");

        let record = cache.load();
        assert_eq!(record.count, 3);
        assert_eq!(record.passing_indices, vec![1, 3, 7]);
        assert_eq!(record.passing_set(), snapshot.passing_indices);
    }

    #[test]
    fn test_store_uses_wire_field_names() {
        let dir = TempDir::new().unwrap();
        let cache = ProgressCache::in_dir(dir.path());

        cache
            .store(&CacheRecord {
                count: 2,
                passing_indices: vec![0, 5],
            })
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(cache.path()).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"count": 2, "passing_indices": [0, 5]}));
    }

    #[test]
    fn test_store_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let cache = ProgressCache::in_dir(&dir.path().join("missing"));

        assert!(cache.store(&CacheRecord::default()).is_err());
    }
}
