//! Feature manifest reading and pass counting.
//!
//! The manifest (`feature_list.json`) is owned by the coding workflow; this
//! module only reads it. Two shapes are accepted:
//!
//! - a bare array of records: `[{"description": ..., "passes": true}, ...]`
//! - an object wrapping that array: `{"features": [...]}`
//!
//! Any other top-level shape is treated as an empty manifest. Entries are
//! identified by their position, since records carry no explicit id.
//!
//! Reading never fails from the caller's point of view: [`Manifest::load`]
//! degrades a missing or malformed file to an empty manifest.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::ProgressSnapshot;

/// File name of the manifest inside a project directory.
pub const MANIFEST_FILE: &str = "feature_list.json";

/// Key holding the record array in the wrapped manifest shape.
const FEATURES_KEY: &str = "features";

/// A single feature/test record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub description: Option<String>,
    pub category: Option<String>,
    pub passes: bool,
}

impl FeatureRecord {
    /// Extracts a record from a JSON object.
    ///
    /// Only a boolean `true` counts as passing. Non-string descriptions and
    /// categories are ignored.
    fn from_object(object: &Map<String, Value>) -> Self {
        let string_field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            description: string_field("description"),
            category: string_field("category"),
            passes: object.get("passes").and_then(Value::as_bool).unwrap_or(false),
        }
    }

    /// Human-readable label for the record at `index`.
    ///
    /// Falls back to `Test #<index + 1>` without a description and prefixes a
    /// non-empty category in brackets.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        let description = self
            .description
            .clone()
            .unwrap_or_else(|| format!("Test #{}", index + 1));

        match self.category.as_deref() {
            Some(category) if !category.is_empty() => format!("[{category}] {description}"),
            _ => description,
        }
    }
}

/// One positional manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// A structured record.
    Feature(FeatureRecord),

    /// A bare literal (string, number, ...). Counted, never passing.
    Literal,
}

impl ManifestEntry {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(object) => Self::Feature(FeatureRecord::from_object(object)),
            _ => Self::Literal,
        }
    }

    /// Returns the record if this entry is passing.
    #[must_use]
    pub fn passing_record(&self) -> Option<&FeatureRecord> {
        match self {
            Self::Feature(record) if record.passes => Some(record),
            _ => None,
        }
    }
}

/// Ordered manifest contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Loads a manifest, degrading any failure to an empty manifest.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Manifest not found");
            return Self::default();
        }

        match Self::read(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read manifest");
                Self::default()
            }
        }
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a JSON error if
    /// it is not valid JSON. An unrecognised top-level shape is not an error.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)?;
        Ok(Self::from_value(&value))
    }

    /// Builds a manifest from parsed JSON.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let records = match value {
            Value::Array(records) => Some(records),
            Value::Object(object) => object.get(FEATURES_KEY).and_then(Value::as_array),
            _ => None,
        };

        let entries = records
            .map(|records| records.iter().map(ManifestEntry::from_value).collect())
            .unwrap_or_default();

        Self { entries }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Computes passing/total counts and passing positions.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let passing_indices: BTreeSet<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.passing_record().is_some())
            .map(|(index, _)| index)
            .collect();

        ProgressSnapshot::new(self.entries.len(), passing_indices)
    }

    /// Labels of passing records whose positions are not in `previous`,
    /// in manifest order.
    #[must_use]
    pub fn newly_completed(&self, previous: &BTreeSet<usize>) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(index, _)| !previous.contains(index))
            .filter_map(|(index, entry)| entry.passing_record().map(|record| record.label(index)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_bare_array_counts_passing() {
        let manifest = Manifest::from_value(&json!([
            {"description": "a", "passes": true},
            {"description": "b", "passes": false},
            {"description": "c", "passes": true},
        ]));

        let snapshot = manifest.snapshot();
        assert_eq!(snapshot.passing, 2);
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.passing_indices, BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_wrapped_features_shape() {
        let manifest = Manifest::from_value(&json!({
            "project": "demo",
            "features": [
                {"description": "a", "passes": false},
                {"description": "b", "passes": true},
            ]
        }));

        let snapshot = manifest.snapshot();
        assert_eq!(snapshot.passing, 1);
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.passing_indices, BTreeSet::from([1]));
    }

    #[test]
    fn test_unrecognised_shapes_are_empty() {
        for value in [
            json!({"tests": [{"passes": true}]}),
            json!({"features": "not an array"}),
            json!("just a string"),
            json!(42),
            json!(null),
        ] {
            let manifest = Manifest::from_value(&value);
            assert!(manifest.is_empty(), "expected empty manifest for {value}");
            assert_eq!(manifest.snapshot(), ProgressSnapshot::default());
        }
    }

    #[test]
    fn test_literals_count_toward_total_only() {
        let manifest = Manifest::from_value(&json!([
            "loose string",
            true,
            {"description": "real", "passes": true},
        ]));

        let snapshot = manifest.snapshot();
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.passing, 1);
        assert_eq!(snapshot.passing_indices, BTreeSet::from([2]));
    }

    #[test]
    fn test_passes_must_be_boolean_true() {
        let manifest = Manifest::from_value(&json!([
            {"passes": "true"},
            {"passes": 1},
            {"passes": null},
            {},
            {"passes": true},
        ]));

        let snapshot = manifest.snapshot();
        assert_eq!(snapshot.passing, 1);
        assert_eq!(snapshot.total, 5);
    }

    #[test]
    fn test_label_with_category_and_fallback() {
        let with_category = FeatureRecord {
            description: Some("User can log in".to_string()),
            category: Some("auth".to_string()),
            passes: true,
        };
        let empty_category = FeatureRecord {
            description: Some("Renders home".to_string()),
            category: Some(String::new()),
            passes: true,
        };
        let no_description = FeatureRecord {
            description: None,
            category: None,
            passes: true,
        };

        assert_eq!(with_category.label(0), "[auth] User can log in");
        assert_eq!(empty_category.label(1), "Renders home");
        assert_eq!(no_description.label(6), "Test #7");
    }

    #[test]
    fn test_newly_completed_skips_previous_indices() {
        let manifest = Manifest::from_value(&json!([
            {"description": "old", "passes": true},
            {"description": "still failing", "passes": false},
            {"description": "new", "category": "ui", "passes": true},
            {"passes": true},
        ]));

        let completed = manifest.newly_completed(&BTreeSet::from([0]));

        assert_eq!(completed, vec!["[ui] new".to_string(), "Test #4".to_string()]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();

        let manifest = Manifest::load(&dir.path().join(MANIFEST_FILE));

        assert!(manifest.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, "[{\"passes\": true,").unwrap();

        assert!(Manifest::read(&path).is_err());
        assert!(Manifest::load(&path).is_empty());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, r#"[{"description": "a", "passes": true}, {"passes": false}]"#).unwrap();

        let snapshot = Manifest::load(&path).snapshot();

        assert_eq!(snapshot.passing, 1);
        assert_eq!(snapshot.total, 2);
    }
}
