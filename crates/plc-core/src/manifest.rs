//! Conversion manifest
//!
//! Records every completed conversion together with the mapping that was
//! used, so a converted file can be traced back to its source columns.

use crate::convert::ConversionOutcome;
use crate::error::{Error, Result};
use crate::resolver::ResolvedMapping;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A record of one finished conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// When the output was written
    pub timestamp: DateTime<Utc>,
    /// Input file
    pub input: PathBuf,
    /// Converted file
    pub output: PathBuf,
    /// Number of data rows written
    pub rows: usize,
    /// Column mapping that produced the output
    pub mapping: ResolvedMapping,
}

impl ConversionRecord {
    /// Record a conversion that just completed
    pub fn from_outcome(outcome: &ConversionOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            input: outcome.input.clone(),
            output: outcome.output.clone(),
            rows: outcome.row_count(),
            mapping: outcome.conversion.mapping.clone(),
        }
    }
}

/// Manifest file containing all recorded conversions, oldest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    pub entries: Vec<ConversionRecord>,
}

impl Manifest {
    /// Create a new empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest from a file, or create empty if not exists
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the manifest to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn add(&mut self, record: ConversionRecord) {
        self.entries.push(record);
    }

    /// Most recent conversion of a given input file
    pub fn latest_for(&self, input: &Path) -> Option<&ConversionRecord> {
        self.entries.iter().rev().find(|r| r.input == input)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Append records to the manifest at `path`, creating it if needed
pub fn append_records<P: AsRef<Path>>(path: P, records: Vec<ConversionRecord>) -> Result<Manifest> {
    let path = path.as_ref();
    let mut manifest = Manifest::load(path)?;
    for record in records {
        manifest.add(record);
    }
    manifest.save(path)?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_columns;

    fn record(input: &str, rows: usize) -> ConversionRecord {
        ConversionRecord {
            timestamp: Utc::now(),
            input: PathBuf::from(input),
            output: PathBuf::from(format!("{input}.out")),
            rows,
            mapping: resolve_columns(&["Owner", "Units"]),
        }
    }

    #[test]
    fn test_manifest_add_and_latest() {
        let mut manifest = Manifest::new();
        manifest.add(record("a.csv", 1));
        manifest.add(record("b.csv", 2));
        manifest.add(record("a.csv", 3));

        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.latest_for(Path::new("a.csv")).unwrap().rows, 3);
        assert!(manifest.latest_for(Path::new("c.csv")).is_none());
    }

    #[test]
    fn test_manifest_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");

        assert!(Manifest::load(&path).unwrap().is_empty());

        append_records(&path, vec![record("a.csv", 5)]).unwrap();
        let manifest = append_records(&path, vec![record("b.csv", 7)]).unwrap();
        assert_eq!(manifest.len(), 2);

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.entries[0].mapping, resolve_columns(&["Owner", "Units"]));
    }

    #[test]
    fn test_manifest_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(Manifest::load(&path), Err(Error::Json(_))));
    }
}
