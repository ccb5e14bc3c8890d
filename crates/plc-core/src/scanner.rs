//! Directory scanner for discovering property-list CSV files

use crate::error::Result;
use crate::export::is_converted_name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Result of scanning directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root directories that were scanned
    pub roots: Vec<PathBuf>,
    /// Convertible CSV files, sorted by path
    pub inputs: Vec<PathBuf>,
    /// Files skipped because they are earlier conversion results
    pub skipped: Vec<PathBuf>,
}

impl ScanResult {
    pub fn total_files(&self) -> usize {
        self.inputs.len() + self.skipped.len()
    }
}

/// Scan one or more directories for CSV files
pub fn scan_directory<P: AsRef<Path>>(roots: &[P]) -> Result<ScanResult> {
    let mut inputs = Vec::new();
    let mut skipped = Vec::new();

    for root in roots {
        let root = root.as_ref();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_file() || !is_csv(path) {
                continue;
            }

            if is_converted_name(path) {
                debug!(path = %path.display(), "skipping converted output");
                skipped.push(path.to_path_buf());
            } else {
                inputs.push(path.to_path_buf());
            }
        }
    }

    inputs.sort();
    inputs.dedup();
    skipped.sort();
    skipped.dedup();

    Ok(ScanResult {
        roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
        inputs,
        skipped,
    })
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
