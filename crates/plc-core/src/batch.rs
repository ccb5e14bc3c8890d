//! Batch conversion driven by a JSON batch file

use crate::convert::{convert_file, ConversionOutcome, ConvertOptions};
use crate::error::{Error, Result};
use crate::manifest::{append_records, ConversionRecord};
use crate::parser::{parse_delimiter, ParseOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

fn default_delimiter() -> char {
    ','
}

/// A batch of conversions sharing one output directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFile {
    /// Input CSV files
    pub inputs: Vec<PathBuf>,
    /// Where converted files are written
    pub output_dir: PathBuf,
    /// Input field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Replace existing outputs
    #[serde(default)]
    pub overwrite: bool,
    /// Optional manifest to append conversion records to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
}

impl BatchFile {
    /// Load a batch file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let batch: BatchFile = serde_json::from_str(&content)?;
        batch.parse_options()?;
        Ok(batch)
    }

    /// Save a batch file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Parse options for every input in the batch
    pub fn parse_options(&self) -> Result<ParseOptions> {
        let delimiter = parse_delimiter(&self.delimiter.to_string())?;
        Ok(ParseOptions::default().with_delimiter(delimiter))
    }

    fn convert_options(&self) -> Result<ConvertOptions> {
        Ok(ConvertOptions {
            parse: self.parse_options()?,
            output: None,
            output_dir: Some(self.output_dir.clone()),
            overwrite: self.overwrite,
        })
    }
}

/// Result of running a batch
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Conversions that completed
    pub converted: Vec<ConversionOutcome>,
    /// Inputs that failed, with the reason
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchResult {
    pub fn total_rows(&self) -> usize {
        self.converted.iter().map(ConversionOutcome::row_count).sum()
    }
}

/// Convert every input of a batch
pub fn run_batch(batch: &BatchFile) -> Result<BatchResult> {
    let options = batch.convert_options()?;
    convert_all(&batch.inputs, &options, batch.manifest.as_deref())
}

/// Convert a list of inputs with shared options
///
/// A failing input is recorded and skipped; the rest still runs. Each output
/// path belongs to the first input that targets it, later inputs mapping to
/// the same path fail with `Error::OutputCollision`. Completed conversions
/// are appended to `manifest`, if given.
pub fn convert_all<P: AsRef<Path>>(
    inputs: &[P],
    options: &ConvertOptions,
    manifest: Option<&Path>,
) -> Result<BatchResult> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut result = BatchResult::default();

    for input in inputs {
        let input = input.as_ref();
        let output = options.output_path_for(input);

        let converted = match claimed.get(&output) {
            Some(earlier) => Err(Error::OutputCollision {
                output,
                earlier: earlier.to_path_buf(),
            }),
            None => {
                claimed.insert(output, input);
                convert_file(input, options)
            }
        };

        match converted {
            Ok(outcome) => result.converted.push(outcome),
            Err(e) => {
                warn!(input = %input.display(), error = %e, "conversion failed");
                result.errors.push((input.to_path_buf(), e.to_string()));
            }
        }
    }

    if let Some(manifest) = manifest {
        if !result.converted.is_empty() {
            let records = result.converted.iter().map(ConversionRecord::from_outcome).collect();
            append_records(manifest, records)?;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CanonicalField;

    #[test]
    fn test_batch_defaults() {
        let batch: BatchFile =
            serde_json::from_str(r#"{"inputs": ["a.csv"], "output_dir": "out"}"#).unwrap();

        assert_eq!(batch.delimiter, ',');
        assert!(!batch.overwrite);
        assert!(batch.manifest.is_none());
        assert_eq!(batch.parse_options().unwrap().delimiter, b',');
    }

    #[test]
    fn test_batch_rejects_wide_delimiter() {
        let batch = BatchFile {
            inputs: vec![],
            output_dir: PathBuf::from("out"),
            delimiter: '→',
            overwrite: false,
            manifest: None,
        };
        assert!(batch.parse_options().is_err());
    }

    #[test]
    fn test_run_batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        let empty = dir.path().join("empty.csv");
        fs::write(&good, "Community\tUnits\nElm House\t14\nBirch Yard\t30\n").unwrap();
        fs::write(&empty, "").unwrap();

        let batch = BatchFile {
            inputs: vec![empty.clone(), dir.path().join("missing.csv"), good],
            output_dir: dir.path().join("out"),
            delimiter: '\t',
            overwrite: false,
            manifest: None,
        };

        let result = run_batch(&batch).unwrap();

        assert_eq!(result.converted.len(), 1);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].0, empty);
        assert_eq!(result.total_rows(), 2);
        assert!(!dir.path().join("out").join("empty_converted.csv").exists());

        let outcome = &result.converted[0];
        assert_eq!(outcome.output, dir.path().join("out").join("good_converted.csv"));
        assert_eq!(
            outcome.conversion.output.column(CanonicalField::CommunityName),
            vec!["Elm House", "Birch Yard"]
        );
    }

    #[test]
    fn test_run_batch_appends_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("list.csv");
        fs::write(&input, "Owner\nAcme\n").unwrap();
        let manifest_path = dir.path().join("manifest.json");

        let batch = BatchFile {
            inputs: vec![input.clone()],
            output_dir: dir.path().join("out"),
            delimiter: ',',
            overwrite: true,
            manifest: Some(manifest_path.clone()),
        };
        run_batch(&batch).unwrap();
        run_batch(&batch).unwrap();

        let manifest = crate::manifest::Manifest::load(&manifest_path).unwrap();
        assert_eq!(manifest.len(), 2);
        let latest = manifest.latest_for(&input).unwrap();
        assert_eq!(latest.rows, 1);
        assert_eq!(
            latest.mapping.source_header(CanonicalField::OwnershipGroupName),
            Some("Owner")
        );
    }

    #[test]
    fn test_same_stem_inputs_do_not_share_an_output() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a").join("list.csv");
        let second = dir.path().join("b").join("list.csv");
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&first, "Owner\nAcme\n").unwrap();
        fs::write(&second, "Owner\nZenith\n").unwrap();
        let manifest_path = dir.path().join("manifest.json");

        let batch = BatchFile {
            inputs: vec![first.clone(), second.clone()],
            output_dir: dir.path().join("out"),
            delimiter: ',',
            overwrite: true,
            manifest: Some(manifest_path.clone()),
        };
        let result = run_batch(&batch).unwrap();

        assert_eq!(result.converted.len(), 1);
        assert_eq!(result.converted[0].input, first);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].0, second);
        assert!(result.errors[0].1.contains("collides with earlier input"));

        let written = fs::read_to_string(dir.path().join("out").join("list_converted.csv")).unwrap();
        assert!(written.ends_with(",,,,,,Acme\n"));

        let manifest = crate::manifest::Manifest::load(&manifest_path).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries[0].input, first);
    }

    #[test]
    fn test_convert_all_next_to_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let west = dir.path().join("west");
        fs::create_dir_all(&west).unwrap();
        fs::write(dir.path().join("list.csv"), "Name,Units\nMaple Court,120\n").unwrap();
        fs::write(west.join("list.csv"), "Name,Units\nOak Row,40\n").unwrap();
        fs::write(west.join("broken.csv"), "").unwrap();

        let scan = crate::scanner::scan_directory(&[dir.path()]).unwrap();
        let result = convert_all(&scan.inputs, &ConvertOptions::default(), None).unwrap();

        assert_eq!(result.converted.len(), 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].0, west.join("broken.csv"));
        assert_eq!(result.total_rows(), 2);
        assert!(dir.path().join("list_converted.csv").exists());
        assert!(west.join("list_converted.csv").exists());
    }

    #[test]
    fn test_batch_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        let batch = BatchFile {
            inputs: vec![PathBuf::from("a.csv")],
            output_dir: PathBuf::from("out"),
            delimiter: ';',
            overwrite: true,
            manifest: Some(PathBuf::from("manifest.json")),
        };

        batch.save(&path).unwrap();
        let loaded = BatchFile::load(&path).unwrap();

        assert_eq!(loaded.inputs, batch.inputs);
        assert_eq!(loaded.delimiter, ';');
        assert!(loaded.overwrite);
        assert_eq!(loaded.manifest, Some(PathBuf::from("manifest.json")));
    }
}
