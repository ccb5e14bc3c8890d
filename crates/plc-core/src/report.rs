//! Per-field mapping report shown to the user after resolution

use crate::resolver::ResolvedMapping;
use crate::schema::CanonicalField;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How one canonical field was filled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldStatus {
    /// Copied from an input column
    Matched { source_header: String },
    /// Written as an empty column
    Unmatched,
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub field: CanonicalField,
    #[serde(flatten)]
    pub status: FieldStatus,
}

/// Mapping report for a single conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    /// One entry per canonical field, in output order
    pub entries: Vec<ReportEntry>,
    /// Input columns that were dropped
    pub unused_columns: Vec<String>,
}

impl MappingReport {
    /// Build the report for a mapping over the given input headers
    pub fn new<S: AsRef<str>>(mapping: &ResolvedMapping, headers: &[S]) -> Self {
        let entries = CanonicalField::ALL
            .into_iter()
            .map(|field| ReportEntry {
                field,
                status: match mapping.source_header(field) {
                    Some(source) => FieldStatus::Matched {
                        source_header: source.to_string(),
                    },
                    None => FieldStatus::Unmatched,
                },
            })
            .collect();

        let unused_columns = mapping
            .unused_headers(headers)
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            entries,
            unused_columns,
        }
    }

    pub fn matched_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, FieldStatus::Matched { .. }))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.matched_count() == self.entries.len()
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            FieldStatus::Matched { source_header } => {
                write!(f, "[ok]   {} <- {}", self.field, source_header)
            }
            FieldStatus::Unmatched => {
                write!(f, "[miss] {} <- not found (will be empty)", self.field)
            }
        }
    }
}

impl fmt::Display for MappingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        if !self.unused_columns.is_empty() {
            writeln!(f, "Unused input columns: {}", self.unused_columns.join(", "))?;
        }
        Ok(())
    }
}
