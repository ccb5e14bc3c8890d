//! Row transcription into the canonical column layout

use crate::resolver::{resolve_columns, ResolvedMapping};
use crate::schema::{canonical_header, CanonicalField};
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// One output row, one value per canonical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedRow {
    pub values: [String; CanonicalField::COUNT],
}

impl ConvertedRow {
    /// Get the value for a field
    pub fn get(&self, field: CanonicalField) -> &str {
        &self.values[field.index()]
    }
}

/// The standardized table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedTable {
    pub rows: Vec<ConvertedRow>,
}

impl ConvertedTable {
    /// Output header row
    pub fn header(&self) -> [&'static str; CanonicalField::COUNT] {
        canonical_header()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All values of one field, top to bottom
    pub fn column(&self, field: CanonicalField) -> Vec<&str> {
        self.rows.iter().map(|r| r.get(field)).collect()
    }

    /// The first `n` rows
    pub fn head(&self, n: usize) -> &[ConvertedRow] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// A resolved mapping together with the table it produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversion {
    pub mapping: ResolvedMapping,
    pub output: ConvertedTable,
}

/// Copy mapped columns into canonical order
///
/// Mapped values are trimmed with null spellings blanked. Unmapped fields are
/// the empty string on every row.
pub fn transcribe(table: &Table, mapping: &ResolvedMapping) -> ConvertedTable {
    let sources: [Option<usize>; CanonicalField::COUNT] =
        CanonicalField::ALL.map(|field| mapping.get(field).map(|b| b.source_index));

    let rows = table
        .rows
        .iter()
        .map(|row| ConvertedRow {
            values: sources.map(|source| {
                source
                    .and_then(|i| row.get(i))
                    .map(|cell| cell.normalized())
                    .unwrap_or_default()
            }),
        })
        .collect();

    ConvertedTable { rows }
}

/// Resolve a table's headers and transcribe its rows
pub fn convert_table(table: &Table) -> Conversion {
    let mapping = resolve_columns(&table.headers());
    let output = transcribe(table, &mapping);
    Conversion { mapping, output }
}
