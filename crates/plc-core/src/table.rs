//! Table types for representing an uploaded property list

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Spellings that tabular tools write for a null value
const NULL_MARKERS: &[&str] = &[
    "nan", "NaN", "-nan", "-NaN", "NA", "N/A", "n/a", "<NA>", "#N/A", "#N/A N/A", "#NA", "NULL",
    "null", "None", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN",
];

/// A parsed table from a single CSV file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions, in file order
    pub columns: Vec<Column>,
    /// Row data
    pub rows: Vec<Row>,
    /// Source file path
    pub source_path: PathBuf,
}

impl Table {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header names in file order
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Header text exactly as it appeared in the file
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    /// Cell values for each column
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A raw cell from the input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Cell text, untrimmed
    Text(String),
    /// No cell at this position (short row)
    Missing,
}

impl CellValue {
    /// The value written to the converted file: trimmed, with nulls as ""
    ///
    /// A null marker only counts when it is the whole raw cell, so `" NA "`
    /// is kept as `"NA"`.
    pub fn normalized(&self) -> String {
        match self {
            CellValue::Text(s) if NULL_MARKERS.contains(&s.as_str()) => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Missing => String::new(),
        }
    }

    /// Raw text for previews
    pub fn as_str(&self) -> &str {
        match self {
            CellValue::Text(s) => s,
            CellValue::Missing => "",
        }
    }
}
