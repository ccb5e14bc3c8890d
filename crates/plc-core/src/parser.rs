//! CSV parser for uploaded property lists

use crate::error::{Error, Result};
use crate::table::{CellValue, Column, Row, Table};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options controlling how input files are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Field delimiter byte
    pub delimiter: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl ParseOptions {
    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Convert a user-supplied delimiter to the byte the CSV reader expects
///
/// Accepts a single ASCII character, or the escape `\t` for tab.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        _ if s == "\\t" => Ok(b'\t'),
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(Error::InvalidDelimiter(s.to_string())),
    }
}

/// Parse a CSV file into a Table
pub fn parse_csv<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_table(BufReader::new(file), path.to_path_buf(), options)
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str, options: &ParseOptions) -> Result<Table> {
    read_table(content.as_bytes(), PathBuf::from(source_name), options)
}

fn read_table<R: Read>(reader: R, path: PathBuf, options: &ParseOptions) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(true) // Allow varying number of fields
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = if i == 0 { name.trim_start_matches('\u{feff}') } else { name };
            Column::new(name.to_string(), i)
        })
        .collect();

    if columns.is_empty() {
        return Err(Error::CsvParse {
            path,
            message: "no columns found in CSV".to_string(),
        });
    }

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        let mut cells: Vec<CellValue> = record
            .iter()
            .map(|field| CellValue::Text(field.to_string()))
            .collect();

        if cells.len() > columns.len() {
            return Err(Error::CsvParse {
                path,
                message: format!(
                    "row {} has {} cells, expected {}",
                    row_idx + 1,
                    cells.len(),
                    columns.len()
                ),
            });
        }
        cells.resize(columns.len(), CellValue::Missing);

        rows.push(Row::new(cells));
    }

    debug!(
        path = %path.display(),
        columns = columns.len(),
        rows = rows.len(),
        "parsed input table"
    );

    Ok(Table {
        columns,
        rows,
        source_path: path,
    })
}
