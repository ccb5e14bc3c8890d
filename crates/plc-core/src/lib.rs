//! plc-core: Core library for normalizing property-list CSV columns
//!
//! This library provides functionality to:
//! - Parse arbitrary property-list CSV files into tables
//! - Resolve input headers onto the seven canonical fields via a fixed alias table
//! - Transcribe rows into the canonical column layout
//! - Write converted files and report how each field was matched
//! - Scan directories, run batches and keep a manifest of conversions

pub mod batch;
pub mod convert;
pub mod error;
pub mod export;
pub mod manifest;
pub mod parser;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod schema;
pub mod table;
pub mod transcriber;

pub use batch::{convert_all, run_batch, BatchFile, BatchResult};
pub use convert::{convert_file, convert_path, ConversionOutcome, ConvertOptions};
pub use error::{Error, Result};
pub use export::{converted_file_name, converted_path, save_csv, to_csv_string, to_json, write_csv};
pub use manifest::{append_records, ConversionRecord, Manifest};
pub use parser::{parse_csv, parse_csv_str, parse_delimiter, ParseOptions};
pub use report::{FieldStatus, MappingReport, ReportEntry};
pub use resolver::{normalize_header, resolve_columns, Binding, ResolvedMapping};
pub use scanner::{scan_directory, ScanResult};
pub use schema::{canonical_header, CanonicalField};
pub use table::{CellValue, Column, Row, Table};
pub use transcriber::{convert_table, transcribe, Conversion, ConvertedRow, ConvertedTable};
