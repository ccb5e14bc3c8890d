//! Error types for plc-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plc-core
///
/// An unmatched canonical field is not an error; it shows up as an absent
/// binding in the resolved mapping.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input is not usable as a table
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Refused to replace an existing converted file
    #[error("output file '{0}' already exists (use --overwrite to replace it)")]
    OutputExists(PathBuf),

    /// Two inputs of one run would write the same output file
    #[error("output '{output}' collides with earlier input '{earlier}'")]
    OutputCollision { output: PathBuf, earlier: PathBuf },

    /// Delimiter that cannot be used as a CSV separator
    #[error("invalid delimiter '{0}': expected a single ASCII character")]
    InvalidDelimiter(String),

    /// Unknown canonical field name
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
