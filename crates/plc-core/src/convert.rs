//! End-to-end conversion of one input file

use crate::error::{Error, Result};
use crate::export::{converted_path, save_csv};
use crate::parser::{parse_csv, ParseOptions};
use crate::report::MappingReport;
use crate::table::Table;
use crate::transcriber::{convert_table, Conversion};
use std::path::{Path, PathBuf};
use tracing::info;

/// Options for a single conversion
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// How to read the input
    pub parse: ParseOptions,
    /// Explicit output file; wins over `output_dir`
    pub output: Option<PathBuf>,
    /// Directory for `<stem>_converted.csv`; defaults to the input's directory
    pub output_dir: Option<PathBuf>,
    /// Replace an existing output file
    pub overwrite: bool,
}

impl ConvertOptions {
    /// Final output path for an input file
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => converted_path(input, self.output_dir.as_deref()),
        }
    }
}

/// Everything a caller needs after converting a file
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    /// The parsed input, for previews
    pub source: Table,
    pub conversion: Conversion,
}

impl ConversionOutcome {
    pub fn row_count(&self) -> usize {
        self.conversion.output.row_count()
    }

    /// Mapping report over the input headers
    pub fn report(&self) -> MappingReport {
        MappingReport::new(&self.conversion.mapping, &self.source.headers())
    }
}

/// Parse and convert a file without writing anything
pub fn convert_path<P: AsRef<Path>>(input: P, options: &ParseOptions) -> Result<(Table, Conversion)> {
    let table = parse_csv(input, options)?;
    let conversion = convert_table(&table);
    Ok((table, conversion))
}

/// Parse, convert and save one file
///
/// Nothing is written unless the whole input parses.
pub fn convert_file<P: AsRef<Path>>(input: P, options: &ConvertOptions) -> Result<ConversionOutcome> {
    let input = input.as_ref();
    let output = options.output_path_for(input);

    if output.exists() && !options.overwrite {
        return Err(Error::OutputExists(output));
    }

    let (source, conversion) = convert_path(input, &options.parse)?;
    save_csv(&conversion.output, &output)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = conversion.output.row_count(),
        matched = conversion.mapping.matched_count(),
        "converted file"
    );

    Ok(ConversionOutcome {
        input: input.to_path_buf(),
        output,
        source,
        conversion,
    })
}
