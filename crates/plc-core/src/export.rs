//! Writing converted tables to disk

use crate::error::{Error, Result};
use crate::transcriber::{Conversion, ConvertedTable};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const CONVERTED_SUFFIX: &str = "_converted";

/// Write a converted table as CSV, header first
pub fn write_csv<W: Write>(table: &ConvertedTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| Error::Csv {
        path: PathBuf::from("<output>"),
        source: e,
    };

    csv_writer.write_record(table.header()).map_err(csv_err)?;
    for row in &table.rows {
        csv_writer.write_record(&row.values).map_err(csv_err)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render a converted table as a CSV string
pub fn to_csv_string(table: &ConvertedTable) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render mapping and rows as pretty JSON
pub fn to_json(conversion: &Conversion) -> Result<String> {
    Ok(serde_json::to_string_pretty(conversion)?)
}

/// Output file name for an input file: `<stem>_converted.csv`
pub fn converted_file_name(input: &Path) -> OsString {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(CONVERTED_SUFFIX);
    name.push(".csv");
    name
}

/// Where the converted copy of `input` goes
///
/// Without an output directory the file lands next to its input.
pub fn converted_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(converted_file_name(input))
}

/// Whether a file name looks like an earlier conversion result
pub fn is_converted_name(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with(CONVERTED_SUFFIX))
}

/// Save a converted table as CSV
///
/// The table is written to a temporary sibling first and renamed into place,
/// so `path` is either the complete new file or untouched.
pub fn save_csv(table: &ConvertedTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".partial");
    let tmp_path = PathBuf::from(tmp_name);

    let written = File::create(&tmp_path)
        .map_err(Error::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write_csv(table, &mut writer)?;
            writer.flush()?;
            Ok(())
        })
        .and_then(|()| fs::rename(&tmp_path, path).map_err(Error::from));

    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_csv_str, ParseOptions};
    use crate::transcriber::convert_table;

    fn convert(content: &str) -> Conversion {
        let table = parse_csv_str(content, "input.csv", &ParseOptions::default()).unwrap();
        convert_table(&table)
    }

    #[test]
    fn test_csv_output_matches_expected_layout() {
        let conversion = convert(
            "Property Name,Address,City,ST,Zip,Total Units,Owner\n\
             Maple Court,123 Oak St,Springfield,IL,62704,120,Acme Holdings\n",
        );

        let csv = to_csv_string(&conversion.output).unwrap();
        assert_eq!(
            csv,
            "community_name,street,city,state,zip_code,units,ownership_group_name\n\
             Maple Court,123 Oak St,Springfield,IL,62704,120,Acme Holdings\n"
        );
    }

    #[test]
    fn test_csv_output_quotes_when_needed() {
        let conversion = convert("Name,Address\n\"Maple, Court\",\"1 \"\"Main\"\" St\"\n");

        let csv = to_csv_string(&conversion.output).unwrap();
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(line, "\"Maple, Court\",\"1 \"\"Main\"\" St\",,,,,");
    }

    #[test]
    fn test_header_only_output() {
        let conversion = convert("Notes\n");
        let csv = to_csv_string(&conversion.output).unwrap();
        assert_eq!(csv, "community_name,street,city,state,zip_code,units,ownership_group_name\n");
    }

    #[test]
    fn test_converted_file_name() {
        assert_eq!(converted_file_name(Path::new("listings.csv")), "listings_converted.csv");
        assert_eq!(converted_file_name(Path::new("dir/Q3 Report.CSV")), "Q3 Report_converted.csv");
        assert_eq!(converted_file_name(Path::new("export")), "export_converted.csv");
        assert_eq!(converted_file_name(Path::new("a.b.csv")), "a.b_converted.csv");
    }

    #[test]
    fn test_converted_path() {
        assert_eq!(
            converted_path(Path::new("in/listings.csv"), None),
            PathBuf::from("in/listings_converted.csv")
        );
        assert_eq!(
            converted_path(Path::new("in/listings.csv"), Some(Path::new("out"))),
            PathBuf::from("out/listings_converted.csv")
        );
        assert_eq!(
            converted_path(Path::new("listings.csv"), None),
            PathBuf::from("listings_converted.csv")
        );
    }

    #[test]
    fn test_is_converted_name() {
        assert!(is_converted_name(Path::new("a/listings_converted.csv")));
        assert!(!is_converted_name(Path::new("a/listings.csv")));
    }

    #[test]
    fn test_save_csv_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out_converted.csv");
        let conversion = convert("Owner\nAcme\n");

        save_csv(&conversion.output, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with(",,,,,,Acme\n"));
        assert!(!dir.path().join("nested").join("out_converted.csv.partial").exists());
    }

    #[test]
    fn test_json_includes_mapping_and_rows() {
        let conversion = convert("Owner\nAcme\n");
        let json: serde_json::Value = serde_json::from_str(&to_json(&conversion).unwrap()).unwrap();

        assert_eq!(json["mapping"]["bindings"][0]["field"], "ownership_group_name");
        assert_eq!(json["mapping"]["bindings"][0]["source_header"], "Owner");
        assert_eq!(json["output"]["rows"][0]["values"][6], "Acme");
    }
}
