//! Property List Converter CLI
//!
//! Command-line tool for converting property-list spreadsheets to the
//! standard column layout.

use clap::{Parser, Subcommand};
use plc_core::{
    append_records, convert_all, convert_file, convert_path, parse_csv, parse_delimiter, run_batch,
    scan_directory, to_json, BatchFile, CanonicalField, ConversionRecord, ConvertOptions,
    ConvertedTable, Manifest, MappingReport, ParseOptions, Table,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plc")]
#[command(about = "Property List Converter", long_about = None)]
#[command(version)]
struct Cli {
    /// Log resolution details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV file to the standard column layout
    Convert {
        /// Path to the input CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Output file path (defaults to <name>_converted.csv next to the input)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Directory for the converted file
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Input field delimiter (a single character, or \t)
        #[arg(short, long, default_value = ",")]
        delimiter: String,

        /// Number of converted rows to preview
        #[arg(short, long, default_value_t = 10)]
        preview: usize,

        /// Replace an existing output file
        #[arg(long)]
        overwrite: bool,

        /// Append a record of the conversion to this manifest
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Show how the columns of a CSV file would be mapped
    Mapping {
        /// Path to the input CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Input field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: String,

        /// Print the mapping and converted rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse and display a single CSV file
    Parse {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Input field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: String,

        /// Maximum number of rows to display
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Scan directories for convertible CSV files
    Scan {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,
    },

    /// Convert every CSV file found under the given directories
    ConvertDir {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// Directory for converted files (defaults to each input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Input field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: String,

        /// Replace existing output files
        #[arg(long)]
        overwrite: bool,

        /// Append conversion records to this manifest
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Run a batch of conversions
    Batch {
        /// Path to batch file (JSON)
        #[arg(short, long)]
        batch: PathBuf,
    },

    /// Create a batch file template
    CreateBatch {
        /// Output path for the batch file
        #[arg(short, long)]
        output: PathBuf,

        /// Input files to include
        #[arg(short, long)]
        input: Vec<PathBuf>,

        /// Output directory for converted files
        #[arg(long)]
        output_dir: PathBuf,

        /// Manifest to record conversions in
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// List the recognized column aliases
    Aliases {
        /// Only show aliases for this field (e.g. zip_code)
        #[arg(short, long)]
        field: Option<String>,
    },

    /// Show recorded conversions from a manifest
    History {
        /// Path to the manifest file
        #[arg(short, long)]
        manifest: PathBuf,

        /// Only show the latest conversion of this input
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> plc_core::Result<()> {
    match command {
        Commands::Convert {
            file,
            output,
            output_dir,
            delimiter,
            preview,
            overwrite,
            manifest,
        } => {
            let options = ConvertOptions {
                parse: parse_options(&delimiter)?,
                output,
                output_dir,
                overwrite,
            };
            cmd_convert(&file, &options, preview, manifest.as_deref())
        }
        Commands::Mapping {
            file,
            delimiter,
            json,
        } => cmd_mapping(&file, &parse_options(&delimiter)?, json),
        Commands::Parse {
            file,
            delimiter,
            limit,
        } => cmd_parse(&file, &parse_options(&delimiter)?, limit),
        Commands::Scan { root } => cmd_scan(&root),
        Commands::ConvertDir {
            root,
            output_dir,
            delimiter,
            overwrite,
            manifest,
        } => {
            let options = ConvertOptions {
                parse: parse_options(&delimiter)?,
                output: None,
                output_dir,
                overwrite,
            };
            cmd_convert_dir(&root, &options, manifest.as_deref())
        }
        Commands::Batch { batch } => cmd_batch(&batch),
        Commands::CreateBatch {
            output,
            input,
            output_dir,
            manifest,
        } => cmd_create_batch(&output, input, output_dir, manifest),
        Commands::Aliases { field } => cmd_aliases(field.as_deref()),
        Commands::History { manifest, input } => cmd_history(&manifest, input.as_deref()),
    }
}

fn parse_options(delimiter: &str) -> plc_core::Result<ParseOptions> {
    Ok(ParseOptions::default().with_delimiter(parse_delimiter(delimiter)?))
}

fn cmd_convert(
    file: &Path,
    options: &ConvertOptions,
    preview: usize,
    manifest: Option<&Path>,
) -> plc_core::Result<()> {
    let outcome = convert_file(file, options)?;

    println!("File: {}", file.display());
    println!();
    println!("Column mapping:");
    print!("{}", outcome.report());
    println!();

    println!("Converted preview:");
    print_converted(&outcome.conversion.output, preview);
    println!();
    println!("Total rows: {}", outcome.row_count());
    println!("Wrote {}", outcome.output.display());

    if let Some(manifest) = manifest {
        append_records(manifest, vec![ConversionRecord::from_outcome(&outcome)])?;
        println!("Recorded in {}", manifest.display());
    }

    Ok(())
}

fn cmd_mapping(file: &Path, options: &ParseOptions, json: bool) -> plc_core::Result<()> {
    let (table, conversion) = convert_path(file, options)?;

    if json {
        println!("{}", to_json(&conversion)?);
        return Ok(());
    }

    let report = MappingReport::new(&conversion.mapping, &table.headers());
    println!("File: {}", file.display());
    println!(
        "Matched {} of {} fields",
        report.matched_count(),
        CanonicalField::COUNT
    );
    println!();
    print!("{}", report);

    Ok(())
}

fn cmd_parse(file: &Path, options: &ParseOptions, limit: usize) -> plc_core::Result<()> {
    let table = parse_csv(file, options)?;

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();
    print_source(&table, limit);

    Ok(())
}

fn cmd_scan(roots: &[PathBuf]) -> plc_core::Result<()> {
    let result = scan_directory(roots)?;

    println!("Scanned {} root(s):", result.roots.len());
    for root in &result.roots {
        println!("  {}", root.display());
    }
    println!();
    println!(
        "Found {} CSV files ({} convertible, {} already converted)",
        result.total_files(),
        result.inputs.len(),
        result.skipped.len()
    );
    for input in &result.inputs {
        println!("  {}", input.display());
    }

    Ok(())
}

fn cmd_convert_dir(
    roots: &[PathBuf],
    options: &ConvertOptions,
    manifest: Option<&Path>,
) -> plc_core::Result<()> {
    let scan_result = scan_directory(roots)?;
    println!("Converting {} file(s)", scan_result.inputs.len());

    let result = convert_all(&scan_result.inputs, options, manifest)?;

    for outcome in &result.converted {
        let report = outcome.report();
        println!(
            "  {} -> {} ({} rows, {}/{} fields)",
            outcome.input.display(),
            outcome.output.display(),
            outcome.row_count(),
            report.matched_count(),
            CanonicalField::COUNT
        );
    }

    print_errors(&result.errors);
    Ok(())
}

fn cmd_batch(batch_path: &Path) -> plc_core::Result<()> {
    let batch = BatchFile::load(batch_path)?;

    println!("Running batch with {} input files", batch.inputs.len());
    println!("Output: {}", batch.output_dir.display());
    println!();

    let result = run_batch(&batch)?;

    for outcome in &result.converted {
        println!(
            "  {} -> {} ({} rows)",
            outcome.input.display(),
            outcome.output.display(),
            outcome.row_count()
        );
    }

    println!();
    println!("Batch complete:");
    println!("  {} files converted", result.converted.len());
    println!("  {} total rows written", result.total_rows());
    if let Some(manifest) = &batch.manifest {
        println!("  recorded in {}", manifest.display());
    }

    print_errors(&result.errors);
    Ok(())
}

fn cmd_create_batch(
    output: &Path,
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    manifest: Option<PathBuf>,
) -> plc_core::Result<()> {
    let inputs = if inputs.is_empty() {
        vec![PathBuf::from("list1.csv"), PathBuf::from("list2.csv")]
    } else {
        inputs
    };

    let batch = BatchFile {
        inputs,
        output_dir,
        delimiter: ',',
        overwrite: false,
        manifest,
    };

    batch.save(output)?;
    println!("Created batch file: {}", output.display());
    println!();
    println!("Edit the file to configure your batch, then run:");
    println!("  plc batch --batch {}", output.display());

    Ok(())
}

fn cmd_aliases(field: Option<&str>) -> plc_core::Result<()> {
    let fields: Vec<CanonicalField> = match field {
        Some(name) => vec![name.parse()?],
        None => CanonicalField::ALL.to_vec(),
    };

    for field in fields {
        println!("{} ({} aliases):", field, field.aliases().len());
        for alias in field.aliases() {
            println!("  {}", alias);
        }
        println!();
    }

    Ok(())
}

fn cmd_history(manifest_path: &Path, input: Option<&Path>) -> plc_core::Result<()> {
    let manifest = Manifest::load(manifest_path)?;

    let records: Vec<&ConversionRecord> = match input {
        Some(input) => manifest.latest_for(input).into_iter().collect(),
        None => manifest.entries.iter().collect(),
    };

    if records.is_empty() {
        println!("No conversions recorded.");
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {} -> {} ({} rows)",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.input.display(),
            record.output.display(),
            record.rows
        );
        for field in CanonicalField::ALL {
            match record.mapping.source_header(field) {
                Some(source) => println!("    {} <- {}", field, source),
                None => println!("    {} <- (empty)", field),
            }
        }
    }

    Ok(())
}

fn print_source(table: &Table, limit: usize) {
    let header = table.headers();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    for row in table.rows.iter().take(limit) {
        let values: Vec<&str> = row.cells.iter().map(|c| c.as_str()).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }
}

fn print_converted(table: &ConvertedTable, limit: usize) {
    let header = table.header();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    for row in table.head(limit) {
        println!("{}", row.values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }
}

fn print_errors(errors: &[(PathBuf, String)]) {
    if errors.is_empty() {
        return;
    }
    println!("\nErrors ({}):", errors.len());
    for (path, err) in errors {
        println!("  {}: {}", path.display(), err);
    }
}
