//! xlsxdocx command line tool
//!
//! Converts every survey workbook in the input directory into a document in
//! the output directory.

use std::process;

use clap::{Parser, ValueEnum};
use xlsxdocx::{
    BatchOptions, ConverterBuilder, ListKind, OutputFormat, SheetSelector, XlsxToDocxError,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Docx,
    Markdown,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Docx => OutputFormat::Docx,
            Format::Markdown => OutputFormat::Markdown,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "xlsxdocx")]
#[command(version)]
#[command(about = "Convert survey spreadsheets into Word documents")]
#[command(long_about = r#"
Convert survey spreadsheets into Word documents.

Each workbook in the input directory is read column by column: column B holds
the respondent names, and every column after it is one question. The output
document has one heading per question followed by a numbered list of
entries pairing each respondent with their answer.

Example usage:
  xlsxdocx                                  # input/*.xlsx -> output/*.docx
  xlsxdocx -i surveys -o docs --keep-going
  xlsxdocx --format markdown --sheet-name Responses

Set RUST_LOG=xlsxdocx=debug for per-question logging.
"#)]
struct Args {
    /// Directory containing the .xlsx files to convert
    #[arg(short, long, default_value = "input")]
    input: String,

    /// Directory the documents are written to (created if missing)
    #[arg(short, long, default_value = "output")]
    output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Docx)]
    format: Format,

    /// Use bulleted lists instead of numbered lists
    #[arg(long)]
    bulleted: bool,

    /// Convert the sheet at this index (0-based) instead of the active sheet
    #[arg(long, conflicts_with = "sheet_name")]
    sheet_index: Option<usize>,

    /// Convert the sheet with this name instead of the active sheet
    #[arg(long)]
    sheet_name: Option<String>,

    /// Record failing files and continue with the rest
    #[arg(long)]
    keep_going: bool,

    /// Convert files in parallel
    #[arg(long)]
    parallel: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xlsxdocx=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            handle_error(&e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when some files failed in keep-going mode.
fn run(args: Args) -> Result<bool, XlsxToDocxError> {
    let sheet_selector = match (args.sheet_index, args.sheet_name) {
        (Some(index), _) => SheetSelector::Index(index),
        (None, Some(name)) => SheetSelector::Name(name),
        (None, None) => SheetSelector::Active,
    };
    let list_kind = if args.bulleted {
        ListKind::Bulleted
    } else {
        ListKind::Numbered
    };

    let converter = ConverterBuilder::new()
        .with_sheet_selector(sheet_selector)
        .with_list_kind(list_kind)
        .with_output_format(args.format.into())
        .build()?;

    let options = BatchOptions::new(args.input, args.output)
        .with_keep_going(args.keep_going)
        .with_parallel(args.parallel);
    let report = converter.convert_dir(&options)?;

    for error in &report.failed {
        handle_error(error);
    }
    Ok(report.is_success())
}

fn handle_error(error: &XlsxToDocxError) {
    match error {
        XlsxToDocxError::Batch { path, source } => {
            eprintln!("Failed to convert {}:", path.display());
            handle_error(source);
        }
        XlsxToDocxError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the directories exist and you have permission to access them.");
        }
        XlsxToDocxError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid Excel file or may be corrupted.");
        }
        XlsxToDocxError::Shape {
            column,
            expected,
            actual,
        } => {
            eprintln!("Malformed Sheet:");
            eprintln!("  Column: {}", column);
            eprintln!("  Expected cells: {}", expected);
            eprintln!("  Found cells: {}", actual);
        }
        XlsxToDocxError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Please check your sheet selection.");
        }
        XlsxToDocxError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file exceeds a resource limit or contains unsafe paths.");
        }
        XlsxToDocxError::Zip(msg) => {
            eprintln!("ZIP Archive Error: {}", msg);
            eprintln!("The file may be corrupted or not a valid ZIP archive.");
        }
        other => {
            eprintln!("Error: {}", other);
        }
    }
}
