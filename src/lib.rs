//! xlsxdocx - Survey spreadsheet to Word document converter
//!
//! This crate reads survey-style Excel workbooks (one question per column,
//! one respondent per row) and writes one document per workbook, where each
//! question becomes a heading followed by a numbered list of
//! entries pairing each respondent with their answer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxdocx::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings (active sheet, DOCX output)
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     let input = File::open("survey.xlsx")?;
//!     let output = File::create("survey.docx")?;
//!     converter.convert(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Batch Conversion
//!
//! Every `*.xlsx` file in the input directory is converted into
//! `<name>.docx` in the output directory:
//!
//! ```rust,no_run
//! use xlsxdocx::{BatchOptions, ConverterBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let report = converter.convert_dir(&BatchOptions::new("input", "output"))?;
//!
//!     for path in &report.converted {
//!         println!("wrote {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxdocx::{ConverterBuilder, DateFormat, ListKind, OutputFormat, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::Name("Responses".to_string()))
//!         .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
//!         .with_list_kind(ListKind::Bulleted)
//!         .with_output_format(OutputFormat::Markdown)
//!         .build()?;
//!
//!     let input = File::open("survey.xlsx")?;
//!     let markdown = converter.convert_to_bytes(input)?;
//!     println!("{}", String::from_utf8_lossy(&markdown));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Working with the transposed structure
//!
//! ```rust
//! use xlsxdocx::{transpose, Sheet};
//!
//! let sheet = Sheet::from_columns(vec![
//!     vec!["", "1", "2"],
//!     vec!["", "Alice", "Bob"],
//!     vec!["Q1", "yes", "no"],
//! ]);
//! let survey = transpose(&sheet).unwrap();
//! assert_eq!(survey.questions[0].answer_for("Alice"), Some("yes"));
//! ```

mod api;
mod batch;
mod builder;
mod docx;
mod error;
mod formatter;
mod output;
mod parser;
mod security;
mod survey;
mod types;
mod xml;

// 公開API
pub use api::{DateFormat, ListKind, OutputFormat, SheetSelector};
pub use batch::{discover_inputs, BatchOptions, BatchReport};
pub use builder::{Converter, ConverterBuilder};
pub use error::XlsxToDocxError;
pub use survey::{transpose, Answer, Cell, QuestionRecord, Sheet, Survey};
