//! # plancal-parser
//!
//! Reader for planner task tables.
//!
//! This crate provides:
//! - CSV parser using a pest grammar (quoted fields, CRLF, BOM)
//! - JSON parser for arrays of row objects
//! - Excel workbook reader for the `Tasks` worksheet
//! - Header-driven mapping of rows to [`TaskRecord`]s with lenient dates
//!
//! ## Example
//!
//! ```rust
//! use plancal_parser::parse_csv;
//!
//! let input = "Task Name,Start date,Due date\nDesign,2024-01-01,2024-01-03\n";
//! let tasks = parse_csv(input).unwrap();
//! assert_eq!(tasks[0].name, "Design");
//! ```

pub mod csv;
pub mod dates;
pub mod json;
pub mod table;
pub mod xlsx;

use std::path::Path;

use plancal_core::TaskRecord;
use thiserror::Error;
use tracing::info;

pub use dates::parse_lenient_date;

/// Parsing error
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Worksheet named '{0}' not found in workbook")]
    MissingWorksheet(String),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values (default)
    Csv,
    /// JSON array of row objects (.json)
    Json,
    /// Excel workbook with a `Tasks` worksheet (.xlsx, .xlsm)
    Xlsx,
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm") => {
            FileFormat::Xlsx
        }
        _ => FileFormat::Csv,
    }
}

/// Parse a task table from CSV text
pub fn parse_csv(input: &str) -> Result<Vec<TaskRecord>, ParseError> {
    csv::parse(input)
}

/// Parse a task table from JSON text
pub fn parse_json(input: &str) -> Result<Vec<TaskRecord>, ParseError> {
    json::parse(input)
}

/// Parse the `Tasks` worksheet of an Excel workbook
pub fn parse_xlsx(path: &Path) -> Result<Vec<TaskRecord>, ParseError> {
    xlsx::parse(path)
}

/// Parse a task table file from a path (auto-detects format)
pub fn parse_file(path: &Path) -> Result<Vec<TaskRecord>, ParseError> {
    let format = detect_format(path);
    let records = match format {
        FileFormat::Xlsx => parse_xlsx(path)?,
        FileFormat::Json => parse_json(&std::fs::read_to_string(path)?)?,
        FileFormat::Csv => parse_csv(&std::fs::read_to_string(path)?)?,
    };

    info!(path = %path.display(), ?format, tasks = records.len(), "read task table");
    Ok(records)
}
