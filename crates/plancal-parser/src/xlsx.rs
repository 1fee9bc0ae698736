//! Excel workbook task table reader
//!
//! Planner exports saved as `.xlsx` keep the task table on a worksheet named
//! `Tasks`. Date cells are read as calendar dates; every other cell is turned
//! into text and goes through the same column mapping as CSV and JSON.

use std::path::Path;

use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use plancal_core::TaskRecord;
use tracing::debug;

use crate::table::records_from_rows;
use crate::ParseError;

/// Worksheet holding the task table
pub const TASKS_SHEET: &str = "Tasks";

/// Read the `Tasks` worksheet of a workbook into task records
pub fn parse(path: &Path) -> Result<Vec<TaskRecord>, ParseError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheets = workbook.sheet_names();
    if !sheets.iter().any(|name| name == TASKS_SHEET) {
        debug!(?sheets, "workbook has no task sheet");
        return Err(ParseError::MissingWorksheet(TASKS_SHEET.to_string()));
    }

    let range = workbook.worksheet_range(TASKS_SHEET)?;
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| cell_text(cell).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();
    let data: Vec<Vec<Option<String>>> = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    records_from_rows(&headers, &data)
}

/// Cell contents as text; empty and error cells are `None`
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::DateTime(_) => cell.as_date()?.format("%Y-%m-%d").to_string(),
        other => other.to_string(),
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
