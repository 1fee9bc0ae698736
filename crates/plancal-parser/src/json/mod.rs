//! JSON task table parser
//!
//! The table is an array of objects keyed by column header. Cell values may
//! be strings, numbers, booleans or null.

use plancal_core::TaskRecord;
use serde_json::Value;

use crate::table::records_from_rows;
use crate::ParseError;

/// Parse a JSON array of row objects into task records.
///
/// An empty array yields no records.
pub fn parse(input: &str) -> Result<Vec<TaskRecord>, ParseError> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let value: Value = serde_json::from_str(input).map_err(|e| ParseError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;

    let Value::Array(items) = value else {
        return Err(ParseError::InvalidValue(
            "expected an array of task rows".into(),
        ));
    };
    if items.is_empty() {
        return Ok(Vec::new());
    }

    // Header order is the order keys are first seen across all rows
    let mut headers: Vec<String> = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let Value::Object(map) = item else {
            return Err(ParseError::InvalidValue(format!(
                "row {} is not an object",
                idx + 1
            )));
        };
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let row = headers
            .iter()
            .map(|h| cell_text(item.get(h), idx, h))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    records_from_rows(&headers, &rows)
}

fn cell_text(value: Option<&Value>, row: usize, column: &str) -> Result<Option<String>, ParseError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Array(_) | Value::Object(_)) => Err(ParseError::InvalidValue(format!(
            "row {}, column '{}': nested values are not supported",
            row + 1,
            column
        ))),
    }
}
