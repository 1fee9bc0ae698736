//! Header-driven mapping from raw table rows to task records

use plancal_core::TaskRecord;
use tracing::debug;

use crate::dates::parse_lenient_date;
use crate::ParseError;

pub const TASK_NAME: &str = "Task Name";
pub const START_DATE: &str = "Start date";
pub const DUE_DATE: &str = "Due date";
pub const COMPLETED_DATE: &str = "Completed Date";
pub const LABELS: &str = "Labels";
pub const BUCKET_NAME: &str = "Bucket Name";

/// Column positions resolved from a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub start: usize,
    pub due: usize,
    pub completed: Option<usize>,
    pub labels: Option<usize>,
    pub bucket: Option<usize>,
}

impl ColumnMap {
    /// Resolve columns by trimmed, case-insensitive header text.
    ///
    /// The first matching header wins when a title is repeated.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self, ParseError> {
        let find = |title: &str| {
            headers
                .iter()
                .position(|h| h.as_ref().trim().eq_ignore_ascii_case(title))
        };

        let name = find(TASK_NAME);
        let start = find(START_DATE);
        let due = find(DUE_DATE);

        match (name, start, due) {
            (Some(name), Some(start), Some(due)) => Ok(Self {
                name,
                start,
                due,
                completed: find(COMPLETED_DATE),
                labels: find(LABELS),
                bucket: find(BUCKET_NAME),
            }),
            _ => {
                let missing = [(TASK_NAME, name), (START_DATE, start), (DUE_DATE, due)]
                    .into_iter()
                    .filter(|(_, pos)| pos.is_none())
                    .map(|(title, _)| title.to_string())
                    .collect();
                Err(ParseError::MissingColumns(missing))
            }
        }
    }

    /// Build a record from one row, or `None` when the task name is blank
    pub fn record<S: AsRef<str>>(&self, row: &[Option<S>]) -> Option<TaskRecord> {
        let cell = |idx: usize| row.get(idx).and_then(|c| c.as_ref()).map(|c| c.as_ref());
        let date = |idx: usize| cell(idx).and_then(parse_lenient_date);
        let text = |idx: Option<usize>| {
            idx.and_then(cell)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        let name = cell(self.name).map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return None;
        }

        Some(TaskRecord {
            name: name.to_string(),
            start: date(self.start),
            due: date(self.due),
            completed: self.completed.and_then(date),
            label: text(self.labels),
            bucket: text(self.bucket),
        })
    }
}

/// Map a header row plus data rows to task records, dropping unnamed rows
pub fn records_from_rows<S: AsRef<str>>(
    headers: &[S],
    rows: &[Vec<Option<S>>],
) -> Result<Vec<TaskRecord>, ParseError> {
    let columns = ColumnMap::from_headers(headers)?;
    let records: Vec<TaskRecord> = rows.iter().filter_map(|row| columns.record(row)).collect();

    let dropped = rows.len() - records.len();
    if dropped > 0 {
        debug!(dropped, "dropped rows without a task name");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|c| (!c.is_empty()).then(|| c.to_string()))
            .collect()
    }

    fn headers(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn headers_match_case_insensitively() {
        let map = ColumnMap::from_headers(&[" task name ", "DUE DATE", "start date"]).unwrap();
        assert_eq!(map.name, 0);
        assert_eq!(map.due, 1);
        assert_eq!(map.start, 2);
        assert_eq!(map.labels, None);
    }

    #[test]
    fn missing_required_columns_are_listed() {
        let err = ColumnMap::from_headers(&["Task Name", "Labels"]).unwrap_err();
        match err {
            ParseError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["Start date".to_string(), "Due date".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn row_maps_to_record() {
        let hs = headers(&[
            "Task Name",
            "Bucket Name",
            "Start date",
            "Due date",
            "Completed Date",
            "Labels",
        ]);
        let rows = vec![row(&[
            "  Design ",
            "Q1",
            "01/01/2024",
            "2024-01-05",
            "2024-01-03",
            "Eng: ",
        ])];

        let records = records_from_rows(&hs, &rows).unwrap();
        assert_eq!(
            records,
            vec![TaskRecord {
                name: "Design".into(),
                start: NaiveDate::from_ymd_opt(2024, 1, 1),
                due: NaiveDate::from_ymd_opt(2024, 1, 5),
                completed: NaiveDate::from_ymd_opt(2024, 1, 3),
                label: Some("Eng: ".into()),
                bucket: Some("Q1".into()),
            }]
        );
    }

    #[test]
    fn blank_names_and_short_rows() {
        let hs = headers(&["Task Name", "Start date", "Due date", "Labels"]);
        let rows = vec![
            row(&["   ", "2024-01-01", "2024-01-02", "x"]),
            row(&["Short"]),
            row(&["Bad dates", "soon", "later", "  "]),
        ];

        let records = records_from_rows(&hs, &rows).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], TaskRecord::new("Short"));
        assert_eq!(records[1], TaskRecord::new("Bad dates"));
    }
}
