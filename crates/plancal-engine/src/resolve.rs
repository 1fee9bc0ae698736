//! Effective date resolution for task rows.
//!
//! Rules, applied in order:
//! 1. A completion date replaces the due date.
//! 2. A missing start date takes the (possibly replaced) due date.
//! 3. A row still missing either date is skipped.
//!
//! Rows are never modified; resolution produces new `ResolvedRange` values.

use plancal_core::{ResolvedRange, TaskRecord};

/// Resolve one row, or `None` if it has no usable dates or no name
pub fn resolve_range(record: &TaskRecord) -> Option<ResolvedRange> {
    if record.has_blank_name() {
        return None;
    }

    let due = record.completed.or(record.due)?;
    let start = record.start.unwrap_or(due);

    // A start after the effective due date cannot be expanded
    if start > due {
        return None;
    }

    Some(ResolvedRange {
        task: record.name.clone(),
        start,
        end: due,
    })
}

/// Resolve every row, preserving source order and dropping unresolvable rows
pub fn resolve_ranges(records: &[TaskRecord]) -> Vec<ResolvedRange> {
    records.iter().filter_map(resolve_range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn both_dates_present() {
        let task = TaskRecord::new("a").start(date(2024, 1, 1)).due(date(2024, 1, 3));
        let range = resolve_range(&task).unwrap();
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 1, 3));
        assert_eq!(range.task, "a");
    }

    #[test]
    fn completed_overrides_due() {
        let task = TaskRecord::new("a")
            .start(date(2024, 1, 1))
            .due(date(2024, 1, 20))
            .completed(date(2024, 1, 5));
        assert_eq!(resolve_range(&task).unwrap().end, date(2024, 1, 5));
    }

    #[test]
    fn completed_without_due_still_resolves() {
        let task = TaskRecord::new("a").start(date(2024, 1, 1)).completed(date(2024, 1, 2));
        assert_eq!(resolve_range(&task).unwrap().end, date(2024, 1, 2));
    }

    #[test]
    fn missing_start_inherits_overridden_due() {
        let task = TaskRecord::new("a")
            .due(date(2024, 3, 10))
            .completed(date(2024, 3, 8));
        let range = resolve_range(&task).unwrap();
        assert_eq!(range.start, date(2024, 3, 8));
        assert_eq!(range.end, date(2024, 3, 8));
    }

    #[test]
    fn no_due_date_is_skipped() {
        let task = TaskRecord::new("a").start(date(2024, 1, 1));
        assert!(resolve_range(&task).is_none());
        assert!(resolve_range(&TaskRecord::new("b")).is_none());
    }

    #[test]
    fn blank_name_is_skipped() {
        let task = TaskRecord::new(" ").start(date(2024, 1, 1)).due(date(2024, 1, 1));
        assert!(resolve_range(&task).is_none());
    }

    #[test]
    fn inverted_range_is_skipped() {
        let task = TaskRecord::new("a")
            .start(date(2024, 1, 10))
            .due(date(2024, 1, 20))
            .completed(date(2024, 1, 5));
        assert!(resolve_range(&task).is_none());
    }

    #[test]
    fn keeps_source_order() {
        let records = vec![
            TaskRecord::new("z").due(date(2024, 1, 1)),
            TaskRecord::new("dropped"),
            TaskRecord::new("a").due(date(2024, 1, 1)),
        ];
        let names: Vec<_> = resolve_ranges(&records).into_iter().map(|r| r.task).collect();
        assert_eq!(names, vec!["z", "a"]);
    }
}
