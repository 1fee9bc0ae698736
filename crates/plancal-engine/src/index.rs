//! Occurrence indexing
//!
//! Expands resolved task ranges into a per-day index for one calendar year.
//!
//! # Algorithm
//!
//! 1. Resolve each row's effective range (see `resolve`)
//! 2. Clip the range to `[Jan 1, Dec 31]` of the target year
//! 3. Insert the task name on every day of the clipped range, inclusive
//!
//! Iteration follows source row order, so the per-day task order is the order
//! in which tasks first appear in the input.

use chrono::{Datelike, NaiveDate};
use plancal_core::{DayIndex, ResolvedRange, TaskRecord};
use tracing::debug;

use crate::resolve::resolve_ranges;

/// First and last day of a year
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// Clip a range to the target year. `None` if nothing of it falls in that year.
pub fn clip_to_year(range: &ResolvedRange, year: i32) -> Option<ResolvedRange> {
    // Fast reject before building dates
    if range.start.year() > year || range.end.year() < year {
        return None;
    }
    let (jan1, dec31) = year_bounds(year)?;
    let start = range.start.max(jan1);
    let end = range.end.min(dec31);
    (start <= end).then(|| ResolvedRange {
        task: range.task.clone(),
        start,
        end,
    })
}

/// Build the day index for `year` from raw task rows
pub fn build_day_index(records: &[TaskRecord], year: i32) -> DayIndex {
    let mut index = DayIndex::new(year);
    let ranges = resolve_ranges(records);
    let unresolved = records.len() - ranges.len();
    let mut outside = 0usize;
    let mut occurrences = 0i64;

    for range in &ranges {
        let Some(clipped) = clip_to_year(range, year) else {
            outside += 1;
            continue;
        };
        occurrences += clipped.day_count();
        for day in clipped.start.iter_days().take_while(|d| *d <= clipped.end) {
            index.insert(day, &clipped.task);
        }
    }

    debug!(
        year,
        days = index.len(),
        occurrences,
        unresolved,
        outside,
        "built day index"
    );
    index
}

/// Earliest year among valid start dates, as used for the default target year
pub fn earliest_start_year(records: &[TaskRecord]) -> Option<i32> {
    records.iter().filter_map(|r| r.start).map(|d| d.year()).min()
}
