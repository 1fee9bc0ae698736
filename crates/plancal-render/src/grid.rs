//! Month grid layout
//!
//! Weeks start on Sunday. The grid begins on the Sunday on or before the 1st
//! and ends on the Saturday on or after the last day of the month, so every
//! row has seven days and some cells belong to the adjacent months.

use chrono::{Datelike, Duration, NaiveDate};

/// Weekday column headers, Sunday first
pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One cell of a month grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    /// False for leading/trailing days from adjacent months
    pub in_month: bool,
}

/// Display grid of one month
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[GridDay; 7]>,
}

impl MonthGrid {
    /// Lay out `month` (1-12) of `year`. `None` for an invalid month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = last_day_of_month(year, month)?;

        let lead = i64::from(first.weekday().num_days_from_sunday());
        let trail = 6 - i64::from(last.weekday().num_days_from_sunday());
        let grid_start = first - Duration::days(lead);
        let total_days = (last - first).num_days() + 1 + lead + trail;

        let mut weeks = Vec::with_capacity((total_days / 7) as usize);
        let mut day = grid_start;
        for _ in 0..total_days / 7 {
            let mut week = [GridDay {
                date: day,
                in_month: false,
            }; 7];
            for cell in &mut week {
                *cell = GridDay {
                    date: day,
                    in_month: day.month() == month && day.year() == year,
                };
                day = day.succ_opt()?;
            }
            weeks.push(week);
        }

        Some(Self { year, month, weeks })
    }

    /// All cells in row-major order
    pub fn days(&self) -> impl Iterator<Item = &GridDay> + '_ {
        self.weeks.iter().flat_map(|w| w.iter())
    }

    /// Number of cells that belong to the month itself
    pub fn in_month_count(&self) -> usize {
        self.days().filter(|d| d.in_month).count()
    }
}

/// Last calendar day of a month
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn january_2024_layout() {
        // Jan 1 2024 is a Monday, Jan 31 a Wednesday
        let grid = MonthGrid::new(2024, 1).unwrap();
        assert_eq!(grid.weeks.len(), 5);
        assert_eq!(grid.weeks[0][0].date, date(2023, 12, 31));
        assert!(!grid.weeks[0][0].in_month);
        assert_eq!(grid.weeks[0][1].date, date(2024, 1, 1));
        assert_eq!(grid.weeks[4][6].date, date(2024, 2, 3));
        assert_eq!(grid.in_month_count(), 31);
    }

    #[test]
    fn february_2015_fits_four_weeks() {
        // Starts on Sunday, ends on Saturday
        let grid = MonthGrid::new(2015, 2).unwrap();
        assert_eq!(grid.weeks.len(), 4);
        assert!(grid.days().all(|d| d.in_month));
    }

    #[test]
    fn six_week_month() {
        // Mar 2024 starts on Friday and has 31 days
        let grid = MonthGrid::new(2024, 3).unwrap();
        assert_eq!(grid.weeks.len(), 6);
    }

    #[test]
    fn every_row_starts_on_sunday() {
        for month in 1..=12 {
            let grid = MonthGrid::new(2023, month).unwrap();
            for week in &grid.weeks {
                assert_eq!(week[0].date.weekday(), Weekday::Sun);
                assert_eq!(week[6].date.weekday(), Weekday::Sat);
            }
        }
    }

    #[test]
    fn invalid_month() {
        assert!(MonthGrid::new(2024, 0).is_none());
        assert!(MonthGrid::new(2024, 13).is_none());
    }

    #[test]
    fn last_days() {
        assert_eq!(last_day_of_month(2024, 2), Some(date(2024, 2, 29)));
        assert_eq!(last_day_of_month(2023, 2), Some(date(2023, 2, 28)));
        assert_eq!(last_day_of_month(2024, 12), Some(date(2024, 12, 31)));
    }
}
