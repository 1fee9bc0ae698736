//! # plancal-engine
//!
//! Calendar projection for plancal: turns task rows into the data a renderer needs.
//!
//! This crate provides:
//! - Effective date resolution (completion override, start fallback)
//! - Year clipping and per-day occurrence indexing
//! - Deterministic per-task colors (hashed or alternating hues, optional grouping)
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use plancal_core::{ColorScheme, TaskRecord};
//! use plancal_engine::CalendarEngine;
//!
//! let tasks = vec![TaskRecord::new("Ship").due(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())];
//! let projection = CalendarEngine::new(ColorScheme::default()).project(&tasks, 2024);
//! assert_eq!(projection.index.occurrences_of("Ship"), 1);
//! assert!(projection.colors.contains("Ship"));
//! ```

pub mod colors;
pub mod index;
pub mod resolve;

pub use colors::{assign_colors, assign_colors_for, hls_to_color, HUE_STEP};
pub use index::{build_day_index, clip_to_year, earliest_start_year};
pub use resolve::{resolve_range, resolve_ranges};

use plancal_core::{ColorScheme, Projection, TaskLookup, TaskRecord};
use tracing::info;

/// Builds a `Projection` from task rows
#[derive(Clone, Debug, Default)]
pub struct CalendarEngine {
    pub scheme: ColorScheme,
}

impl CalendarEngine {
    pub fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }

    /// Index the rows for `year` and color every distinct task name.
    ///
    /// Colors cover all named rows, including rows that never reach the
    /// index, so the color set does not depend on the target year.
    pub fn project(&self, records: &[TaskRecord], year: i32) -> Projection {
        let lookup = TaskLookup::from_records(records);
        let index = build_day_index(records, year);
        let colors = assign_colors(&lookup, &self.scheme);

        info!(
            year,
            tasks = lookup.len(),
            active_days = index.len(),
            "projected calendar"
        );

        Projection {
            index,
            colors,
            lookup,
        }
    }
}
