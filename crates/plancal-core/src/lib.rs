//! # plancal-core
//!
//! Core domain model and traits for the plancal calendar generator.
//!
//! This crate provides:
//! - Domain types: `TaskRecord`, `ResolvedRange`, `DayIndex`, `ColorAssignment`
//! - Configuration types: `RenderConfig`, `ColorScheme`, `MonthSelector`
//! - The `Renderer` trait implemented by output backends
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use plancal_core::{RenderConfig, TaskRecord};
//!
//! let task = TaskRecord::new("Design")
//!     .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
//!     .due(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap())
//!     .label("Eng");
//! assert_eq!(task.label.as_deref(), Some("Eng"));
//!
//! let config = RenderConfig::new(2024);
//! assert_eq!(config.months().len(), 12);
//! ```

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Task names are the identity key of a task across rows
pub type TaskName = String;

/// Default saturation for generated task colors
pub const DEFAULT_SATURATION: f64 = 0.7;

/// Default lightness for generated task colors
pub const DEFAULT_LIGHTNESS: f64 = 0.85;

// ============================================================================
// Task Records
// ============================================================================

/// One row of the planner task table
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task name (identity key)
    pub name: TaskName,
    /// Planned start date
    pub start: Option<NaiveDate>,
    /// Planned due date
    pub due: Option<NaiveDate>,
    /// Completion date; replaces the due date when present
    pub completed: Option<NaiveDate>,
    /// Planner label(s), verbatim
    pub label: Option<String>,
    /// Planner bucket name
    pub bucket: Option<String>,
}

impl TaskRecord {
    /// Create a record with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the start date
    pub fn start(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    /// Set the due date
    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due = Some(date);
        self
    }

    /// Set the completion date
    pub fn completed(mut self, date: NaiveDate) -> Self {
        self.completed = Some(date);
        self
    }

    /// Set the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the bucket
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// True if the name is blank after trimming
    pub fn has_blank_name(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// Effective, inclusive date range of a task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRange {
    pub task: TaskName,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ResolvedRange {
    /// Number of calendar days covered (inclusive on both ends)
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

// ============================================================================
// Day Index
// ============================================================================

/// Mapping from calendar date to the tasks active on that date.
///
/// Each day keeps its tasks in first-insertion order; inserting a name that is
/// already present for that day is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DayIndex {
    year: i32,
    days: BTreeMap<NaiveDate, Vec<TaskName>>,
}

impl DayIndex {
    /// Create an empty index for a target year
    pub fn new(year: i32) -> Self {
        Self {
            year,
            days: BTreeMap::new(),
        }
    }

    /// Target year the index was built for
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Record that `task` is active on `date`
    pub fn insert(&mut self, date: NaiveDate, task: &str) {
        let tasks = self.days.entry(date).or_default();
        if !tasks.iter().any(|t| t == task) {
            tasks.push(task.to_string());
        }
    }

    /// Tasks active on a date, in insertion order
    pub fn tasks_on(&self, date: NaiveDate) -> &[TaskName] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of days on which `task` occurs
    pub fn occurrences_of(&self, task: &str) -> usize {
        self.days
            .values()
            .filter(|tasks| tasks.iter().any(|t| t == task))
            .count()
    }

    /// Dates with at least one occurrence, ascending
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// (date, tasks) pairs, ascending by date
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[TaskName])> + '_ {
        self.days.iter().map(|(d, t)| (*d, t.as_slice()))
    }

    /// Distinct task names appearing anywhere in the index
    pub fn task_names(&self) -> BTreeSet<&str> {
        self.days
            .values()
            .flat_map(|tasks| tasks.iter().map(String::as_str))
            .collect()
    }

    /// Number of dates with at least one occurrence
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

// ============================================================================
// Colors
// ============================================================================

/// An sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from unit-interval channels, rounding and clamping each
    pub fn from_unit_rgb(r: f64, g: f64, b: f64) -> Self {
        fn channel(v: f64) -> u8 {
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        }
        Self::new(channel(r), channel(g), channel(b))
    }

    /// `#rrggbb` form
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Background used for a task with no assigned color
pub const FALLBACK_TASK_COLOR: &str = "#f0f0f0";

/// One color per distinct task name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    colors: BTreeMap<TaskName, Color>,
}

impl ColorAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, task: impl Into<String>, color: Color) {
        self.colors.insert(task.into(), color);
    }

    pub fn get(&self, task: &str) -> Option<Color> {
        self.colors.get(task).copied()
    }

    /// CSS color for a task, falling back to light gray
    pub fn css_color_for(&self, task: &str) -> String {
        self.get(task)
            .map(|c| c.to_hex())
            .unwrap_or_else(|| FALLBACK_TASK_COLOR.to_string())
    }

    pub fn contains(&self, task: &str) -> bool {
        self.colors.contains_key(task)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> + '_ {
        self.colors.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Which task attribute drives hue selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorGrouping {
    /// Hash each task name
    #[default]
    None,
    /// Tasks sharing a label share a color
    Label,
    /// Tasks sharing a bucket share a color
    Bucket,
}

impl ColorGrouping {
    /// Build from the two independent on/off switches exposed to users.
    ///
    /// Both switches on is rejected rather than resolved by precedence.
    pub fn from_flags(by_label: bool, by_bucket: bool) -> Result<Self, ConfigError> {
        match (by_label, by_bucket) {
            (true, true) => Err(ConfigError::ConflictingGrouping),
            (true, false) => Ok(Self::Label),
            (false, true) => Ok(Self::Bucket),
            (false, false) => Ok(Self::None),
        }
    }
}

/// Run-wide color generation settings
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScheme {
    pub grouping: ColorGrouping,
    /// Sequential, index-based hues for grouped tasks
    pub alternate: bool,
    /// HLS lightness in `[0, 1]`
    pub lightness: f64,
    /// HLS saturation in `[0, 1]`
    pub saturation: f64,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            grouping: ColorGrouping::None,
            alternate: false,
            lightness: DEFAULT_LIGHTNESS,
            saturation: DEFAULT_SATURATION,
        }
    }
}

impl ColorScheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grouping(mut self, grouping: ColorGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn alternate(mut self, alternate: bool) -> Self {
        self.alternate = alternate;
        self
    }

    /// Set lightness, clamped to `[0, 1]`
    pub fn lightness(mut self, lightness: f64) -> Self {
        self.lightness = clamp_unit(lightness);
        self
    }

    /// Set saturation, clamped to `[0, 1]`
    pub fn saturation(mut self, saturation: f64) -> Self {
        self.saturation = clamp_unit(saturation);
        self
    }
}

/// Clamp to `[0, 1]`; NaN maps to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Task Lookup
// ============================================================================

/// Per-task attributes gathered across all rows sharing a name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskAttributes {
    /// First non-empty label
    pub label: Option<String>,
    /// First non-empty bucket
    pub bucket: Option<String>,
}

/// Distinct task names with their label/bucket attributes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskLookup {
    tasks: BTreeMap<TaskName, TaskAttributes>,
}

impl TaskLookup {
    /// Collect attributes from source rows. Blank names are ignored.
    pub fn from_records(records: &[TaskRecord]) -> Self {
        let mut tasks: BTreeMap<TaskName, TaskAttributes> = BTreeMap::new();
        for record in records {
            if record.has_blank_name() {
                continue;
            }
            let attrs = tasks.entry(record.name.clone()).or_default();
            if attrs.label.is_none() {
                attrs.label = non_empty(record.label.as_deref());
            }
            if attrs.bucket.is_none() {
                attrs.bucket = non_empty(record.bucket.as_deref());
            }
        }
        Self { tasks }
    }

    pub fn label(&self, task: &str) -> Option<&str> {
        self.tasks.get(task).and_then(|a| a.label.as_deref())
    }

    pub fn bucket(&self, task: &str) -> Option<&str> {
        self.tasks.get(task).and_then(|a| a.bucket.as_deref())
    }

    pub fn attributes(&self, task: &str) -> Option<&TaskAttributes> {
        self.tasks.get(task)
    }

    /// Distinct task names in ascending lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tasks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

/// Everything a renderer needs, built once and shared read-only
#[derive(Clone, Debug, Default)]
pub struct Projection {
    pub index: DayIndex,
    pub colors: ColorAssignment,
    pub lookup: TaskLookup,
}

// ============================================================================
// Render Configuration
// ============================================================================

/// Immutable render settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub year: i32,
    /// Single month, or `None` for the full year
    pub month: Option<Month>,
    /// Let long task text wrap instead of clipping with an ellipsis
    pub wrap_task_text: bool,
    /// Prefix each task name with its label
    pub prefix_with_label: bool,
}

impl RenderConfig {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            month: None,
            wrap_task_text: true,
            prefix_with_label: false,
        }
    }

    pub fn month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn wrap_task_text(mut self, wrap: bool) -> Self {
        self.wrap_task_text = wrap;
        self
    }

    pub fn prefix_with_label(mut self, prefix: bool) -> Self {
        self.prefix_with_label = prefix;
        self
    }

    /// Months in scope, as 1-based numbers
    pub fn months(&self) -> Vec<u32> {
        match self.month {
            Some(m) => vec![m.number_from_month()],
            None => (1..=12).collect(),
        }
    }

    pub fn is_single_month(&self) -> bool {
        self.month.is_some()
    }
}

/// User-facing month choice, resolved before it reaches the engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MonthSelector {
    ByNumber(u32),
    ByName(String),
}

impl MonthSelector {
    pub fn resolve(&self) -> Result<Month, ConfigError> {
        match self {
            Self::ByNumber(n) => u8::try_from(*n)
                .ok()
                .and_then(|n| Month::try_from(n).ok())
                .ok_or_else(|| ConfigError::InvalidMonth(n.to_string())),
            Self::ByName(name) => Month::from_str(name.trim())
                .map_err(|_| ConfigError::InvalidMonth(name.clone())),
        }
    }
}

impl FromStr for MonthSelector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::InvalidMonth(String::new()));
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            let n = s
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidMonth(s.to_string()))?;
            return Ok(Self::ByNumber(n));
        }
        Ok(Self::ByName(s.to_string()))
    }
}

/// Full English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a calendar projection to the output format
    fn render(&self, projection: &Projection) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid user configuration, raised at the boundary
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid month: '{0}' (expected 1-12 or a month name such as January)")]
    InvalidMonth(String),

    #[error("Cannot color by label and by bucket at the same time")]
    ConflictingGrouping,

    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    OutOfRange { name: &'static str, value: f64 },
}

/// Rendering error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The projection was indexed for a different year than the one being rendered
    #[error("Projection covers {indexed} but the calendar is for {requested}")]
    YearMismatch { indexed: i32, requested: i32 },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn task_record_builder() {
        let task = TaskRecord::new("Ship")
            .start(date(2024, 1, 10))
            .due(date(2024, 1, 12))
            .completed(date(2024, 1, 11))
            .label("Ops")
            .bucket("Release");

        assert_eq!(task.name, "Ship");
        assert_eq!(task.start, Some(date(2024, 1, 10)));
        assert_eq!(task.due, Some(date(2024, 1, 12)));
        assert_eq!(task.completed, Some(date(2024, 1, 11)));
        assert_eq!(task.label.as_deref(), Some("Ops"));
        assert_eq!(task.bucket.as_deref(), Some("Release"));
    }

    #[test]
    fn blank_name_detection() {
        assert!(TaskRecord::new("   ").has_blank_name());
        assert!(!TaskRecord::new(" a ").has_blank_name());
    }

    #[test]
    fn resolved_range_day_count_is_inclusive() {
        let range = ResolvedRange {
            task: "x".into(),
            start: date(2024, 2, 27),
            end: date(2024, 3, 1),
        };
        assert_eq!(range.day_count(), 4);
    }

    #[test]
    fn day_index_collapses_duplicates_and_keeps_order() {
        let mut index = DayIndex::new(2024);
        let d = date(2024, 5, 1);
        index.insert(d, "b");
        index.insert(d, "a");
        index.insert(d, "b");

        assert_eq!(index.tasks_on(d), ["b".to_string(), "a".to_string()]);
        assert_eq!(index.occurrences_of("b"), 1);
        assert_eq!(index.len(), 1);
        assert!(index.tasks_on(date(2024, 5, 2)).is_empty());
    }

    #[test]
    fn color_hex_formatting() {
        assert_eq!(Color::new(255, 0, 16).to_hex(), "#ff0010");
        assert_eq!(Color::from_unit_rgb(1.2, 0.5, -0.1).to_hex(), "#ff8000");
    }

    #[test]
    fn color_assignment_fallback() {
        let mut colors = ColorAssignment::new();
        colors.insert("a", Color::new(1, 2, 3));
        assert_eq!(colors.css_color_for("a"), "#010203");
        assert_eq!(colors.css_color_for("missing"), FALLBACK_TASK_COLOR);
    }

    #[test]
    fn grouping_from_flags_rejects_both() {
        assert_eq!(ColorGrouping::from_flags(false, false), Ok(ColorGrouping::None));
        assert_eq!(ColorGrouping::from_flags(true, false), Ok(ColorGrouping::Label));
        assert_eq!(ColorGrouping::from_flags(false, true), Ok(ColorGrouping::Bucket));
        assert_eq!(
            ColorGrouping::from_flags(true, true),
            Err(ConfigError::ConflictingGrouping)
        );
    }

    #[test]
    fn color_scheme_clamps() {
        let scheme = ColorScheme::new().lightness(1.5).saturation(-0.2);
        assert_eq!(scheme.lightness, 1.0);
        assert_eq!(scheme.saturation, 0.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn task_lookup_takes_first_non_empty_attributes() {
        let records = vec![
            TaskRecord::new("Design").label(""),
            TaskRecord::new("Design").label("Eng").bucket("Q1"),
            TaskRecord::new("Design").label("Other"),
            TaskRecord::new("  "),
            TaskRecord::new("Ship"),
        ];
        let lookup = TaskLookup::from_records(&records);

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.label("Design"), Some("Eng"));
        assert_eq!(lookup.bucket("Design"), Some("Q1"));
        assert_eq!(lookup.label("Ship"), None);
        assert_eq!(lookup.names().collect::<Vec<_>>(), vec!["Design", "Ship"]);
    }

    #[test]
    fn render_config_months() {
        let year = RenderConfig::new(2024);
        assert_eq!(year.months(), (1..=12).collect::<Vec<_>>());
        assert!(year.wrap_task_text);
        assert!(!year.is_single_month());

        let feb = RenderConfig::new(2024).month(Month::February);
        assert_eq!(feb.months(), vec![2]);
        assert!(feb.is_single_month());
    }

    #[test]
    fn month_selector_parsing() {
        assert_eq!("3".parse::<MonthSelector>(), Ok(MonthSelector::ByNumber(3)));
        assert_eq!(
            "March".parse::<MonthSelector>(),
            Ok(MonthSelector::ByName("March".into()))
        );
        assert!("".parse::<MonthSelector>().is_err());
    }

    #[test]
    fn month_selector_resolution() {
        assert_eq!(MonthSelector::ByNumber(12).resolve(), Ok(Month::December));
        assert_eq!(
            MonthSelector::ByName("february".into()).resolve(),
            Ok(Month::February)
        );
        assert_eq!(MonthSelector::ByName("Sep".into()).resolve(), Ok(Month::September));
        assert!(MonthSelector::ByNumber(0).resolve().is_err());
        assert!(MonthSelector::ByNumber(13).resolve().is_err());
        assert!(MonthSelector::ByName("Smarch".into()).resolve().is_err());
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "");
    }
}
