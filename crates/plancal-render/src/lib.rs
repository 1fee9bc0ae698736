//! # plancal-render
//!
//! Rendering backends for plancal calendar projections.
//!
//! This crate provides:
//! - Month grid layout (Sunday-first weeks, adjacent-month padding)
//! - Standalone HTML calendar (year-at-a-glance or single month, print-ready)
//! - Plain-text agenda output
//!
//! ## Example
//!
//! ```rust,ignore
//! use plancal_core::{RenderConfig, Renderer};
//! use plancal_engine::CalendarEngine;
//! use plancal_render::HtmlCalendarRenderer;
//!
//! let projection = CalendarEngine::default().project(&tasks, 2024);
//! let html = HtmlCalendarRenderer::new(RenderConfig::new(2024)).render(&projection)?;
//! std::fs::write("planner_calendar.html", html)?;
//! ```

pub mod grid;
pub mod html;
pub mod text;

pub use grid::{GridDay, MonthGrid, WEEKDAY_HEADERS};
pub use html::{html_escape, HtmlCalendarRenderer};
pub use text::TextRenderer;

use plancal_core::{Projection, RenderConfig, RenderError, TaskLookup};

/// Text shown for a task: its name, optionally prefixed verbatim by its label
pub fn task_display_text(task: &str, lookup: &TaskLookup, prefix_with_label: bool) -> String {
    match lookup.label(task) {
        Some(label) if prefix_with_label => format!("{}{}", label, task),
        _ => task.to_string(),
    }
}

/// Reject a non-empty projection that was indexed for another year
pub(crate) fn check_year(projection: &Projection, config: &RenderConfig) -> Result<(), RenderError> {
    let indexed = projection.index.year();
    if !projection.index.is_empty() && indexed != config.year {
        return Err(RenderError::YearMismatch {
            indexed,
            requested: config.year,
        });
    }
    Ok(())
}

/// Page heading for a render configuration
pub fn calendar_heading(config: &RenderConfig) -> String {
    match config.month {
        Some(m) => format!("{} {} Calendar", m.name(), config.year),
        None => format!("Yearly Planner Calendar - {}", config.year),
    }
}
