//! HTML Calendar Renderer
//!
//! Generates a standalone HTML document with embedded CSS:
//! - Year view: twelve month blocks in a three-column grid
//! - Month view: one larger month block
//! - One colored span per task on every day it is active
//! - Print rules for 11x17 landscape sheets

use chrono::Datelike;
use plancal_core::{month_name, Projection, RenderConfig, RenderError, Renderer};
use rayon::prelude::*;
use tracing::debug;

use crate::grid::{GridDay, MonthGrid, WEEKDAY_HEADERS};
use crate::{calendar_heading, check_year, task_display_text};

/// HTML calendar renderer
#[derive(Clone, Debug)]
pub struct HtmlCalendarRenderer {
    pub config: RenderConfig,
}

impl HtmlCalendarRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Generate the complete HTML document
    fn generate_html(&self, projection: &Projection) -> String {
        let months = self.config.months();
        let blocks: Vec<String> = months
            .par_iter()
            .map(|&month| self.render_month(month, projection))
            .collect();

        debug!(months = blocks.len(), "rendered month blocks");

        let grid_class = if self.config.is_single_month() {
            "year-grid single-month"
        } else {
            "year-grid"
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Planner Calendar - {year}</title>
    <style>
{css}
    </style>
</head>
<body>
    <h1 style="text-align: center;">{heading}</h1>
    <div class="{grid_class}">
{blocks}
    </div>
</body>
</html>
"#,
            year = self.config.year,
            css = self.generate_css(),
            heading = calendar_heading(&self.config),
            grid_class = grid_class,
            blocks = blocks.concat(),
        )
    }

    /// Render one month block
    fn render_month(&self, month: u32, projection: &Projection) -> String {
        let mut html = String::new();
        html.push_str("<div class=\"month\">\n");
        html.push_str(&format!(
            "  <div class=\"month-title\">{} {}</div>\n",
            month_name(month),
            self.config.year
        ));
        html.push_str("  <div class=\"calendar-grid\">\n");

        for header in WEEKDAY_HEADERS {
            html.push_str(&format!("    <div class=\"day-header\">{}</div>\n", header));
        }

        if let Some(grid) = MonthGrid::new(self.config.year, month) {
            for day in grid.days() {
                html.push_str(&self.render_day(day, projection));
            }
        }

        html.push_str("  </div>\n");
        html.push_str("</div>\n");
        html
    }

    /// Render one day cell with its tasks
    fn render_day(&self, day: &GridDay, projection: &Projection) -> String {
        let class = if day.in_month {
            "day"
        } else {
            "day other-month"
        };

        let mut html = format!(
            "    <div class=\"{}\" data-date=\"{}\">\n      <div class=\"day-number\">{}</div>\n      <div class=\"tasks\">\n",
            class,
            day.date.format("%Y-%m-%d"),
            day.date.day()
        );

        for task in projection.index.tasks_on(day.date) {
            let text = html_escape(&task_display_text(
                task,
                &projection.lookup,
                self.config.prefix_with_label,
            ));
            html.push_str(&format!(
                "        <span class=\"task\" title=\"{text}\" style=\"background-color: {color};\">{text}</span>\n",
                text = text,
                color = projection.colors.css_color_for(task),
            ));
        }

        html.push_str("      </div>\n    </div>\n");
        html
    }

    /// Generate CSS styles
    fn generate_css(&self) -> String {
        let white_space = if self.config.wrap_task_text {
            "normal"
        } else {
            "nowrap"
        };
        let columns = if self.config.is_single_month() {
            "1fr"
        } else {
            "repeat(3, 1fr)"
        };

        format!(
            r#"        body {{ font-family: sans-serif; font-size: 8px; }}
        .year-grid {{ display: grid; grid-template-columns: {columns}; gap: 20px; }}
        .month {{ border: 1px solid #ccc; padding: 5px; }}
        .month-title {{ text-align: center; font-weight: bold; font-size: 12px; margin-bottom: 5px; }}
        .calendar-grid {{ display: grid; grid-template-columns: repeat(7, 1fr); width: 100%; }}
        .day-header {{ text-align: center; font-weight: bold; background-color: #f0f0f0; font-size: 9px; padding: 2px; border: 1px solid #ddd; }}
        .day {{ border: 1px solid #ddd; vertical-align: top; height: 70px; padding: 2px; overflow: hidden; position: relative; }}
        .day.other-month {{ background-color: #f9f9f9; color: #aaa; }}
        .day-number {{ position: absolute; top: 1px; left: 1px; font-weight: bold; font-size: 9px; color: #333; }}
        .day.other-month .day-number {{ color: #aaa; }}
        .tasks {{ margin-top: 12px; line-height: 1.1; }}
        .task {{ display: block; white-space: {white_space}; overflow: hidden; text-overflow: ellipsis; margin-bottom: 1px; padding: 0 1px; border-radius: 2px; border: 1px solid #ccc; color: #000; }}
        .single-month .day {{ height: 100px; }}
        .single-month .day-number {{ font-size: 12px; }}
        .single-month .day-header {{ font-size: 12px; }}
        .single-month .task {{ font-size: 9px; }}
        @media print {{
            @page {{ size: 17in 11in landscape; margin: 0.5in; }}
            body {{ font-size: 7pt; -webkit-print-color-adjust: exact; print-color-adjust: exact; }}
            .year-grid {{ gap: 15px; }}
            .month {{ page-break-inside: avoid; border: 1px solid #aaa; }}
            .day {{ height: 65px; border: 1px solid #ccc; }}
            .day-header {{ font-size: 8pt; padding: 1px; }}
            .day-number {{ font-size: 8pt; }}
            .task {{ border: 1px solid #b0dde4; font-size: 5pt; }}
        }}"#,
            columns = columns,
            white_space = white_space,
        )
    }
}

impl Renderer for HtmlCalendarRenderer {
    type Output = String;

    fn render(&self, projection: &Projection) -> Result<String, RenderError> {
        check_year(projection, &self.config)?;
        Ok(self.generate_html(projection))
    }
}

/// Escape task text for HTML content and attributes.
///
/// Semicolons are stripped before escaping so the entities introduced by
/// escaping keep theirs.
pub fn html_escape(s: &str) -> String {
    s.replace(';', "")
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
