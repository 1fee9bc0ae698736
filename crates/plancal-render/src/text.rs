//! Plain-text agenda renderer
//!
//! Lists, month by month, every day that has at least one task. Useful as a
//! quick terminal preview of what the HTML calendar will show.
//!
//! ## Example Output
//!
//! ```text
//! January 2024 Calendar
//!
//! January 2024
//!   Mon 01  Design
//!   Wed 03  Design, Review
//! ```

use chrono::Datelike;
use plancal_core::{month_name, Projection, RenderConfig, RenderError, Renderer};

use crate::{calendar_heading, check_year, task_display_text};

/// Text agenda renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    pub config: RenderConfig,
}

impl TextRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, projection: &Projection) -> Result<String, RenderError> {
        check_year(projection, &self.config)?;
        let year = self.config.year;
        let mut out = calendar_heading(&self.config);
        out.push('\n');

        let mut any = false;
        for month in self.config.months() {
            let days: Vec<_> = projection
                .index
                .iter()
                .filter(|(d, _)| d.year() == year && d.month() == month)
                .collect();
            if days.is_empty() {
                continue;
            }
            any = true;

            out.push_str(&format!("\n{} {}\n", month_name(month), year));
            for (date, tasks) in days {
                let names: Vec<String> = tasks
                    .iter()
                    .map(|t| task_display_text(t, &projection.lookup, self.config.prefix_with_label))
                    .collect();
                out.push_str(&format!(
                    "  {} {:02}  {}\n",
                    date.format("%a"),
                    date.day(),
                    names.join(", ")
                ));
            }
        }

        if !any {
            out.push_str("\nNo tasks scheduled.\n");
        }
        Ok(out)
    }
}
