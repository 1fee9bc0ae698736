// Loads the optional TOML config file and merges it with command-line flags.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Month;
use clap::ValueEnum;
use plancal_core::{
    ColorGrouping, ColorScheme, ConfigError, MonthSelector, RenderConfig, DEFAULT_LIGHTNESS,
    DEFAULT_SATURATION,
};
use serde::Deserialize;
use tracing::warn;

use crate::Cli;

pub const DEFAULT_OUTPUT: &str = "planner_calendar.html";

fn default_true() -> bool {
    true
}
fn default_saturation() -> f64 {
    DEFAULT_SATURATION
}
fn default_lightness() -> f64 {
    DEFAULT_LIGHTNESS
}

/// Output document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone HTML calendar
    #[default]
    Html,
    /// Plain-text agenda
    Text,
}

/// Contents of a `--config` TOML file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub wrap_text: bool,
    #[serde(default = "default_saturation")]
    pub saturation: f64,
    #[serde(default = "default_lightness")]
    pub lightness: f64,
    #[serde(default)]
    pub color_by: ColorGrouping,
    #[serde(default)]
    pub alternate_colors: bool,
    #[serde(default)]
    pub prefix_labels: bool,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            output: None,
            wrap_text: true,
            saturation: DEFAULT_SATURATION,
            lightness: DEFAULT_LIGHTNESS,
            color_by: ColorGrouping::None,
            alternate_colors: false,
            prefix_labels: false,
            format: OutputFormat::Html,
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Effective settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub output: PathBuf,
    pub month: Option<Month>,
    pub scheme: ColorScheme,
    pub wrap_text: bool,
    pub prefix_labels: bool,
    pub format: OutputFormat,
}

impl Settings {
    /// Merge flags over the file config. Switches that can only turn a
    /// feature on are OR-ed with the file.
    pub fn resolve(cli: &Cli, file: &FileConfig) -> Result<Self, ConfigError> {
        let grouping = if cli.color_by_label || cli.color_by_bucket {
            ColorGrouping::from_flags(cli.color_by_label, cli.color_by_bucket)?
        } else {
            file.color_by
        };

        let saturation = checked_unit("saturation", cli.color_saturation.unwrap_or(file.saturation));
        let lightness = checked_unit("lightness", cli.color_lightness.unwrap_or(file.lightness));

        Ok(Self {
            output: cli
                .output
                .clone()
                .or_else(|| file.output.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            month: cli.month,
            scheme: ColorScheme::new()
                .grouping(grouping)
                .alternate(cli.alternate_colors || file.alternate_colors)
                .saturation(saturation)
                .lightness(lightness),
            wrap_text: file.wrap_text && !cli.no_wrap_text,
            prefix_labels: cli.prefix_labels || file.prefix_labels,
            format: cli.format.unwrap_or(file.format),
        })
    }

    pub fn render_config(&self, year: i32) -> RenderConfig {
        let config = RenderConfig::new(year)
            .wrap_task_text(self.wrap_text)
            .prefix_with_label(self.prefix_labels);
        match self.month {
            Some(month) => config.month(month),
            None => config,
        }
    }

    pub fn writes_to_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

/// Warn about a value outside `[0, 1]`; the color scheme clamps it
fn checked_unit(name: &'static str, value: f64) -> f64 {
    if !(0.0..=1.0).contains(&value) {
        warn!("{}; clamping", ConfigError::OutOfRange { name, value });
    }
    value
}

/// clap value parser for `--month`
pub fn parse_month(s: &str) -> Result<Month, ConfigError> {
    s.parse::<MonthSelector>()?.resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("plancal").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let settings = Settings::resolve(&cli(&["tasks.csv"]), &FileConfig::default()).unwrap();
        assert_eq!(settings.output, PathBuf::from("planner_calendar.html"));
        assert_eq!(settings.scheme, ColorScheme::default());
        assert!(settings.wrap_text);
        assert!(!settings.prefix_labels);
        assert_eq!(settings.format, OutputFormat::Html);
        assert_eq!(settings.month, None);
    }

    #[test]
    fn toml_fields_default_individually() {
        let file = FileConfig::from_toml("color_by = \"bucket\"\nwrap_text = false\n").unwrap();
        assert_eq!(file.color_by, ColorGrouping::Bucket);
        assert!(!file.wrap_text);
        assert_eq!(file.saturation, DEFAULT_SATURATION);
        assert_eq!(file.format, OutputFormat::Html);
        assert_eq!(FileConfig::from_toml("").unwrap(), FileConfig::default());
    }

    #[test]
    fn unknown_grouping_in_file_is_an_error() {
        assert!(FileConfig::from_toml("color_by = \"rainbow\"").is_err());
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig::from_toml(
            "output = \"from-file.html\"\nsaturation = 0.2\ncolor_by = \"bucket\"\nformat = \"text\"\n",
        )
        .unwrap();
        let settings = Settings::resolve(
            &cli(&[
                "tasks.csv",
                "-o",
                "cli.html",
                "--color-saturation",
                "0.5",
                "-l",
                "-f",
                "html",
            ]),
            &file,
        )
        .unwrap();

        assert_eq!(settings.output, PathBuf::from("cli.html"));
        assert_eq!(settings.scheme.saturation, 0.5);
        assert_eq!(settings.scheme.grouping, ColorGrouping::Label);
        assert_eq!(settings.format, OutputFormat::Html);
    }

    #[test]
    fn file_values_apply_when_flags_absent() {
        let file = FileConfig::from_toml(
            "output = \"from-file.html\"\ncolor_by = \"label\"\nprefix_labels = true\nalternate_colors = true\n",
        )
        .unwrap();
        let settings = Settings::resolve(&cli(&["tasks.csv"]), &file).unwrap();
        assert_eq!(settings.output, PathBuf::from("from-file.html"));
        assert_eq!(settings.scheme.grouping, ColorGrouping::Label);
        assert!(settings.scheme.alternate);
        assert!(settings.prefix_labels);
    }

    #[test]
    fn both_grouping_flags_are_rejected() {
        let err = Settings::resolve(&cli(&["tasks.csv", "-l", "-b"]), &FileConfig::default())
            .unwrap_err();
        assert_eq!(err, ConfigError::ConflictingGrouping);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let settings = Settings::resolve(
            &cli(&["tasks.csv", "--color-lightness", "1.5", "--color-saturation=-0.2"]),
            &FileConfig::default(),
        )
        .unwrap();
        assert_eq!(settings.scheme.lightness, 1.0);
        assert_eq!(settings.scheme.saturation, 0.0);
    }

    #[test]
    fn no_wrap_flag_turns_wrapping_off() {
        let settings =
            Settings::resolve(&cli(&["tasks.csv", "--no-wrap-text"]), &FileConfig::default())
                .unwrap();
        assert!(!settings.render_config(2024).wrap_task_text);
    }

    #[test]
    fn month_flag_accepts_numbers_and_names() {
        assert_eq!(cli(&["t.csv", "-m", "3"]).month, Some(Month::March));
        assert_eq!(cli(&["t.csv", "--month", "march"]).month, Some(Month::March));
        assert_eq!(cli(&["t.csv", "-m", "Sep"]).month, Some(Month::September));
        assert!(Cli::try_parse_from(["plancal", "t.csv", "-m", "13"]).is_err());
        assert!(Cli::try_parse_from(["plancal", "t.csv", "-m", "Smarch"]).is_err());
    }

    #[test]
    fn dash_output_means_stdout() {
        let settings =
            Settings::resolve(&cli(&["tasks.csv", "-o", "-"]), &FileConfig::default()).unwrap();
        assert!(settings.writes_to_stdout());
    }
}
