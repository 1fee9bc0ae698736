//! plancal CLI - Planner Calendar Generator
//!
//! Reads a planner task export and writes a year-at-a-glance or single-month
//! calendar with one colored entry per task per active day.

mod config;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Month};
use clap::Parser;
use plancal_core::{Renderer, TaskRecord};
use plancal_engine::{earliest_start_year, CalendarEngine};
use plancal_render::{HtmlCalendarRenderer, TextRenderer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{parse_month, FileConfig, OutputFormat, Settings};

#[derive(Parser, Debug)]
#[command(name = "plancal")]
#[command(author, version, about = "Planner task export to HTML calendar", long_about = None)]
pub struct Cli {
    /// Task table exported from the planner (.csv, .json or .xlsx)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output file, "-" for stdout [default: planner_calendar.html]
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Calendar year [default: earliest task start year]
    #[arg(short, long)]
    year: Option<i32>,

    /// Render a single month (1-12, or a name such as "March" or "mar")
    #[arg(short, long, value_parser = parse_month)]
    month: Option<Month>,

    /// Clip long task names with an ellipsis instead of wrapping
    #[arg(long)]
    no_wrap_text: bool,

    /// HLS saturation of task colors (0.0-1.0) [default: 0.7]
    #[arg(long, value_name = "F")]
    color_saturation: Option<f64>,

    /// HLS lightness of task colors (0.0-1.0) [default: 0.85]
    #[arg(long, value_name = "F")]
    color_lightness: Option<f64>,

    /// Tasks sharing a label share a color
    #[arg(short = 'l', long)]
    color_by_label: bool,

    /// Tasks sharing a bucket share a color
    #[arg(short = 'b', long)]
    color_by_bucket: bool,

    /// Prefix task names with their label
    #[arg(short = 'p', long = "prefix-labels")]
    prefix_labels: bool,

    /// Spread grouped colors around the wheel in fixed steps
    #[arg(long)]
    alternate_colors: bool,

    /// Output format [default: html]
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// TOML config file with defaults for the options above
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(cli, &file_config)?;

    let records = plancal_parser::parse_file(&cli.file)
        .with_context(|| format!("Failed to read task table '{}'", cli.file.display()))?;

    let year = cli.year.unwrap_or_else(|| default_year(&records));
    info!("Generating calendar for the year: {}", year);

    let projection = CalendarEngine::new(settings.scheme.clone()).project(&records, year);
    let render_config = settings.render_config(year);
    let document = match settings.format {
        OutputFormat::Html => HtmlCalendarRenderer::new(render_config).render(&projection)?,
        OutputFormat::Text => TextRenderer::new(render_config).render(&projection)?,
    };

    if settings.writes_to_stdout() {
        std::io::stdout()
            .lock()
            .write_all(document.as_bytes())
            .context("Failed to write calendar to stdout")?;
    } else {
        fs::write(&settings.output, document).with_context(|| {
            format!("Failed to write calendar '{}'", settings.output.display())
        })?;
        println!(
            "Successfully generated calendar: {}",
            settings.output.display()
        );
    }

    Ok(())
}

/// Earliest year among valid start dates, else the current year
fn default_year(records: &[TaskRecord]) -> i32 {
    earliest_start_year(records).unwrap_or_else(|| {
        let year = Local::now().year();
        warn!(
            "No valid start dates found; defaulting to the current year {}",
            year
        );
        year
    })
}
