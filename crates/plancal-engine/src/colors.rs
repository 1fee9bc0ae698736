//! Deterministic task coloring
//!
//! Every distinct task name gets one color. Lightness and saturation are fixed
//! for the whole run; only the hue varies.
//!
//! # Hue selection
//!
//! Names are sorted ascending and numbered from 0. For each name:
//!
//! 1. Grouping by label and the task has a label: hash the label, or with
//!    alternate colors use `(HUE_STEP * i mod 360) / 360`
//! 2. Grouping by bucket and the task has a bucket: same, with the bucket
//! 3. Otherwise hash the task name. Alternate colors never apply here.
//!
//! The hash is SHA-256 read as a big-endian integer, reduced modulo 360.

use plancal_core::{clamp_unit, Color, ColorAssignment, ColorGrouping, ColorScheme, TaskLookup};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Degrees between consecutive hues in alternate mode
pub const HUE_STEP: u64 = 29;

/// Assign a color to every distinct task name in `lookup`
pub fn assign_colors(lookup: &TaskLookup, scheme: &ColorScheme) -> ColorAssignment {
    assign_colors_for(lookup.names(), lookup, scheme)
}

/// Assign colors to an explicit set of names, using `lookup` for attributes.
///
/// Names are deduplicated and sorted before numbering.
pub fn assign_colors_for<'a>(
    names: impl IntoIterator<Item = &'a str>,
    lookup: &TaskLookup,
    scheme: &ColorScheme,
) -> ColorAssignment {
    let mut sorted: Vec<&str> = names.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let lightness = clamp_unit(scheme.lightness);
    let saturation = clamp_unit(scheme.saturation);

    let mut colors = ColorAssignment::new();
    for (i, name) in sorted.iter().enumerate() {
        let hue = task_hue(name, i, lookup, scheme);
        let color = hls_to_color(hue, lightness, saturation);
        debug!(task = %name, hue, color = %color, "assigned task color");
        colors.insert(*name, color);
    }
    colors
}

/// Hue in `[0, 1)` for the task at sorted position `index`
pub fn task_hue(name: &str, index: usize, lookup: &TaskLookup, scheme: &ColorScheme) -> f64 {
    let group_key = match scheme.grouping {
        ColorGrouping::Label => lookup.label(name),
        ColorGrouping::Bucket => lookup.bucket(name),
        ColorGrouping::None => None,
    };

    match group_key {
        Some(_) if scheme.alternate => alternate_hue(index),
        Some(key) => hashed_hue(key),
        None => hashed_hue(name),
    }
}

/// Sequential hue for alternate mode
pub fn alternate_hue(index: usize) -> f64 {
    let degrees = (HUE_STEP * index as u64) % 360;
    degrees as f64 / 360.0
}

/// Stable hue derived from the SHA-256 digest of `text`
pub fn hashed_hue(text: &str) -> f64 {
    digest_mod_360(text) as f64 / 360.0
}

fn digest_mod_360(text: &str) -> u32 {
    let digest = Sha256::digest(text.as_bytes());
    digest
        .iter()
        .fold(0u32, |acc, byte| (acc * 256 + u32::from(*byte)) % 360)
}

/// Convert hue/lightness/saturation (all in `[0, 1]`) to RGB
pub fn hls_to_color(hue: f64, lightness: f64, saturation: f64) -> Color {
    let (r, g, b) = hls_to_rgb(hue, lightness, saturation);
    Color::from_unit_rgb(r, g, b)
}

/// HLS to unit-interval RGB
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
