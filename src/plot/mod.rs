//! Chart preparation shared by every renderer.
//!
//! Series and bounds are computed here, outside any drawing call, so the SVG
//! charts, the ASCII chart and the TUI chart all show the same thing:
//!
//! - profile chart: °F (x) vs feet (y), inverted bands shaded across the full
//!   x-range
//! - raw chart: tenths °C (x) vs meters (y), capped at 8000 m

use crate::analysis::InversionReport;
use crate::domain::NormalizedRecord;
use crate::math::meters_to_feet;

pub mod ascii;
pub mod chart;

pub use ascii::render_ascii_profile;
pub use chart::write_svg_charts;

/// Top of the profile chart: 8000 m in feet.
pub const PROFILE_Y_MAX_FT: f64 = 26246.72;
/// Top of the raw chart, meters.
pub const RAW_Y_MAX_M: f64 = 8000.0;
/// Padding added to each side of the °F range.
pub const X_PAD_F: f64 = 7.0;
/// The °F range covers the profile prefix up to the highest record at or
/// below this height.
pub const X_RANGE_TOP_M: f64 = 10_000.0;

/// A band to shade on the profile chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedBand {
    pub band_index: usize,
    pub lower_ft: f64,
    pub upper_ft: f64,
    pub rgb: (u8, u8, u8),
}

impl ShadedBand {
    pub fn mid_ft(&self) -> f64 {
        (self.lower_ft + self.upper_ft) / 2.0
    }
}

/// Everything needed to draw the profile chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileChart {
    /// `(temp_f, height_ft)` points with `NaN` rows removed, in profile order.
    pub line: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub shaded: Vec<ShadedBand>,
}

impl ProfileChart {
    pub fn x_mid(&self) -> f64 {
        (self.x_bounds[0] + self.x_bounds[1]) / 2.0
    }
}

/// Everything needed to draw the raw-units chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChart {
    /// `(temperature tenths °C, height m)` points.
    pub line: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

pub fn profile_chart(levels: &[NormalizedRecord], inversions: &InversionReport) -> ProfileChart {
    let line = levels
        .iter()
        .map(|l| (l.temperature_f, l.height_ft))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let x_bounds = fahrenheit_bounds(levels)
        .map(|(lo, hi)| [lo - X_PAD_F, hi + X_PAD_F])
        .unwrap_or([-40.0, 100.0]);

    let n_bands = inversions.bands.len();
    let shaded = inversions
        .bands
        .iter()
        .enumerate()
        .filter(|(_, b)| b.inverted)
        .map(|(i, b)| ShadedBand {
            band_index: i,
            lower_ft: meters_to_feet(b.band.lower_m),
            upper_ft: meters_to_feet(b.band.upper_m),
            rgb: band_color(i, n_bands),
        })
        .collect();

    ProfileChart {
        line,
        x_bounds,
        y_bounds: [0.0, PROFILE_Y_MAX_FT],
        shaded,
    }
}

pub fn raw_chart(levels: &[NormalizedRecord]) -> RawChart {
    let line: Vec<(f64, f64)> = levels
        .iter()
        .map(|l| (l.record.temperature, l.record.height))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in &line {
        if y <= RAW_Y_MAX_M {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
        }
    }
    let x_bounds = if x_min.is_finite() && x_max.is_finite() && x_max > x_min {
        let (lo, hi) = pad_range(x_min, x_max, 0.05);
        [lo, hi]
    } else {
        [-400.0, 400.0]
    };

    RawChart {
        line,
        x_bounds,
        y_bounds: [0.0, RAW_Y_MAX_M],
    }
}

/// Min/max °F over the profile prefix ending at the highest record with a
/// height in `[0, X_RANGE_TOP_M]`.
pub fn fahrenheit_bounds(levels: &[NormalizedRecord]) -> Option<(f64, f64)> {
    let mut top: Option<(usize, f64)> = None;
    for (i, l) in levels.iter().enumerate() {
        let h = l.record.height;
        if !(0.0..=X_RANGE_TOP_M).contains(&h) {
            continue;
        }
        match top {
            Some((_, best)) if h <= best => {}
            _ => top = Some((i, h)),
        }
    }
    let (top_index, _) = top?;

    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for l in &levels[..=top_index] {
        if l.temperature_f.is_finite() {
            lo = lo.min(l.temperature_f);
            hi = hi.max(l.temperature_f);
        }
    }
    (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
}

/// Red at the bottom band shading to yellow at the top.
pub fn band_color(index: usize, n_bands: usize) -> (u8, u8, u8) {
    let u = if n_bands == 0 {
        0.0
    } else {
        index as f64 / n_bands as f64
    };
    (255, (255.0 * u.clamp(0.0, 1.0)).round() as u8, 0)
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}
