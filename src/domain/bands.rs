//! Fixed height bands used to localize inversion detection.

use serde::{Deserialize, Serialize};

/// Band boundaries in meters. Adjacent pairs form the 9 bands.
pub const BAND_BOUNDARIES_M: [f64; 10] = [
    0.0, 500.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0, 7000.0, 8000.0,
];

/// Closed height interval `[lower_m, upper_m]`.
///
/// Neighbouring bands share their boundary, so a record exactly on a boundary
/// belongs to both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightBand {
    pub lower_m: f64,
    pub upper_m: f64,
}

impl HeightBand {
    pub const fn new(lower_m: f64, upper_m: f64) -> Self {
        Self { lower_m, upper_m }
    }

    /// The 9 configured bands, bottom to top.
    pub fn standard() -> Vec<HeightBand> {
        BAND_BOUNDARIES_M
            .windows(2)
            .map(|w| HeightBand::new(w[0], w[1]))
            .collect()
    }

    /// `NaN` heights are never contained.
    pub fn contains(&self, height_m: f64) -> bool {
        height_m >= self.lower_m && height_m <= self.upper_m
    }

    pub fn label(&self) -> String {
        format!("{:.0}-{:.0} m", self.lower_m, self.upper_m)
    }
}
