//! Band-wise inversion detection.
//!
//! For each height band:
//!
//! 1. select the records whose height lies inside the closed band;
//! 2. take the highest of them as the band top (first occurrence wins ties);
//! 3. find the coldest temperature at or before the band top, looking either at
//!    the whole profile prefix (`MinimumScope::Prefix`) or only at in-band
//!    records (`MinimumScope::Band`); the first occurrence wins ties;
//! 4. the band is inverted unless the coldest record *is* the band top.
//!
//! With the prefix scope a cold layer anywhere below a band (for example a
//! chilled surface) marks every band above it as inverted until the profile
//! cools past it again. `NaN` heights never fall inside a band and `NaN`
//! temperatures are never the coldest.

use serde::Serialize;
use tracing::debug;

use crate::domain::{HeightBand, MinimumScope, SoundingProfile, SoundingRecord};
use crate::error::SoundingError;

/// Detector output for one band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandInversion {
    pub band: HeightBand,
    /// Profile index of the highest record inside the band.
    pub top_index: usize,
    /// Profile index of the coldest record within the search scope.
    pub coldest_index: usize,
    pub inverted: bool,
}

/// Per-band results, index-aligned with the band list they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InversionReport {
    pub scope: MinimumScope,
    pub bands: Vec<BandInversion>,
}

impl InversionReport {
    /// One flag per band, in band order.
    pub fn flags(&self) -> Vec<bool> {
        self.bands.iter().map(|b| b.inverted).collect()
    }

    pub fn inverted_bands(&self) -> impl Iterator<Item = &BandInversion> {
        self.bands.iter().filter(|b| b.inverted)
    }

    pub fn any_inverted(&self) -> bool {
        self.bands.iter().any(|b| b.inverted)
    }
}

/// Flag every band. The first band that cannot be evaluated aborts the run.
pub fn detect_inversions(
    profile: &SoundingProfile,
    bands: &[HeightBand],
    scope: MinimumScope,
) -> Result<InversionReport, SoundingError> {
    let records = profile.records();
    let mut out = Vec::with_capacity(bands.len());

    for band in bands {
        let top_index = band_top_index(records, band).ok_or(SoundingError::EmptyBand {
            lower_m: band.lower_m,
            upper_m: band.upper_m,
        })?;

        let candidates = records[..=top_index]
            .iter()
            .enumerate()
            .filter(|(_, r)| scope == MinimumScope::Prefix || band.contains(r.height));
        let coldest_index = coldest_index(candidates).ok_or(SoundingError::MissingTemperature {
            lower_m: band.lower_m,
            upper_m: band.upper_m,
        })?;

        let inverted = coldest_index != top_index;
        debug!(
            band = %band.label(),
            top_index,
            coldest_index,
            inverted,
            "evaluated band"
        );

        out.push(BandInversion {
            band: *band,
            top_index,
            coldest_index,
            inverted,
        });
    }

    Ok(InversionReport { scope, bands: out })
}

/// Index of the highest in-band record; ties resolve to the earliest record.
fn band_top_index(records: &[SoundingRecord], band: &HeightBand) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, r) in records.iter().enumerate() {
        if !band.contains(r.height) {
            continue;
        }
        match best {
            Some((_, h)) if r.height <= h => {}
            _ => best = Some((i, r.height)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the lowest finite temperature; ties resolve to the earliest record.
fn coldest_index<'a>(
    candidates: impl Iterator<Item = (usize, &'a SoundingRecord)>,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, r) in candidates {
        if r.temperature.is_nan() {
            continue;
        }
        match best {
            Some((_, t)) if r.temperature >= t => {}
            _ => best = Some((i, r.temperature)),
        }
    }
    best.map(|(i, _)| i)
}
