//! Shared domain types.
//!
//! Measurement fields are `f64` throughout. A value the report does not carry
//! (non-numeric token or the `99999` sentinel) is stored as `NaN`, and every
//! downstream computation either propagates or skips it explicitly.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Station whose latest sounding is fetched (Albany, NY).
pub const STATION_CODE: &str = "72518";

/// Human-readable label for titles.
pub const STATION_LABEL: &str = "Albany Airport (ALB)";

/// One 7-field row of the report, in native units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundingRecord {
    /// Line-type code (4 mandatory, 5 significant, 6 wind, 7 tropopause,
    /// 8 max wind, 9 surface). `None` when the token is not an integer.
    pub record_type: Option<u16>,
    /// Pressure, tenths of hPa.
    pub pressure: f64,
    /// Height, meters.
    pub height: f64,
    /// Temperature, tenths of °C.
    pub temperature: f64,
    /// Dew point, tenths of °C.
    pub dew_point: f64,
    /// Wind direction, degrees.
    pub wind_direction: f64,
    /// Wind speed in the report's wind units.
    pub wind_speed: f64,
}

/// Metadata found in the report header. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub valid_at: Option<NaiveDateTime>,
    pub wmo_id: Option<String>,
    pub station_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation_m: Option<f64>,
    pub wind_units: Option<String>,
}

/// An ordered, non-empty sounding in report order.
///
/// Records are never re-sorted; the detector relies on report order.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundingProfile {
    header: ReportHeader,
    records: Vec<SoundingRecord>,
}

impl SoundingProfile {
    /// Returns `None` for an empty record list.
    pub fn new(header: ReportHeader, records: Vec<SoundingRecord>) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        Some(Self { header, records })
    }

    pub fn header(&self) -> &ReportHeader {
        &self.header
    }

    pub fn records(&self) -> &[SoundingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A record plus the unit conversions used for presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRecord {
    pub record: SoundingRecord,
    pub temperature_c: f64,
    pub temperature_f: f64,
    pub height_ft: f64,
}

/// Where the detector looks for the coldest temperature of a band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MinimumScope {
    /// Every record from the start of the profile through the band top.
    #[default]
    Prefix,
    /// Only records inside the band, through the band top.
    Band,
}

impl MinimumScope {
    pub fn display_name(self) -> &'static str {
        match self {
            MinimumScope::Prefix => "profile prefix",
            MinimumScope::Band => "within band",
        }
    }
}

/// How the report header is skipped before tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreambleRule {
    /// Skip exactly this many bytes of extracted text.
    Fixed(usize),
    /// Skip everything before the first line that is a complete data record.
    DataLines,
}

/// Byte length of the header block in the report layout the station served
/// when the fixed-offset rule was measured.
pub const LEGACY_PREAMBLE_LEN: usize = 408;

impl PreambleRule {
    /// `Fixed` at [`LEGACY_PREAMBLE_LEN`].
    pub const fn legacy() -> Self {
        PreambleRule::Fixed(LEGACY_PREAMBLE_LEN)
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Parse this saved report instead of fetching.
    pub input: Option<PathBuf>,
    pub preamble: PreambleRule,
    pub scope: MinimumScope,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: None,
            preamble: PreambleRule::DataLines,
            scope: MinimumScope::Prefix,
        }
    }
}
