//! Exports of a finished run.
//!
//! - `write_table_csv`: one row per record, native and derived fields; missing
//!   values are empty cells
//! - `write_analysis_json`: header metadata plus one entry per band

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::analysis::BandInversion;
use crate::app::pipeline::RunOutput;
use crate::domain::{MinimumScope, NormalizedRecord, ReportHeader, STATION_CODE};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct TableRow {
    index: usize,
    record_type: Option<u16>,
    pressure: Option<f64>,
    height_m: Option<f64>,
    temperature: Option<f64>,
    dew_point: Option<f64>,
    wind_direction: Option<f64>,
    wind_speed: Option<f64>,
    temperature_c: Option<f64>,
    temperature_f: Option<f64>,
    height_ft: Option<f64>,
}

impl TableRow {
    fn new(index: usize, level: &NormalizedRecord) -> Self {
        let r = &level.record;
        Self {
            index,
            record_type: r.record_type,
            pressure: finite(r.pressure),
            height_m: finite(r.height),
            temperature: finite(r.temperature),
            dew_point: finite(r.dew_point),
            wind_direction: finite(r.wind_direction),
            wind_speed: finite(r.wind_speed),
            temperature_c: finite(level.temperature_c),
            temperature_f: finite(level.temperature_f),
            height_ft: finite(level.height_ft),
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// JSON analysis document.
#[derive(Debug, Serialize)]
struct AnalysisDocument<'a> {
    tool: &'static str,
    station: &'static str,
    header: &'a ReportHeader,
    records: usize,
    scope: MinimumScope,
    bands: &'a [BandInversion],
}

/// Write the sounding table to a CSV file.
pub fn write_table_csv(path: &Path, levels: &[NormalizedRecord]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    let mut writer = csv::Writer::from_writer(file);

    for (i, level) in levels.iter().enumerate() {
        writer
            .serialize(TableRow::new(i, level))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))?;

    Ok(())
}

/// Write header metadata and band results to a JSON file.
pub fn write_analysis_json(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create analysis JSON '{}': {e}", path.display()))
    })?;

    let doc = AnalysisDocument {
        tool: "raob",
        station: STATION_CODE,
        header: run.profile.header(),
        records: run.profile.len(),
        scope: run.inversions.scope,
        bands: &run.inversions.bands,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write analysis JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::analyze_report;
    use crate::domain::RunConfig;
    use crate::test_data::SAMPLE_REPORT;

    #[test]
    fn csv_has_one_row_per_record_and_blank_missing_cells() {
        let run = analyze_report(SAMPLE_REPORT, &RunConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");

        write_table_csv(&path, &run.levels).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "index");
        assert_eq!(&headers[10], "height_ft");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), run.levels.len());

        let missing = run
            .levels
            .iter()
            .position(|l| l.record.temperature.is_nan())
            .unwrap();
        assert_eq!(&rows[missing][4], "");
        assert_eq!(&rows[missing][9], "");
    }

    #[test]
    fn json_lists_every_band() {
        let run = analyze_report(SAMPLE_REPORT, &RunConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");

        write_analysis_json(&path, &run).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["station"], "72518");
        assert_eq!(doc["scope"], "prefix");
        assert_eq!(doc["records"], 37);

        let bands = doc["bands"].as_array().unwrap();
        assert_eq!(bands.len(), 9);
        assert_eq!(bands[0]["inverted"], true);
        assert_eq!(bands[0]["band"]["lower_m"], 0.0);
        assert_eq!(bands[1]["inverted"], false);
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("table.csv");
        let err = write_table_csv(&path, &[]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
