//! Formatted terminal output: run summary, band table and the sounding table.
//!
//! Formatting lives in one place so the analysis code stays free of
//! presentation concerns and output changes stay localized.

use crate::analysis::InversionReport;
use crate::domain::{NormalizedRecord, ReportHeader, STATION_CODE, STATION_LABEL};

/// Title line plus header metadata.
pub fn format_run_summary(header: &ReportHeader, n_records: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Current RAOB sounding: {STATION_LABEL}, plotted for temperature inversion ===\n"
    ));
    out.push_str(&format!(
        "Station: {} (WMO {})\n",
        header.station_id.as_deref().unwrap_or("-"),
        header.wmo_id.as_deref().unwrap_or(STATION_CODE),
    ));
    match header.valid_at {
        Some(t) => out.push_str(&format!("Valid: {}Z\n", t.format("%Y-%m-%d %H:%M"))),
        None => out.push_str("Valid: -\n"),
    }
    if let (Some(lat), Some(lon)) = (header.latitude, header.longitude) {
        out.push_str(&format!("Location: {lat:.2}, {lon:.2}"));
        if let Some(elev) = header.elevation_m {
            out.push_str(&format!(" | elevation {elev:.0} m"));
        }
        out.push('\n');
    }
    out.push_str(&format!("Records: {n_records}\n"));

    out
}

/// One line per band with its flag and the indices that decided it.
pub fn format_bands(report: &InversionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Inversion bands (coldest point searched over {}):\n",
        report.scope.display_name()
    ));
    out.push_str(
        format!("{:<14} {:>6} {:>8} {:<9}\n", "band", "top", "coldest", "flag").trim_end(),
    );
    out.push('\n');
    out.push_str(&format!("{:-<14} {:-<6} {:-<8} {:-<9}\n", "", "", "", "").trim_end());
    out.push('\n');

    for b in &report.bands {
        let flag = if b.inverted { "Inversion" } else { "-" };
        out.push_str(
            format!(
                "{:<14} {:>6} {:>8} {:<9}\n",
                b.band.label(),
                b.top_index,
                b.coldest_index,
                flag
            )
            .trim_end(),
        );
        out.push('\n');
    }
    if !report.any_inverted() {
        out.push_str("No inversion in any band.\n");
    }

    out
}

/// The full sounding table: native fields followed by derived units.
pub fn format_table(levels: &[NormalizedRecord]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>5} {:>5} {:>9} {:>7} {:>6} {:>6} {:>8} {:>8} {:>7} {:>7} {:>9}\n",
            "#",
            "type",
            "pressure",
            "height",
            "temp",
            "dewpt",
            "wind dir",
            "wind spd",
            "temp_c",
            "temp_f",
            "height_ft"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<5} {:-<5} {:-<9} {:-<7} {:-<6} {:-<6} {:-<8} {:-<8} {:-<7} {:-<7} {:-<9}\n",
            "", "", "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, level) in levels.iter().enumerate() {
        let r = &level.record;
        out.push_str(
            format!(
                "{:>5} {:>5} {:>9} {:>7} {:>6} {:>6} {:>8} {:>8} {:>7} {:>7} {:>9}\n",
                i,
                r.record_type.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string()),
                fmt_value(r.pressure, 0),
                fmt_value(r.height, 0),
                fmt_value(r.temperature, 0),
                fmt_value(r.dew_point, 0),
                fmt_value(r.wind_direction, 0),
                fmt_value(r.wind_speed, 0),
                fmt_value(level.temperature_c, 1),
                fmt_value(level.temperature_f, 1),
                fmt_value(level.height_ft, 0),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// `NaN` renders as `-`.
pub fn fmt_value(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{v:.decimals$}")
    }
}
