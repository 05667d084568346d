use raob_inversions::analysis::detect_inversions;
use raob_inversions::app::pipeline::analyze_report;
use raob_inversions::domain::{HeightBand, MinimumScope, PreambleRule, RunConfig};
use raob_inversions::io::export::{write_analysis_json, write_table_csv};
use raob_inversions::io::report::parse_report;
use raob_inversions::plot::{profile_chart, render_ascii_profile};
use raob_inversions::report::{format_bands, format_table};

const REPORT: &str = include_str!("data/alb_latest.txt");

#[test]
fn saved_report_flags_surface_and_mid_level_inversions() {
    let run = analyze_report(REPORT, &RunConfig::default()).unwrap();

    assert_eq!(run.profile.len(), 37);
    assert_eq!(
        run.inversions.flags(),
        vec![true, false, false, false, true, false, false, true, false]
    );

    let bands = format_bands(&run.inversions);
    assert_eq!(bands.lines().filter(|l| l.ends_with("Inversion")).count(), 3);

    let table = format_table(&run.levels);
    assert_eq!(table.lines().count(), 2 + 37);
}

#[test]
fn both_scopes_agree_on_a_monotonic_sounding() {
    let profile = parse_report(REPORT, PreambleRule::DataLines).unwrap();
    let bands = HeightBand::standard();

    let prefix = detect_inversions(&profile, &bands, MinimumScope::Prefix).unwrap();
    let band = detect_inversions(&profile, &bands, MinimumScope::Band).unwrap();

    assert_eq!(prefix.flags(), band.flags());
    let tops: Vec<usize> = band.bands.iter().map(|b| b.top_index).collect();
    assert_eq!(tops, vec![4, 7, 12, 15, 18, 21, 22, 26, 29]);
    assert_eq!(band.bands[4].coldest_index, 17);
}

#[test]
fn ascii_chart_labels_each_inverted_band() {
    let run = analyze_report(REPORT, &RunConfig::default()).unwrap();
    let chart = profile_chart(&run.levels, &run.inversions);
    let txt = render_ascii_profile(&chart, 100, 40);

    assert!(txt.starts_with("Plot: temp="));
    assert_eq!(txt.matches("Inversion").count(), 3);
}

#[test]
fn exports_land_on_disk() {
    let run = analyze_report(REPORT, &RunConfig::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("sounding.csv");
    let json_path = dir.path().join("analysis.json");
    write_table_csv(&csv_path, &run.levels).unwrap();
    write_analysis_json(&json_path, &run).unwrap();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 1 + 37);

    let text = std::fs::read_to_string(&json_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["header"]["station_id"], "ALB");
}
