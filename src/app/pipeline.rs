//! Shared analysis pipeline used by every front-end.
//!
//! fetch (or read) -> parse -> normalize -> detect
//!
//! Each stage takes the previous stage's output by reference and returns new
//! data; nothing is shared or mutated between stages. Front-ends only present
//! a finished [`RunOutput`].

use tracing::info;

use crate::analysis::{InversionReport, detect_inversions};
use crate::data::{RaobClient, ReportSource};
use crate::domain::{HeightBand, NormalizedRecord, RunConfig, STATION_CODE, SoundingProfile};
use crate::error::{AppError, SoundingError};
use crate::io::report::parse_report;
use crate::math::normalize;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub profile: SoundingProfile,
    pub levels: Vec<NormalizedRecord>,
    pub bands: Vec<HeightBand>,
    pub inversions: InversionReport,
}

/// Execute the full pipeline for the configured station.
pub fn run_analysis(config: &RunConfig) -> Result<RunOutput, AppError> {
    let output = match &config.input {
        Some(path) => {
            info!(path = %path.display(), "reading saved report");
            let body = std::fs::read_to_string(path).map_err(|e| {
                AppError::new(2, format!("Failed to read report '{}': {e}", path.display()))
            })?;
            analyze_report(&body, config)?
        }
        None => {
            let client = RaobClient::from_env()?;
            run_with_source(&client, config)?
        }
    };
    Ok(output)
}

/// Fetch from `source`, then analyze. A failed fetch returns before parsing.
pub fn run_with_source<S: ReportSource>(
    source: &S,
    config: &RunConfig,
) -> Result<RunOutput, SoundingError> {
    let body = source.fetch_latest(STATION_CODE)?;
    analyze_report(&body, config)
}

/// Analyze an already-retrieved report body.
pub fn analyze_report(body: &str, config: &RunConfig) -> Result<RunOutput, SoundingError> {
    let profile = parse_report(body, config.preamble)?;
    info!(records = profile.len(), "parsed sounding");

    let levels = normalize(&profile);

    let bands = HeightBand::standard();
    let inversions = detect_inversions(&profile, &bands, config.scope)?;
    info!(
        scope = config.scope.display_name(),
        inverted = inversions.inverted_bands().count(),
        "inversion detection complete"
    );

    Ok(RunOutput {
        profile,
        levels,
        bands,
        inversions,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use reqwest::StatusCode;

    use super::*;
    use crate::data::raob::ensure_success;
    use crate::domain::PreambleRule;
    use crate::test_data::SAMPLE_REPORT;

    struct StubSource {
        result: Result<String, SoundingError>,
        calls: Cell<usize>,
    }

    impl ReportSource for StubSource {
        fn fetch_latest(&self, station: &str) -> Result<String, SoundingError> {
            assert_eq!(station, STATION_CODE);
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    #[test]
    fn failed_fetch_aborts_before_parsing() {
        let source = StubSource {
            result: Err(SoundingError::Fetch { status: 500 }),
            calls: Cell::new(0),
        };
        let err = run_with_source(&source, &RunConfig::default()).unwrap_err();
        assert_eq!(err, SoundingError::Fetch { status: 500 });
        assert_eq!(source.calls.get(), 1);
    }

    /// Answers every request with a fixed HTTP status and body.
    struct StatusSource {
        status: StatusCode,
        body: &'static str,
        calls: Cell<usize>,
    }

    impl ReportSource for StatusSource {
        fn fetch_latest(&self, _station: &str) -> Result<String, SoundingError> {
            self.calls.set(self.calls.get() + 1);
            ensure_success(self.status)?;
            Ok(self.body.to_string())
        }
    }

    #[test]
    fn server_error_status_aborts_the_run() {
        let source = StatusSource {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: SAMPLE_REPORT,
            calls: Cell::new(0),
        };
        let err = run_with_source(&source, &RunConfig::default()).unwrap_err();
        assert_eq!(err, SoundingError::Fetch { status: 500 });
        assert_eq!(err.exit_code(), 4);
        assert_eq!(source.calls.get(), 1);

        let ok = StatusSource {
            status: StatusCode::OK,
            ..source
        };
        assert_eq!(run_with_source(&ok, &RunConfig::default()).unwrap().profile.len(), 37);
    }

    #[test]
    fn successful_fetch_runs_every_stage() {
        let source = StubSource {
            result: Ok(SAMPLE_REPORT.to_string()),
            calls: Cell::new(0),
        };
        let run = run_with_source(&source, &RunConfig::default()).unwrap();
        assert_eq!(run.profile.len(), 37);
        assert_eq!(run.levels.len(), run.profile.len());
        assert_eq!(run.inversions.bands.len(), run.bands.len());
        assert_eq!(run.inversions.inverted_bands().count(), 3);
    }

    #[test]
    fn unusable_preamble_surfaces_parse_error() {
        let config = RunConfig {
            preamble: PreambleRule::Fixed(SAMPLE_REPORT.len() + 1),
            ..RunConfig::default()
        };
        let err = analyze_report(SAMPLE_REPORT, &config).unwrap_err();
        assert!(matches!(err, SoundingError::Parse(_)));
    }
}
