//! Error types.
//!
//! Two layers:
//!
//! - [`SoundingError`]: typed failures of the fetch/parse/detect pipeline, so
//!   callers (and tests) can match on what went wrong.
//! - [`AppError`]: the binary-facing error, a message plus a process exit code.
//!
//! Exit codes: `2` local I/O, `3` unusable data, `4` network/terminal.

use thiserror::Error;

/// Failures while turning the raw report into text records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("preamble offset {offset} is outside the {len}-byte report")]
    PreambleOutOfRange { offset: usize, len: usize },
    #[error("no data section found after the report header")]
    NoDataSection,
    #[error("report contains no complete 7-field records")]
    NoRecords,
}

/// Pipeline failure. Every variant is fatal to the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SoundingError {
    #[error("sounding request failed with status {status}")]
    Fetch { status: u16 },
    #[error("sounding request failed: {0}")]
    Network(String),
    #[error("failed to parse sounding report: {0}")]
    Parse(#[from] ParseError),
    #[error("no sounding records between {lower_m} m and {upper_m} m")]
    EmptyBand { lower_m: f64, upper_m: f64 },
    #[error("no valid temperature for the {lower_m}-{upper_m} m band")]
    MissingTemperature { lower_m: f64, upper_m: f64 },
}

impl SoundingError {
    pub fn exit_code(&self) -> u8 {
        match self {
            SoundingError::Fetch { .. } | SoundingError::Network(_) => 4,
            SoundingError::Parse(_)
            | SoundingError::EmptyBand { .. }
            | SoundingError::MissingTemperature { .. } => 3,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SoundingError> for AppError {
    fn from(err: SoundingError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
