//! NOAA RAOB sounding endpoint.
//!
//! Query parameters are documented at
//! <https://rucsoundings.noaa.gov/text_sounding_query_parameters.pdf>; the
//! report layout at <https://rucsoundings.noaa.gov/raob_format.html>.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::info;

use crate::error::SoundingError;

const BASE_URL: &str = "https://rucsoundings.noaa.gov/get_soundings.cgi";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can hand back the latest raw report for a station.
pub trait ReportSource {
    fn fetch_latest(&self, station: &str) -> Result<String, SoundingError>;
}

pub struct RaobClient {
    client: Client,
    base_url: String,
}

impl RaobClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SoundingError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SoundingError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Uses `RAOB_BASE_URL` (environment or `.env`) when set.
    pub fn from_env() -> Result<Self, SoundingError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("RAOB_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
        Self::new(base_url)
    }
}

impl ReportSource for RaobClient {
    fn fetch_latest(&self, station: &str) -> Result<String, SoundingError> {
        info!(station, url = %self.base_url, "fetching latest sounding");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("start", "latest"), ("airport", station)])
            .send()
            .map_err(|e| SoundingError::Network(e.to_string()))?;

        ensure_success(resp.status())?;

        let body = resp
            .text()
            .map_err(|e| SoundingError::Network(format!("failed to read response body: {e}")))?;
        info!(bytes = body.len(), "received sounding report");
        Ok(body)
    }
}

/// Reject any non-2xx status before the body is looked at.
pub fn ensure_success(status: StatusCode) -> Result<(), SoundingError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(SoundingError::Fetch {
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_status_carries_code() {
        assert_eq!(
            ensure_success(StatusCode::NOT_FOUND),
            Err(SoundingError::Fetch { status: 404 })
        );
        assert_eq!(
            ensure_success(StatusCode::SERVICE_UNAVAILABLE),
            Err(SoundingError::Fetch { status: 503 })
        );
        assert_eq!(ensure_success(StatusCode::OK), Ok(()));
    }
}
