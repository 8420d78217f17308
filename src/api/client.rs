//! HTTP client for the lap data backend.

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{Driver, DriverLaps, Event, F1Session, SessionResult, TeamColors};
use super::F1DataSource;

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// User agent for API requests
const USER_AGENT: &str = concat!("LapView/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when fetching from the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network error during request
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Backend returned an error response
    #[error("API error (status {status}): {message}")]
    ApiResponseError { status: u16, message: String },

    /// Failed to parse the response body
    #[error("Parse error: {0}")]
    ParseError(String),
}

// ============================================================================
// Client
// ============================================================================

/// Blocking JSON client for the backend endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path (which starts with `/`)
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let mut response = ureq::get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => ApiError::ApiResponseError {
                    status,
                    message: format!("HTTP {}", status),
                },
                _ => ApiError::NetworkError(e.to_string()),
            })?;

        response
            .body_mut()
            .read_json()
            .map_err(|e| ApiError::ParseError(e.to_string()))
    }
}

impl F1DataSource for ApiClient {
    fn years(&self) -> Result<Vec<i32>, ApiError> {
        self.get_json("/events/years/")
    }

    fn events(&self, year: i32) -> Result<Vec<Event>, ApiError> {
        self.get_json(&format!("/events/{}", year))
    }

    fn sessions(&self, meeting_key: u32) -> Result<Vec<F1Session>, ApiError> {
        self.get_json(&format!("/sessions/{}", meeting_key))
    }

    fn drivers(&self, session_key: u32) -> Result<Vec<Driver>, ApiError> {
        self.get_json(&format!("/drivers/{}", session_key))
    }

    fn driver_laps(&self, session_key: u32, driver_number: u32) -> Result<DriverLaps, ApiError> {
        self.get_json(&format!("/laps/{}/{}", session_key, driver_number))
    }

    fn session_result(&self, session_key: u32) -> Result<SessionResult, ApiError> {
        self.get_json(&format!("/session_result/{}", session_key))
    }

    fn team_colors(&self) -> Result<TeamColors, ApiError> {
        self.get_json("/teams/")
    }
}
