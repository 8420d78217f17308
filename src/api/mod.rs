//! Lap data backend integration.
//!
//! The backend serves the session hierarchy (years, events, sessions,
//! drivers), per-driver laps, session results and team colors as JSON.
//! [`F1DataSource`] is the seam the dashboard controller depends on;
//! [`ApiClient`] implements it over HTTP.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lapview::api::{ApiClient, F1DataSource};
//!
//! let client = ApiClient::new("http://localhost:8000");
//! for year in client.years()? {
//!     println!("{}", year);
//! }
//! ```

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError};
pub use types::{
    Driver, DriverLaps, DriverPosition, Event, F1Session, RawLap, SessionResult, TeamColors,
    TimeValue,
};

/// Source of session data and laps
pub trait F1DataSource {
    /// Seasons with data
    fn years(&self) -> Result<Vec<i32>, ApiError>;

    /// Events of a season
    fn events(&self, year: i32) -> Result<Vec<Event>, ApiError>;

    /// Sessions of an event
    fn sessions(&self, meeting_key: u32) -> Result<Vec<F1Session>, ApiError>;

    /// Drivers taking part in a session
    fn drivers(&self, session_key: u32) -> Result<Vec<Driver>, ApiError>;

    /// Every lap of one driver in a session
    fn driver_laps(&self, session_key: u32, driver_number: u32) -> Result<DriverLaps, ApiError>;

    /// Final classification of a session
    fn session_result(&self, session_key: u32) -> Result<SessionResult, ApiError>;

    /// Team name to line color
    fn team_colors(&self) -> Result<TeamColors, ApiError>;
}
