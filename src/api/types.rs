//! Payload types returned by the lap data backend.
//!
//! These mirror the JSON the backend serves; fields the backend may leave
//! out are defaulted so a sparse payload still deserializes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A time value as the backend sends it: seconds, or a `m:ss.sss` string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Seconds(f64),
    Text(String),
}

impl From<f64> for TimeValue {
    fn from(seconds: f64) -> Self {
        TimeValue::Seconds(seconds)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        TimeValue::Text(text.to_string())
    }
}

/// One lap as fetched for a driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLap {
    pub lap_number: u32,
    #[serde(default)]
    pub time: Option<TimeValue>,
    #[serde(default)]
    pub speed_trap: Option<f64>,
    #[serde(default)]
    pub compound: Option<String>,
    #[serde(default)]
    pub is_pit_out_lap: bool,
}

/// A race weekend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub meeting_key: u32,
    #[serde(default)]
    pub circuit_key: Option<u32>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub circuit_name: String,
    #[serde(default)]
    pub meeting_official_name: String,
    pub year: i32,
}

/// A timed track activity within an event (practice, qualifying, race)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct F1Session {
    pub session_key: u32,
    pub meeting_key: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub session_type: String,
    #[serde(default)]
    pub session_name: String,
    #[serde(default)]
    pub date: String,
}

impl F1Session {
    /// A session known only by its key
    pub fn from_key(session_key: u32) -> Self {
        Self {
            session_key,
            meeting_key: 0,
            location: String::new(),
            session_type: String::new(),
            session_name: String::new(),
            date: String::new(),
        }
    }
}

/// A driver taking part in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_number: u32,
    #[serde(default)]
    pub session_key: Option<u32>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub name_acronym: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub headshot_url: String,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// All laps of one driver in one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverLaps {
    pub driver_number: u32,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub headshot_url: String,
    #[serde(default)]
    pub laps: Vec<RawLap>,
}

/// Classification entry of a session result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverPosition {
    /// Missing for drivers who did not start or were disqualified
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub team: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, alias = "num_of_laps")]
    pub number_of_laps: u32,
    #[serde(default)]
    pub gap_to_leader: Option<TimeValue>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub dnf: bool,
    #[serde(default)]
    pub dns: bool,
    #[serde(default)]
    pub dsq: bool,
}

/// Final classification of a session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionResult {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub result: Vec<DriverPosition>,
}

/// Team name to display color (e.g. `"#3671C6"`)
pub type TeamColors = HashMap<String, String>;
