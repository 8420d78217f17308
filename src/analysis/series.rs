//! Per-driver lap series.

use serde::Serialize;

use super::timing::parse_lap_time;
use crate::api::types::{Driver, RawLap};

/// Identity of a charted driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverInfo {
    pub driver_number: u32,
    pub first_name: String,
    pub last_name: String,
    pub team: Option<String>,
}

impl DriverInfo {
    pub fn new(driver_number: u32, first_name: &str, last_name: &str) -> Self {
        Self {
            driver_number,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            team: None,
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Name shown in the legend and tooltips
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<&Driver> for DriverInfo {
    fn from(driver: &Driver) -> Self {
        Self {
            driver_number: driver.driver_number,
            first_name: driver.first_name.clone(),
            last_name: driver.last_name.clone(),
            team: driver.team.clone(),
        }
    }
}

/// A lap with its time resolved to seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedLap {
    pub lap: u32,
    /// `None` when the lap has no usable timing
    pub seconds: Option<f64>,
    pub speed_trap: Option<f64>,
    pub compound: Option<String>,
    pub pit_out: bool,
}

impl From<&RawLap> for NormalizedLap {
    fn from(raw: &RawLap) -> Self {
        Self {
            lap: raw.lap_number,
            seconds: parse_lap_time(raw.time.as_ref()),
            speed_trap: raw.speed_trap,
            compound: raw.compound.clone(),
            pit_out: raw.is_pit_out_lap,
        }
    }
}

/// All laps of one driver, in the order they were received
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverSeries {
    pub driver: DriverInfo,
    pub laps: Vec<NormalizedLap>,
}

impl DriverSeries {
    /// Valid lap times of this driver, in lap order as received
    pub fn valid_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.laps.iter().filter_map(|lap| lap.seconds)
    }

    /// First lap record carrying the given lap number
    pub fn find_lap(&self, lap_number: u32) -> Option<&NormalizedLap> {
        self.laps.iter().find(|lap| lap.lap == lap_number)
    }
}

/// Normalize a driver's raw laps. One output lap per input lap, order kept.
pub fn build_series(driver: &DriverInfo, raw_laps: &[RawLap]) -> DriverSeries {
    DriverSeries {
        driver: driver.clone(),
        laps: raw_laps.iter().map(NormalizedLap::from).collect(),
    }
}
