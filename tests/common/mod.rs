//! Common test utilities shared across all test modules
//!
//! Fixture builders for lap payloads and drivers, plus an in-memory
//! [`FakeSource`] standing in for the backend.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use lapview::analysis::{build_series, DriverInfo, DriverSeries};
use lapview::api::{
    ApiError, Driver, DriverLaps, DriverPosition, Event, F1DataSource, F1Session, RawLap,
    SessionResult, TeamColors, TimeValue,
};

/// A timed lap with no extra attributes
pub fn lap(lap_number: u32, seconds: f64) -> RawLap {
    RawLap {
        lap_number,
        time: Some(TimeValue::Seconds(seconds)),
        speed_trap: None,
        compound: None,
        is_pit_out_lap: false,
    }
}

/// A lap timed with a `m:ss.sss` string
pub fn text_lap(lap_number: u32, time: &str) -> RawLap {
    RawLap {
        lap_number,
        time: Some(TimeValue::Text(time.to_string())),
        speed_trap: None,
        compound: None,
        is_pit_out_lap: false,
    }
}

/// A lap without timing
pub fn untimed_lap(lap_number: u32) -> RawLap {
    RawLap {
        lap_number,
        time: None,
        speed_trap: None,
        compound: None,
        is_pit_out_lap: false,
    }
}

/// Consecutive laps numbered from 1
pub fn laps_from(times: &[f64]) -> Vec<RawLap> {
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| lap(i as u32 + 1, t))
        .collect()
}

pub fn driver(driver_number: u32, first_name: &str, last_name: &str, team: &str) -> Driver {
    Driver {
        driver_number,
        session_key: Some(9158),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        name_acronym: last_name.chars().take(3).collect::<String>().to_uppercase(),
        team: Some(team.to_string()),
        headshot_url: String::new(),
    }
}

pub fn verstappen() -> Driver {
    driver(1, "Max", "Verstappen", "Red Bull Racing")
}

pub fn hamilton() -> Driver {
    driver(44, "Lewis", "Hamilton", "Mercedes")
}

pub fn leclerc() -> Driver {
    driver(16, "Charles", "Leclerc", "Ferrari")
}

pub fn series(number: u32, last_name: &str, laps: &[RawLap]) -> DriverSeries {
    build_series(&DriverInfo::new(number, "Test", last_name), laps)
}

pub fn session(session_key: u32, meeting_key: u32, name: &str) -> F1Session {
    F1Session {
        session_key,
        meeting_key,
        location: "Sakhir".to_string(),
        session_type: name.to_string(),
        session_name: name.to_string(),
        date: "2024-03-02T15:00:00".to_string(),
    }
}

pub fn event(meeting_key: u32, year: i32) -> Event {
    Event {
        meeting_key,
        circuit_key: Some(63),
        location: "Sakhir".to_string(),
        country_name: "Bahrain".to_string(),
        circuit_name: "Sakhir".to_string(),
        meeting_official_name: "FORMULA 1 GULF AIR BAHRAIN GRAND PRIX 2024".to_string(),
        year,
    }
}

pub fn team_colors() -> TeamColors {
    HashMap::from([
        ("Red Bull Racing".to_string(), "#3671C6".to_string()),
        ("Mercedes".to_string(), "#27F4D2".to_string()),
        ("Ferrari".to_string(), "#E8002D".to_string()),
    ])
}

/// A unique scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lapview-test-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// In-memory backend with switchable failures
#[derive(Default)]
pub struct FakeSource {
    pub years: Vec<i32>,
    pub events: HashMap<i32, Vec<Event>>,
    pub sessions: HashMap<u32, Vec<F1Session>>,
    pub drivers: HashMap<u32, Vec<Driver>>,
    pub laps: HashMap<(u32, u32), Vec<RawLap>>,
    pub results: HashMap<u32, SessionResult>,
    pub colors: TeamColors,
    /// Endpoints that answer with a server error
    pub failing: HashSet<&'static str>,
    /// Lap requests served, as (session, driver)
    pub lap_calls: RefCell<Vec<(u32, u32)>>,
}

impl FakeSource {
    /// One 2024 event with a race session and three drivers
    pub fn bahrain() -> Self {
        let mut source = FakeSource {
            years: vec![2023, 2024],
            colors: team_colors(),
            ..Default::default()
        };
        source.events.insert(2024, vec![event(1229, 2024)]);
        source.sessions.insert(
            1229,
            vec![session(9157, 1229, "Qualifying"), session(9158, 1229, "Race")],
        );
        source
            .drivers
            .insert(9158, vec![verstappen(), hamilton(), leclerc()]);
        source
            .laps
            .insert((9158, 1), laps_from(&[95.1, 94.2, 94.0, 110.9]));
        source
            .laps
            .insert((9158, 44), laps_from(&[96.0, 94.8, 94.4, 94.6]));
        source.laps.insert((9158, 16), laps_from(&[95.5, 94.9]));
        source.results.insert(
            9158,
            SessionResult {
                event_name: "Bahrain Grand Prix".to_string(),
                result: vec![DriverPosition {
                    position: Some(1),
                    team: "Red Bull Racing".to_string(),
                    first_name: "Max".to_string(),
                    last_name: "Verstappen".to_string(),
                    number_of_laps: 57,
                    gap_to_leader: None,
                    duration: Some(5504.742),
                    dnf: false,
                    dns: false,
                    dsq: false,
                }],
            },
        );
        source
    }

    pub fn fail(mut self, endpoint: &'static str) -> Self {
        self.failing.insert(endpoint);
        self
    }

    fn check(&self, endpoint: &'static str) -> Result<(), ApiError> {
        if self.failing.contains(endpoint) {
            return Err(ApiError::ApiResponseError {
                status: 500,
                message: format!("{} unavailable", endpoint),
            });
        }
        Ok(())
    }
}

impl F1DataSource for FakeSource {
    fn years(&self) -> Result<Vec<i32>, ApiError> {
        self.check("years")?;
        Ok(self.years.clone())
    }

    fn events(&self, year: i32) -> Result<Vec<Event>, ApiError> {
        self.check("events")?;
        Ok(self.events.get(&year).cloned().unwrap_or_default())
    }

    fn sessions(&self, meeting_key: u32) -> Result<Vec<F1Session>, ApiError> {
        self.check("sessions")?;
        Ok(self.sessions.get(&meeting_key).cloned().unwrap_or_default())
    }

    fn drivers(&self, session_key: u32) -> Result<Vec<Driver>, ApiError> {
        self.check("drivers")?;
        Ok(self.drivers.get(&session_key).cloned().unwrap_or_default())
    }

    fn driver_laps(&self, session_key: u32, driver_number: u32) -> Result<DriverLaps, ApiError> {
        self.lap_calls.borrow_mut().push((session_key, driver_number));
        self.check("laps")?;
        let driver = self
            .drivers
            .get(&session_key)
            .and_then(|ds| ds.iter().find(|d| d.driver_number == driver_number));
        Ok(DriverLaps {
            driver_number,
            first_name: driver.map(|d| d.first_name.clone()).unwrap_or_default(),
            last_name: driver.map(|d| d.last_name.clone()).unwrap_or_default(),
            team: driver.and_then(|d| d.team.clone()),
            headshot_url: String::new(),
            laps: self
                .laps
                .get(&(session_key, driver_number))
                .cloned()
                .unwrap_or_default(),
        })
    }

    fn session_result(&self, session_key: u32) -> Result<SessionResult, ApiError> {
        self.check("result")?;
        Ok(self.results.get(&session_key).cloned().unwrap_or_default())
    }

    fn team_colors(&self) -> Result<TeamColors, ApiError> {
        self.check("colors")?;
        Ok(self.colors.clone())
    }
}
