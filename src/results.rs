//! Session result and lap tables.

use serde::Serialize;

use crate::analysis::timing::{parse_lap_time, NO_DATA_SENTINEL};
use crate::api::types::{DriverLaps, DriverPosition, SessionResult, TimeValue};
use crate::format::{format_duration, format_lap_time};

/// One line of the session classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// Empty for unclassified drivers
    pub position: String,
    pub driver: String,
    pub team: String,
    /// Race time for the winner, gap for everyone else
    pub gap: String,
    /// Lap count, or the retirement status
    pub laps: String,
}

impl From<&DriverPosition> for ResultRow {
    fn from(entry: &DriverPosition) -> Self {
        let gap = if entry.position == Some(1) {
            entry.duration.map(format_duration).unwrap_or_default()
        } else {
            format_gap(entry.gap_to_leader.as_ref())
        };

        Self {
            position: entry.position.map(|p| p.to_string()).unwrap_or_default(),
            driver: format!("{} {}", entry.first_name, entry.last_name),
            team: entry.team.clone(),
            gap,
            laps: driver_status(entry),
        }
    }
}

/// Gap to the leader: seconds become `+12.500s`, text (e.g. `+1 LAP`) is kept
pub fn format_gap(gap: Option<&TimeValue>) -> String {
    match gap {
        Some(TimeValue::Seconds(seconds)) => format!("+{:.3}s", seconds),
        Some(TimeValue::Text(text)) => text.clone(),
        None => String::new(),
    }
}

/// Laps column: `57`, `23 (DNF)`, `DNS` or `DSQ`
pub fn driver_status(entry: &DriverPosition) -> String {
    if entry.dnf {
        format!("{} (DNF)", entry.number_of_laps)
    } else if entry.dns {
        "DNS".to_string()
    } else if entry.dsq {
        "DSQ".to_string()
    } else {
        entry.number_of_laps.to_string()
    }
}

/// Rows of the classification table, in the order the backend sent them
pub fn result_rows(result: &SessionResult) -> Vec<ResultRow> {
    result.result.iter().map(ResultRow::from).collect()
}

/// One line of a single driver's lap table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapTableRow {
    pub lap: u32,
    /// `0:00.000` when the lap has no timing
    pub time: String,
    pub speed_trap: String,
    pub compound: String,
    pub pit_out: &'static str,
}

/// Rows of the lap table for one driver, in received order
pub fn lap_table_rows(laps: &DriverLaps) -> Vec<LapTableRow> {
    laps.laps
        .iter()
        .map(|lap| {
            let time = match parse_lap_time(lap.time.as_ref()) {
                Some(seconds) => format_lap_time(Some(seconds)),
                None => NO_DATA_SENTINEL.to_string(),
            };
            LapTableRow {
                lap: lap.lap_number,
                time,
                speed_trap: lap.speed_trap.map(|s| s.to_string()).unwrap_or_default(),
                compound: lap.compound.clone().unwrap_or_default(),
                pit_out: if lap.is_pit_out_lap { "Yes" } else { "No" },
            }
        })
        .collect()
}
