//! Merging driver series into one lap-indexed table.

use serde::Serialize;
use std::collections::BTreeSet;

use super::series::{DriverSeries, NormalizedLap};

/// One driver's data on an aligned row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapCell {
    /// `None` means the driver has this lap but no usable time
    pub seconds: Option<f64>,
    pub compound: Option<String>,
    pub speed_trap: Option<f64>,
    pub pit_out: bool,
}

impl From<&NormalizedLap> for LapCell {
    fn from(lap: &NormalizedLap) -> Self {
        Self {
            seconds: lap.seconds,
            compound: lap.compound.clone(),
            speed_trap: lap.speed_trap,
            pit_out: lap.pit_out,
        }
    }
}

/// All drivers' data for a single lap number.
///
/// `cells` is parallel to the driver series the row was aligned from; a
/// `None` cell means that driver has no record for this lap at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow {
    pub lap: u32,
    pub cells: Vec<Option<LapCell>>,
    pub is_outlier: bool,
}

impl AlignedRow {
    /// Valid time of the driver at `index`, if any
    pub fn value(&self, index: usize) -> Option<f64> {
        self.cells.get(index)?.as_ref()?.seconds
    }

    pub fn cell(&self, index: usize) -> Option<&LapCell> {
        self.cells.get(index)?.as_ref()
    }

    /// Whether the driver at `index` has no record for this lap
    pub fn is_absent(&self, index: usize) -> bool {
        self.cell(index).is_none()
    }

    /// `(driver index, seconds)` for every driver with a valid time
    pub fn valid_values(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref()?.seconds.map(|s| (i, s)))
    }

    pub fn has_valid_time(&self) -> bool {
        self.valid_values().next().is_some()
    }

    /// Speed trap of the last driver that has this lap.
    ///
    /// Matches renderers that expect a single speed trap per lap.
    pub fn shared_speed_trap(&self) -> Option<f64> {
        self.cells.iter().rev().flatten().next()?.speed_trap
    }

    /// Pit-out flag of the last driver that has this lap
    pub fn shared_pit_out(&self) -> bool {
        self.cells
            .iter()
            .rev()
            .flatten()
            .next()
            .is_some_and(|cell| cell.pit_out)
    }
}

/// Align driver series on lap number.
///
/// Produces one row per distinct lap number across all series, ascending.
/// When a driver reports the same lap number twice, the first record wins.
pub fn align(series: &[DriverSeries]) -> Vec<AlignedRow> {
    let lap_numbers: BTreeSet<u32> = series
        .iter()
        .flat_map(|s| s.laps.iter().map(|lap| lap.lap))
        .collect();

    lap_numbers
        .into_iter()
        .map(|lap| AlignedRow {
            lap,
            cells: series
                .iter()
                .map(|s| s.find_lap(lap).map(LapCell::from))
                .collect(),
            is_outlier: false,
        })
        .collect()
}
