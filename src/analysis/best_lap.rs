//! Best lap, per-lap deltas and head-to-head gaps.

use serde::Serialize;

use super::align::AlignedRow;

/// Fastest valid lap across all compared drivers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestLap {
    pub lap: u32,
    pub seconds: f64,
    /// Index of the driver who set it, in chart series order
    pub driver_index: usize,
}

/// Minimum of the valid lap times
pub fn best_lap_seconds(all_valid_times: &[f64]) -> Option<f64> {
    all_valid_times.iter().copied().reduce(f64::min)
}

/// Locate the best lap: the first row, by ascending lap number, where any
/// driver posted exactly `best_seconds`.
pub fn find_best_lap(rows: &[AlignedRow], best_seconds: Option<f64>) -> Option<BestLap> {
    let best = best_seconds?;
    rows.iter().find_map(|row| {
        row.valid_values()
            .find(|&(_, seconds)| seconds == best)
            .map(|(driver_index, seconds)| BestLap {
                lap: row.lap,
                seconds,
                driver_index,
            })
    })
}

/// Gap from the best lap; never negative
pub fn delta(seconds: f64, best_seconds: f64) -> f64 {
    (seconds - best_seconds).max(0.0)
}

/// Gap between the two drivers on one lap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LapComparison {
    pub faster_index: usize,
    pub slower_index: usize,
    pub gap: f64,
}

/// Compare the row's drivers when exactly two of them have a valid time.
///
/// On a tie the second driver is reported as faster.
pub fn compare_pair(row: &AlignedRow) -> Option<LapComparison> {
    let values: Vec<(usize, f64)> = row.valid_values().collect();
    let [(first, v1), (second, v2)] = values.as_slice() else {
        return None;
    };

    let (faster_index, slower_index) = if v1 < v2 {
        (*first, *second)
    } else {
        (*second, *first)
    };

    Some(LapComparison {
        faster_index,
        slower_index,
        gap: (v1 - v2).abs(),
    })
}
