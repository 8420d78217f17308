//! Median-based outlier detection for lap times.
//!
//! A lap is an outlier when it is more than 15% slower than the median of
//! every valid lap currently compared. The flag is per row: one slow lap by
//! either driver hides the whole row from the "exclude outliers" view.

use super::align::AlignedRow;
use super::series::DriverSeries;

/// Factor over the median above which a lap is an outlier
pub const OUTLIER_THRESHOLD: f64 = 1.15;

/// Every valid lap time across all series, duplicates included
pub fn all_valid_times(series: &[DriverSeries]) -> Vec<f64> {
    series.iter().flat_map(|s| s.valid_times()).collect()
}

/// Median of the values; `None` when empty
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[middle - 1] + sorted[middle]) / 2.0)
    } else {
        Some(sorted[middle])
    }
}

/// Time above which a lap counts as an outlier
pub fn cutoff(median: f64) -> f64 {
    median * OUTLIER_THRESHOLD
}

/// Set `is_outlier` on every row.
///
/// Rows with no valid time, or any row when there is no median, are never
/// outliers.
pub fn classify(rows: &mut [AlignedRow], median: Option<f64>) {
    for row in rows.iter_mut() {
        row.is_outlier = match median {
            Some(m) => row.valid_values().any(|(_, seconds)| seconds > cutoff(m)),
            None => false,
        };
    }
}

/// Number of rows flagged as outliers
pub fn outlier_count(rows: &[AlignedRow]) -> usize {
    rows.iter().filter(|row| row.is_outlier).count()
}
