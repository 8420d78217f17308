//! Lap chart data pipeline.
//!
//! Turns the raw laps of up to two drivers into a [`ChartDataset`]: laps
//! aligned by lap number, outlier rows flagged, the Y domain fitted to the
//! displayed data and the best lap located. The pipeline is a pure function
//! of its inputs; the dataset is rebuilt from scratch whenever the selected
//! drivers, their laps, the outlier toggle or the viewport width change.
//!
//! ## Stages
//!
//! - [`timing`] - lap time strings and numbers to seconds
//! - [`series`] - raw laps to normalized per-driver series
//! - [`align`] - per-driver series to one row per lap number
//! - [`outliers`] - median and the 115% outlier rule
//! - [`scale`] - Y domain and chart geometry
//! - [`best_lap`] - fastest lap, deltas and head-to-head gaps

pub mod align;
pub mod best_lap;
pub mod outliers;
pub mod scale;
pub mod series;
pub mod timing;

use serde::Serialize;

pub use align::{align, AlignedRow, LapCell};
pub use best_lap::{compare_pair, delta, BestLap, LapComparison};
pub use outliers::{median, OUTLIER_THRESHOLD};
pub use scale::{Breakpoint, ChartLayout, YDomain};
pub use series::{build_series, DriverInfo, DriverSeries, NormalizedLap};
pub use timing::{parse_lap_time, parse_time_str};

use crate::api::types::RawLap;

/// Inputs of a chart recomputation besides the lap data
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartOptions {
    /// Hide outlier rows and keep them out of the Y scale
    pub exclude_outliers: bool,
    /// Width of the chart's container in pixels
    pub viewport_width: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            exclude_outliers: true,
            viewport_width: scale::DEFAULT_VIEWPORT_WIDTH,
        }
    }
}

/// Everything the renderer needs to draw the lap chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    /// Charted drivers, in series order (row cells follow this order)
    pub drivers: Vec<DriverInfo>,
    /// Every aligned row, outliers included
    pub rows: Vec<AlignedRow>,
    pub y_domain: YDomain,
    /// Fastest valid time over every lap record, duplicates included
    pub best_lap_seconds: Option<f64>,
    /// Row holding the fastest time, for the reference marker
    pub best_lap: Option<BestLap>,
    pub median: Option<f64>,
    pub outlier_count: usize,
    pub exclude_outliers: bool,
    pub layout: ChartLayout,
}

impl ChartDataset {
    /// Rows the chart actually plots under the current outlier toggle
    pub fn display_rows(&self) -> impl Iterator<Item = &AlignedRow> + '_ {
        self.rows
            .iter()
            .filter(|row| !scale::is_excluded(row, self.exclude_outliers))
    }

    pub fn display_count(&self) -> usize {
        self.display_rows().count()
    }

    pub fn has_outliers(&self) -> bool {
        self.outlier_count > 0
    }

    /// Whether any driver has at least one valid lap time
    pub fn has_data(&self) -> bool {
        self.rows.iter().any(AlignedRow::has_valid_time)
    }

    pub fn best_lap_seconds(&self) -> Option<f64> {
        self.best_lap_seconds
    }

    /// The best-lap reference line is only drawn for a single driver
    pub fn show_best_lap_marker(&self) -> bool {
        self.drivers.len() == 1 && self.best_lap.is_some()
    }

    /// Lap numbers of the first and last displayed rows
    pub fn x_domain(&self) -> Option<(u32, u32)> {
        let mut laps = self.display_rows().map(|row| row.lap);
        let first = laps.next()?;
        let last = laps.last().unwrap_or(first);
        Some((first, last))
    }
}

/// Build the chart dataset from already-normalized driver series
pub fn build_chart(series: &[DriverSeries], options: ChartOptions) -> ChartDataset {
    let mut rows = align(series);

    let all_valid = outliers::all_valid_times(series);
    let median = outliers::median(&all_valid);
    outliers::classify(&mut rows, median);
    let outlier_count = outliers::outlier_count(&rows);

    let y_domain = scale::compute_domain(&rows, options.exclude_outliers, &all_valid);
    let best_lap_seconds = best_lap::best_lap_seconds(&all_valid);
    let best_lap = best_lap::find_best_lap(&rows, best_lap_seconds);

    let display_count = rows
        .iter()
        .filter(|row| !scale::is_excluded(row, options.exclude_outliers))
        .count();
    let layout = ChartLayout::new(options.viewport_width, display_count);

    tracing::debug!(
        "Built lap chart: {} drivers, {} rows, {} outliers, median {:?}",
        series.len(),
        rows.len(),
        outlier_count,
        median
    );

    ChartDataset {
        drivers: series.iter().map(|s| s.driver.clone()).collect(),
        rows,
        y_domain,
        best_lap_seconds,
        best_lap,
        median,
        outlier_count,
        exclude_outliers: options.exclude_outliers,
        layout,
    }
}

/// Build the chart dataset straight from fetched laps
pub fn build_chart_from_raw(drivers: &[(DriverInfo, &[RawLap])], options: ChartOptions) -> ChartDataset {
    let series: Vec<DriverSeries> = drivers
        .iter()
        .map(|(driver, laps)| build_series(driver, laps))
        .collect();
    build_chart(&series, options)
}
