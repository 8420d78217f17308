//! Presentation helpers for the lap chart and tables.
//!
//! Everything here turns pipeline values into strings and style choices for
//! whatever renders them (the CLI tables, or a chart front end consuming the
//! JSON dataset).

use serde::Serialize;

use crate::analysis::{compare_pair, delta, AlignedRow, ChartDataset, DriverInfo, LapCell};
use crate::analysis::outliers::OUTLIER_THRESHOLD;
use crate::api::types::TeamColors;

/// Line colors used when a team has no known color
pub const FALLBACK_LINE_COLORS: &[&str] = &["#8884d8", "#82ca9d"];

/// Color for anything without a better match
pub const NEUTRAL_COLOR: &str = "#999999";

/// Best-lap marker and head-to-head text color
pub const HIGHLIGHT_COLOR: &str = "#00C49F";

/// Dash pattern of the second driver's line
pub const SECOND_LINE_DASH: &str = "5 5";

/// Format seconds as `m:ss.sss`; `N/A` when there is no time
pub fn format_lap_time(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return "N/A".to_string();
    };
    let minutes = (seconds / 60.0).floor() as i64;
    let secs = seconds % 60.0;
    format!("{}:{:06.3}", minutes, secs)
}

/// Format a session duration as `h:mm:ss.sss`, or `m:ss.sss` under an hour
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.abs();
    let hours = (total / 3600.0).floor() as u64;
    let minutes = ((total % 3600.0) / 60.0).floor() as u64;
    let secs = total % 60.0;
    let sign = if seconds < 0.0 { "-" } else { "" };

    if hours > 0 {
        format!("{}{}:{:02}:{:06.3}", sign, hours, minutes, secs)
    } else {
        format!("{}{}:{:06.3}", sign, minutes, secs)
    }
}

/// Y axis tick label: `m:ss.s`, or `s.ss` with an `s` suffix under a minute
pub fn format_axis_tick(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as i64;
    let secs = seconds % 60.0;
    if minutes > 0 {
        format!("{}:{:04.1}", minutes, secs)
    } else {
        format!("{:.1}s", secs)
    }
}

/// Gap to the best lap, e.g. `+1.100s`
pub fn format_delta(delta: f64) -> String {
    format!("+{:.3}s", delta)
}

/// Last word of a display name
pub fn surname(full_name: &str) -> &str {
    full_name.split_whitespace().last().unwrap_or(full_name)
}

/// Head-to-head line, e.g. `Norris 0.214s faster`
pub fn comparison_text(faster_name: &str, gap: f64) -> String {
    format!("{} {:.3}s faster", surname(faster_name), gap)
}

/// Tyre compound as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl Compound {
    /// Classify a free-form compound label ("SOFT", "C3 soft", ...)
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Compound::Unknown;
        };
        let label = label.to_lowercase();
        if label.contains("soft") {
            Compound::Soft
        } else if label.contains("medium") {
            Compound::Medium
        } else if label.contains("hard") {
            Compound::Hard
        } else if label.contains("intermediate") {
            Compound::Intermediate
        } else if label.contains("wet") {
            Compound::Wet
        } else {
            Compound::Unknown
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Compound::Soft => "#DA291C",
            Compound::Medium => "#FFCD00",
            Compound::Hard => "#F0F0F0",
            Compound::Intermediate => "#43B02A",
            Compound::Wet => "#0067A5",
            Compound::Unknown => NEUTRAL_COLOR,
        }
    }
}

/// Stroke of one driver's line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    /// SVG-style dash array; `None` for a solid line
    pub dash: Option<&'static str>,
}

/// Line style for the driver at `index`: team color when known, otherwise a
/// fallback palette color. The second line is dashed.
pub fn line_style(index: usize, team: Option<&str>, team_colors: Option<&TeamColors>) -> LineStyle {
    let team_color = team.and_then(|t| team_colors?.get(t)).cloned();
    let color = team_color.unwrap_or_else(|| {
        FALLBACK_LINE_COLORS
            .get(index)
            .copied()
            .unwrap_or(NEUTRAL_COLOR)
            .to_string()
    });

    LineStyle {
        color,
        dash: (index == 1).then_some(SECOND_LINE_DASH),
    }
}

/// Marker drawn for one lap of one driver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotStyle {
    pub radius: u32,
    pub fill: &'static str,
    /// White ring around pit-out laps
    pub stroke: Option<&'static str>,
    pub stroke_width: u32,
}

/// Marker for a lap cell; `None` when the lap has no time to plot
pub fn dot_style(cell: &LapCell) -> Option<DotStyle> {
    cell.seconds?;
    let pit_out = cell.pit_out;
    Some(DotStyle {
        radius: 4,
        fill: Compound::from_label(cell.compound.as_deref()).color(),
        stroke: pit_out.then_some("#ffffff"),
        stroke_width: if pit_out { 2 } else { 0 },
    })
}

/// Legend entry for one driver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub driver_number: u32,
    pub name: String,
    pub style: LineStyle,
}

/// Legend for a comparison chart. Empty for a single driver or when team
/// colors are unavailable.
pub fn legend(drivers: &[DriverInfo], team_colors: Option<&TeamColors>) -> Vec<LegendEntry> {
    if drivers.len() <= 1 || team_colors.is_none() {
        return Vec::new();
    }

    drivers
        .iter()
        .enumerate()
        .map(|(i, driver)| LegendEntry {
            driver_number: driver.driver_number,
            name: driver.display_name(),
            style: line_style(i, driver.team.as_deref(), team_colors),
        })
        .collect()
}

/// One driver's block in a tooltip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipEntry {
    pub driver_name: String,
    pub color: String,
    pub time: String,
    pub delta: Option<String>,
    pub compound: String,
    pub pit_out: bool,
}

/// Hover details for one lap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub entries: Vec<TooltipEntry>,
    pub comparison: Option<String>,
    /// Only shown when a single driver is charted
    pub speed_trap: Option<String>,
    pub is_outlier: bool,
}

impl Tooltip {
    pub fn for_row(dataset: &ChartDataset, row: &AlignedRow, team_colors: Option<&TeamColors>) -> Self {
        let best = dataset.best_lap_seconds();

        let entries = row
            .valid_values()
            .filter_map(|(index, seconds)| {
                let driver = dataset.drivers.get(index)?;
                let cell = row.cell(index)?;
                Some(TooltipEntry {
                    driver_name: driver.display_name(),
                    color: line_style(index, driver.team.as_deref(), team_colors).color,
                    time: format_lap_time(Some(seconds)),
                    delta: best.map(|b| format_delta(delta(seconds, b))),
                    compound: cell.compound.clone().unwrap_or_else(|| "N/A".to_string()),
                    pit_out: cell.pit_out,
                })
            })
            .collect();

        let comparison = compare_pair(row).and_then(|cmp| {
            let faster = dataset.drivers.get(cmp.faster_index)?;
            Some(comparison_text(&faster.display_name(), cmp.gap))
        });

        let speed_trap = (dataset.drivers.len() == 1).then(|| match row.shared_speed_trap() {
            Some(speed) if speed != 0.0 => format!("Speed Trap: {} km/h", speed),
            _ => "Speed Trap: N/A km/h".to_string(),
        });

        Self {
            title: format!("Lap {}", row.lap),
            entries,
            comparison,
            speed_trap,
            is_outlier: row.is_outlier,
        }
    }

    /// Plain text lines, top to bottom
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        for entry in &self.entries {
            lines.push(format!("{}: {}", entry.driver_name, entry.time));
            if let Some(delta) = &entry.delta {
                lines.push(format!("Delta: {}", delta));
            }
            lines.push(format!("Compound: {}", entry.compound));
            if entry.pit_out {
                lines.push("Pit Out Lap".to_string());
            }
        }
        if let Some(comparison) = &self.comparison {
            lines.push(comparison.clone());
        }
        if let Some(speed_trap) = &self.speed_trap {
            lines.push(speed_trap.clone());
        }
        if self.is_outlier {
            lines.push("Marked as outlier".to_string());
        }
        lines
    }
}

/// Outlier counter shown next to the toggle
pub fn outlier_badge(outlier_count: usize, excluded: bool) -> String {
    if outlier_count == 0 {
        return "No outliers detected".to_string();
    }
    let plural = if outlier_count > 1 { "s" } else { "" };
    let hidden = if excluded { " (hidden)" } else { "" };
    format!("{} outlier{} detected{}", outlier_count, plural, hidden)
}

/// Explains the outlier rule, e.g. `Threshold: +15% above median`
pub fn threshold_info() -> String {
    format!(
        "Threshold: +{:.0}% above median",
        (OUTLIER_THRESHOLD - 1.0) * 100.0
    )
}

/// Note shown above the chart
pub fn chart_note(dataset: &ChartDataset) -> String {
    let summary = if dataset.exclude_outliers {
        format!(
            "Showing {} laps with outliers hidden. Scale optimized for regular lap times.",
            dataset.display_count()
        )
    } else {
        format!("Showing all {} laps.", dataset.rows.len())
    };
    format!("{} Scroll horizontally to view all data.", summary)
}

/// Panel heading for the current driver selection
pub fn header_text(drivers: &[DriverInfo]) -> String {
    match drivers {
        [] => "Lap Data Comparison".to_string(),
        [driver] => format!("Lap Data for {}", driver.display_name()),
        _ => format!(
            "Lap Data Comparison: {}",
            drivers
                .iter()
                .map(DriverInfo::display_name)
                .collect::<Vec<_>>()
                .join(" vs ")
        ),
    }
}
