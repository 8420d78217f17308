//! Y axis domain and chart sizing.

use serde::Serialize;

use super::align::AlignedRow;

/// Seconds of headroom above and below the plotted times
pub const DOMAIN_PADDING: f64 = 1.0;

/// Widest chart the renderer is asked to draw, in pixels
pub const MAX_CHART_WIDTH: u32 = 4000;

/// Width assumed when the host has not reported one yet
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 800;

/// Y axis range of the lap chart.
///
/// Stored inverted (`max` first) because faster laps plot towards the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YDomain {
    Fixed { max: f64, min: f64 },
    /// No valid times; the renderer picks its own range
    Auto,
}

impl YDomain {
    /// `[max, min]`, or `None` for an automatic domain
    pub fn as_array(&self) -> Option<[f64; 2]> {
        match self {
            YDomain::Fixed { max, min } => Some([*max, *min]),
            YDomain::Auto => None,
        }
    }
}

/// Whether a row is left out of the scale and the displayed data
pub fn is_excluded(row: &AlignedRow, exclude_outliers: bool) -> bool {
    exclude_outliers && row.is_outlier
}

/// Compute the inverted Y domain.
///
/// Uses the valid times of rows that are not excluded; if that leaves
/// nothing, falls back to `all_valid_times`; if that is empty too the domain
/// is automatic.
pub fn compute_domain(rows: &[AlignedRow], exclude_outliers: bool, all_valid_times: &[f64]) -> YDomain {
    let scale_times: Vec<f64> = rows
        .iter()
        .filter(|row| !is_excluded(row, exclude_outliers))
        .flat_map(|row| row.valid_values().map(|(_, seconds)| seconds))
        .collect();

    let times = if scale_times.is_empty() {
        all_valid_times
    } else {
        &scale_times
    };

    if times.is_empty() {
        return YDomain::Auto;
    }

    let min_time = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max_time = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    YDomain::Fixed {
        max: (max_time + DOMAIN_PADDING).ceil(),
        min: (min_time - DOMAIN_PADDING).floor().max(0.0),
    }
}

/// Viewport size classes the chart layout steps through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    /// 360px and below
    SmallPhone,
    /// 768px and below
    Mobile,
    Desktop,
}

impl Breakpoint {
    pub fn for_width(viewport_width: u32) -> Self {
        let width = effective_width(viewport_width);
        if width <= 360 {
            Breakpoint::SmallPhone
        } else if width <= 768 {
            Breakpoint::Mobile
        } else {
            Breakpoint::Desktop
        }
    }

    /// Horizontal pixels per lap
    pub fn point_spacing(&self) -> u32 {
        match self {
            Breakpoint::SmallPhone => 28,
            Breakpoint::Mobile => 36,
            Breakpoint::Desktop => 60,
        }
    }

    /// Minimum share of the viewport the chart fills
    pub fn fill_factor(&self) -> f64 {
        match self {
            Breakpoint::SmallPhone | Breakpoint::Mobile => 0.9,
            Breakpoint::Desktop => 0.8,
        }
    }

    pub fn chart_height(&self) -> u32 {
        match self {
            Breakpoint::SmallPhone => 260,
            Breakpoint::Mobile => 300,
            Breakpoint::Desktop => 460,
        }
    }

    pub fn margins(&self) -> Margins {
        match self {
            Breakpoint::SmallPhone | Breakpoint::Mobile => Margins {
                top: 12,
                right: 20,
                bottom: 12,
                left: 32,
            },
            Breakpoint::Desktop => Margins {
                top: 20,
                right: 30,
                bottom: 20,
                left: 40,
            },
        }
    }
}

/// Plot margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Pixel geometry handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartLayout {
    pub breakpoint: Breakpoint,
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
}

impl ChartLayout {
    pub fn new(viewport_width: u32, displayed_rows: usize) -> Self {
        let breakpoint = Breakpoint::for_width(viewport_width);
        Self {
            breakpoint,
            width: chart_width(viewport_width, displayed_rows),
            height: breakpoint.chart_height(),
            margins: breakpoint.margins(),
        }
    }
}

fn effective_width(viewport_width: u32) -> u32 {
    if viewport_width == 0 {
        DEFAULT_VIEWPORT_WIDTH
    } else {
        viewport_width
    }
}

/// Chart width in pixels: enough room per lap, at least a share of the
/// viewport, never more than [`MAX_CHART_WIDTH`].
pub fn chart_width(viewport_width: u32, displayed_rows: usize) -> u32 {
    let breakpoint = Breakpoint::for_width(viewport_width);
    let by_points = (breakpoint.point_spacing() as u64).saturating_mul(displayed_rows as u64);
    let by_viewport = (effective_width(viewport_width) as f64 * breakpoint.fill_factor()).floor() as u64;

    by_points.max(by_viewport).min(MAX_CHART_WIDTH as u64) as u32
}
