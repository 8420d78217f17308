//! Lap time parsing.
//!
//! Lap times arrive either as plain seconds or as `m:ss.sss` strings. The
//! backend uses `0:00.000` to mean "no timing for this lap", which must not be
//! read as a zero-second lap. Nothing here fails: every malformed input
//! degrades to `None`.

use regex::Regex;
use std::sync::LazyLock;

use crate::api::types::TimeValue;

/// Time string the backend sends when it has no timing for a lap
pub const NO_DATA_SENTINEL: &str = "0:00.000";

/// Leading integer of a string, ignoring leading whitespace
static INT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("Invalid regex pattern"));

/// Leading decimal number of a string, ignoring leading whitespace
static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("Invalid regex pattern")
});

/// Parse a lap time value into seconds.
///
/// Returns `None` for absent values, the no-data sentinel, zero, non-finite
/// numbers and unparsable strings.
pub fn parse_lap_time(value: Option<&TimeValue>) -> Option<f64> {
    match value? {
        TimeValue::Seconds(seconds) => {
            if *seconds == 0.0 || !seconds.is_finite() {
                None
            } else {
                Some(*seconds)
            }
        }
        TimeValue::Text(text) => parse_time_str(text),
    }
}

/// Parse a lap time string (`m:ss.sss` or bare seconds) into seconds
pub fn parse_time_str(text: &str) -> Option<f64> {
    if text.is_empty() || text == NO_DATA_SENTINEL {
        return None;
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() == 2 {
        let minutes = leading_int(parts[0]).unwrap_or(0) as f64;
        let seconds = leading_float(parts[1]).unwrap_or(0.0);
        return Some(minutes * 60.0 + seconds);
    }

    leading_float(text)
}

fn leading_int(text: &str) -> Option<i64> {
    INT_PREFIX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn leading_float(text: &str) -> Option<f64> {
    FLOAT_PREFIX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
