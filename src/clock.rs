//! Time-of-day parsing and 12-hour formatting

use crate::error::MetricsError;
use crate::types::ClockTime;
use std::str::FromStr;

impl FromStr for ClockTime {
    type Err = MetricsError;

    /// Parse `H:MM`, `HH:MM` or `HH:MM:SS` (seconds are dropped)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();

        let (hour, minute) = match parts.as_slice() {
            [hour, minute] => (*hour, *minute),
            [hour, minute, seconds] => {
                if !is_digits(seconds, 2, 2) {
                    return Err(MetricsError::TimeParseError(format!(
                        "invalid seconds in {trimmed:?}"
                    )));
                }
                (*hour, *minute)
            }
            _ => {
                return Err(MetricsError::TimeParseError(format!(
                    "expected HH:MM, got {trimmed:?}"
                )))
            }
        };

        if !is_digits(hour, 1, 2) || !is_digits(minute, 2, 2) {
            return Err(MetricsError::TimeParseError(format!(
                "expected HH:MM, got {trimmed:?}"
            )));
        }

        // Both parts are short digit runs, so these parses cannot overflow
        let hour: u32 = hour
            .parse()
            .map_err(|_| MetricsError::TimeParseError(trimmed.to_string()))?;
        let minute: u32 = minute
            .parse()
            .map_err(|_| MetricsError::TimeParseError(trimmed.to_string()))?;

        ClockTime::new(hour, minute)
    }
}

fn is_digits(s: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a raw time field.
///
/// Blank input means the field was left empty and yields `Ok(None)`.
/// Malformed text is a parse error and out-of-range parts are
/// [`MetricsError::InvalidInput`].
pub fn parse_clock_time(raw: &str) -> Result<Option<ClockTime>, MetricsError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some)
}

/// Render a time in 12-hour notation, e.g. `"1:05 PM"`.
///
/// A missing time renders as an empty string so partially filled records
/// can be displayed as-is.
pub fn format_12_hour(time: Option<ClockTime>) -> String {
    match time {
        Some(time) => {
            let period = if time.hour() < 12 { "AM" } else { "PM" };
            let hour = match time.hour() % 12 {
                0 => 12,
                h => h,
            };
            format!("{}:{:02} {}", hour, time.minute(), period)
        }
        None => String::new(),
    }
}

/// Format raw hour/minute parts, failing on out-of-range values
pub fn format_12_hour_parts(hour: u32, minute: u32) -> Result<String, MetricsError> {
    let time = ClockTime::new(hour, minute)?;
    Ok(format_12_hour(Some(time)))
}
