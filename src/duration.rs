//! Sleep duration
//!
//! Duration is computed from clock times only. A wake time earlier on the
//! clock than the retire time is read as the next morning; equal times are a
//! zero-length sleep.

use crate::types::{ClockTime, SleepDuration, SleepInterval, MINUTES_PER_DAY};

/// Placeholder rendered when a value is not available
pub const MISSING_PLACEHOLDER: &str = "\u{2014}";

/// Compute how long the user slept, or `None` if either time is missing
pub fn compute_duration(interval: &SleepInterval) -> Option<SleepDuration> {
    match (interval.retire, interval.wake) {
        (Some(retire), Some(wake)) => Some(duration_between(retire, wake)),
        _ => None,
    }
}

/// Minutes from `retire` to `wake`, wrapping over midnight at most once
pub fn duration_between(retire: ClockTime, wake: ClockTime) -> SleepDuration {
    let retire_minutes = retire.minutes_since_midnight();
    let mut wake_minutes = wake.minutes_since_midnight();

    if wake_minutes < retire_minutes {
        wake_minutes += MINUTES_PER_DAY;
    }

    SleepDuration::from_total_minutes(wake_minutes - retire_minutes)
}

/// Render a duration as `"7h 30m"`, or an em-dash when unknown
pub fn format_duration(duration: Option<&SleepDuration>) -> String {
    match duration {
        Some(d) => format!("{}h {}m", d.hours, d.minutes),
        None => MISSING_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn interval(retire: (u32, u32), wake: (u32, u32)) -> SleepInterval {
        SleepInterval::new(
            Some(ClockTime::new(retire.0, retire.1).unwrap()),
            Some(ClockTime::new(wake.0, wake.1).unwrap()),
        )
    }

    #[test]
    fn test_overnight_wrap() {
        let duration = compute_duration(&interval((23, 0), (7, 0))).unwrap();
        assert_eq!(
            duration,
            SleepDuration {
                total_minutes: 480,
                hours: 8,
                minutes: 0
            }
        );
    }

    #[test]
    fn test_equal_times_are_zero() {
        let duration = compute_duration(&interval((7, 0), (7, 0))).unwrap();
        assert_eq!(duration, SleepDuration::from_total_minutes(0));
    }

    #[test]
    fn test_overnight_with_minutes() {
        let duration = compute_duration(&interval((22, 30), (6, 15))).unwrap();
        assert_eq!(
            duration,
            SleepDuration {
                total_minutes: 465,
                hours: 7,
                minutes: 45
            }
        );
    }

    #[test]
    fn test_same_day_nap() {
        let duration = compute_duration(&interval((13, 15), (14, 0))).unwrap();
        assert_eq!(duration.total_minutes, 45);
    }

    #[test]
    fn test_one_minute_before_retire_is_almost_a_day() {
        let duration = compute_duration(&interval((7, 0), (6, 59))).unwrap();
        assert_eq!(duration.total_minutes, MINUTES_PER_DAY - 1);
    }

    #[test]
    fn test_missing_endpoint() {
        let wake = Some(ClockTime::new(7, 0).unwrap());
        assert_eq!(compute_duration(&SleepInterval::new(None, wake)), None);
        assert_eq!(compute_duration(&SleepInterval::new(wake, None)), None);
        assert_eq!(compute_duration(&SleepInterval::default()), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "\u{2014}");
        assert_eq!(format_duration(Some(&SleepDuration::from_parts(7, 30))), "7h 30m");
        assert_eq!(format_duration(Some(&SleepDuration::from_parts(0, 5))), "0h 5m");
        assert_eq!(format_duration(Some(&SleepDuration::from_parts(10, 0))), "10h 0m");
    }

    #[test]
    fn test_repeated_calls_agree() {
        let night = interval((22, 30), (6, 15));
        let first = compute_duration(&night);
        assert_eq!(first, compute_duration(&night));
        assert_eq!(format_duration(first.as_ref()), format_duration(first.as_ref()));
        assert_eq!(format_duration(None), format_duration(None));
    }
}
