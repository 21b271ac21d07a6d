//! Metrics derivation
//!
//! This module turns parsed records into display-ready metrics:
//! - 12-hour bed, wake and check-in times
//! - Sleep duration and its rendering
//! - Mood and energy labels plus the mood color

use crate::clock::format_12_hour;
use crate::duration::{compute_duration, format_duration};
use crate::rating::mood_color;
use crate::types::{
    CheckinMetrics, EnergyCategory, EntryMetrics, MoodCategory, ParsedCheckin, ParsedSleepEntry,
};

/// Deriver for computing display metrics
pub struct MetricsDeriver;

impl MetricsDeriver {
    /// Derive metrics for one sleep entry
    pub fn entry(entry: &ParsedSleepEntry) -> EntryMetrics {
        let duration = compute_duration(&entry.interval);

        EntryMetrics {
            entry_date: entry.entry_date,
            bed_time_display: format_12_hour(entry.interval.retire),
            wake_time_display: format_12_hour(entry.interval.wake),
            duration,
            duration_display: format_duration(duration.as_ref()),
            wake_feeling: entry.wake_feeling,
            // Waking up rested is scored on the energy scale
            wake_feeling_label: entry.wake_feeling.map(EnergyCategory::from_score),
            overall_mood: entry.overall_mood,
            mood_label: entry.overall_mood.map(MoodCategory::from_score),
            mood_color: mood_color(entry.overall_mood),
            sleep_aids: entry.sleep_aids.clone(),
            wake_feeling_notes: entry.wake_feeling_notes.clone(),
            mood_notes: entry.mood_notes.clone(),
            general_notes: entry.general_notes.clone(),
        }
    }

    /// Derive metrics for one check-in
    pub fn checkin(checkin: &ParsedCheckin) -> CheckinMetrics {
        CheckinMetrics {
            id: checkin.id,
            entry_date: checkin.entry_date,
            check_time_display: format_12_hour(Some(checkin.check_time)),
            mood_level: checkin.mood_level,
            mood_label: checkin.mood_level.map(MoodCategory::from_score),
            mood_color: mood_color(checkin.mood_level),
            energy_level: checkin.energy_level,
            energy_label: checkin.energy_level.map(EnergyCategory::from_score),
            notes: checkin.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::NEUTRAL_COLOR;
    use crate::types::{ClockTime, RatingScore, SleepAid, SleepDuration, SleepInterval};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn make_entry() -> ParsedSleepEntry {
        ParsedSleepEntry {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            interval: SleepInterval::new(
                Some(ClockTime::new(22, 30).unwrap()),
                Some(ClockTime::new(6, 15).unwrap()),
            ),
            wake_feeling: Some(RatingScore::new(6)),
            overall_mood: Some(RatingScore::new(8)),
            sleep_aids: vec![SleepAid::Melatonin],
            wake_feeling_notes: None,
            mood_notes: Some("good walk".to_string()),
            general_notes: None,
        }
    }

    #[test]
    fn test_entry_metrics() {
        let metrics = MetricsDeriver::entry(&make_entry());

        assert_eq!(metrics.bed_time_display, "10:30 PM");
        assert_eq!(metrics.wake_time_display, "6:15 AM");
        assert_eq!(metrics.duration, Some(SleepDuration::from_parts(7, 45)));
        assert_eq!(metrics.duration_display, "7h 45m");
        assert_eq!(metrics.wake_feeling_label, Some(EnergyCategory::Moderate));
        assert_eq!(metrics.mood_label, Some(MoodCategory::Good));
        assert_eq!(metrics.mood_color.as_str(), "#14b8a6");
        assert_eq!(metrics.sleep_aids, vec![SleepAid::Melatonin]);
    }

    #[test]
    fn test_partial_entry_degrades() {
        let mut entry = make_entry();
        entry.interval.wake = None;
        entry.overall_mood = None;
        entry.wake_feeling = None;

        let metrics = MetricsDeriver::entry(&entry);
        assert_eq!(metrics.wake_time_display, "");
        assert_eq!(metrics.duration, None);
        assert_eq!(metrics.duration_display, "\u{2014}");
        assert_eq!(metrics.mood_label, None);
        assert_eq!(metrics.wake_feeling_label, None);
        assert_eq!(metrics.mood_color, NEUTRAL_COLOR);
    }

    #[test]
    fn test_checkin_metrics() {
        let checkin = ParsedCheckin {
            id: Some(4),
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            check_time: ClockTime::new(0, 5).unwrap(),
            mood_level: Some(RatingScore::new(2)),
            energy_level: Some(RatingScore::new(9)),
            notes: None,
        };

        let metrics = MetricsDeriver::checkin(&checkin);
        assert_eq!(metrics.check_time_display, "12:05 AM");
        assert_eq!(metrics.mood_label, Some(MoodCategory::VeryLow));
        assert_eq!(metrics.mood_color.as_str(), "#f97316");
        assert_eq!(metrics.energy_label, Some(EnergyCategory::VeryEnergized));
    }

    #[test]
    fn test_derivation_is_pure() {
        let entry = make_entry();
        assert_eq!(MetricsDeriver::entry(&entry), MetricsDeriver::entry(&entry));
    }
}
