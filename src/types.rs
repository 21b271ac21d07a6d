//! Core types for wellness metrics
//!
//! This module defines the values that flow through the calculator: clock
//! times, sleep intervals, durations and rating scores on the way in, and
//! display-ready metrics on the way out.

use crate::error::MetricsError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// Lowest value of the 1-10 rating scale
pub const MIN_RATING: i64 = 1;
/// Highest value of the 1-10 rating scale
pub const MAX_RATING: i64 = 10;

/// A time of day without a date.
///
/// Fields are private so a `ClockTime` can only exist with
/// `hour <= 23` and `minute <= 59`. Serializes as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build a clock time, rejecting out-of-range parts
    pub fn new(hour: u32, minute: u32) -> Result<Self, MetricsError> {
        if hour > 23 || minute > 59 {
            return Err(MetricsError::InvalidInput { hour, minute });
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Clock time for a minute offset, wrapping past midnight
    pub fn from_minutes(minutes: u32) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self {
            hour: (minutes / MINUTES_PER_HOUR) as u8,
            minute: (minutes % MINUTES_PER_HOUR) as u8,
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// Minutes elapsed since 00:00
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * MINUTES_PER_HOUR + self.minute()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

impl TryFrom<String> for ClockTime {
    type Error = MetricsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Retire and wake times for one night; either may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepInterval {
    /// When the user went to bed
    pub retire: Option<ClockTime>,
    /// When the user got up
    pub wake: Option<ClockTime>,
}

impl SleepInterval {
    pub fn new(retire: Option<ClockTime>, wake: Option<ClockTime>) -> Self {
        Self { retire, wake }
    }
}

/// Length of a sleep, split into whole hours and remainder minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SleepDuration {
    pub total_minutes: u32,
    pub hours: u32,
    pub minutes: u32,
}

impl SleepDuration {
    pub fn from_total_minutes(total_minutes: u32) -> Self {
        Self {
            total_minutes,
            hours: total_minutes / MINUTES_PER_HOUR,
            minutes: total_minutes % MINUTES_PER_HOUR,
        }
    }

    /// Build from hours and minutes; minutes past 59 carry into hours
    pub fn from_parts(hours: u32, minutes: u32) -> Self {
        Self::from_total_minutes(hours * MINUTES_PER_HOUR + minutes)
    }
}

/// A mood or energy rating.
///
/// Meant to be on the 1-10 scale, but values outside it are carried as-is:
/// classification bands are open-ended and the color lookup falls back to a
/// neutral color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingScore(i64);

impl RatingScore {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Whether the score lies on the 1-10 scale
    pub fn is_in_range(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.0)
    }
}

impl From<i64> for RatingScore {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A CSS hex color from the fixed mood palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ColorValue(&'static str);

impl ColorValue {
    pub const fn new(hex: &'static str) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Mood band for a rating score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodCategory {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Okay,
    Good,
    Excellent,
}

impl MoodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodCategory::VeryLow => "Very Low",
            MoodCategory::Low => "Low",
            MoodCategory::Okay => "Okay",
            MoodCategory::Good => "Good",
            MoodCategory::Excellent => "Excellent",
        }
    }
}

/// Energy band for a rating score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyCategory {
    Drained,
    Tired,
    Moderate,
    Energized,
    #[serde(rename = "Very Energized")]
    VeryEnergized,
}

impl EnergyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyCategory::Drained => "Drained",
            EnergyCategory::Tired => "Tired",
            EnergyCategory::Moderate => "Moderate",
            EnergyCategory::Energized => "Energized",
            EnergyCategory::VeryEnergized => "Very Energized",
        }
    }
}

/// Sleep aid recorded for a night
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepAid {
    Melatonin,
    Weed,
    ColdMedicine,
    Benadryl,
}

/// A sleep entry after boundary parsing: every field is either present and
/// valid or absent
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSleepEntry {
    pub entry_date: NaiveDate,
    pub interval: SleepInterval,
    pub wake_feeling: Option<RatingScore>,
    pub overall_mood: Option<RatingScore>,
    pub sleep_aids: Vec<SleepAid>,
    pub wake_feeling_notes: Option<String>,
    pub mood_notes: Option<String>,
    pub general_notes: Option<String>,
}

/// A mood/energy check-in after boundary parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCheckin {
    pub id: Option<i64>,
    pub entry_date: NaiveDate,
    pub check_time: ClockTime,
    pub mood_level: Option<RatingScore>,
    pub energy_level: Option<RatingScore>,
    pub notes: Option<String>,
}

/// Display-ready metrics for one sleep entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryMetrics {
    pub entry_date: NaiveDate,
    /// Bed time in 12-hour notation, empty when not logged
    pub bed_time_display: String,
    /// Wake time in 12-hour notation, empty when not logged
    pub wake_time_display: String,
    pub duration: Option<SleepDuration>,
    /// `"7h 30m"`, or an em-dash when the duration is unknown
    pub duration_display: String,
    pub wake_feeling: Option<RatingScore>,
    pub wake_feeling_label: Option<EnergyCategory>,
    pub overall_mood: Option<RatingScore>,
    pub mood_label: Option<MoodCategory>,
    pub mood_color: ColorValue,
    pub sleep_aids: Vec<SleepAid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wake_feeling_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_notes: Option<String>,
}

/// Display-ready metrics for one check-in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckinMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub entry_date: NaiveDate,
    pub check_time_display: String,
    pub mood_level: Option<RatingScore>,
    pub mood_label: Option<MoodCategory>,
    pub mood_color: ColorValue,
    pub energy_level: Option<RatingScore>,
    pub energy_label: Option<EnergyCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Average of a rating over the insights window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingAverage {
    pub value: f64,
    /// One-decimal rendering, e.g. `"6.5/10"`
    pub display: String,
    pub samples: usize,
}

/// Mood on nights with a sleep aid versus nights without
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AidComparison {
    pub aided_nights: usize,
    pub unaided_nights: usize,
    pub aided_average_mood: f64,
    pub unaided_average_mood: f64,
    /// Aided minus unaided average mood
    pub difference: f64,
}

/// Mood after restful nights versus the rest, with wake feeling as the
/// sleep quality score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepMoodComparison {
    pub good_sleep_nights: usize,
    pub poor_sleep_nights: usize,
    pub good_sleep_mood: f64,
    pub poor_sleep_mood: f64,
    /// Good-sleep minus poor-sleep average mood
    pub difference: f64,
    /// Mood is at least a full point higher after good sleep
    pub connected: bool,
}

/// Direction of a week-over-week change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Steady,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Steady => "steady",
        }
    }
}

/// Average mood of the latest week of nights against the week before it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodTrend {
    pub recent_mood: f64,
    pub previous_mood: f64,
    pub difference: f64,
    pub direction: TrendDirection,
    /// e.g. `"7.0/10"`
    pub recent_display: String,
}

/// Suggested bed and wake times derived from the best-rated nights
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SleepRecommendation {
    Recommended {
        bedtime: ClockTime,
        bedtime_display: String,
        wake_time: ClockTime,
        wake_time_display: String,
        /// Share of the good-night cap backing this recommendation (0-1)
        confidence: f64,
        based_on_nights: usize,
    },
    InsufficientData {
        good_nights: usize,
        required: usize,
        message: String,
    },
}

/// Summary over the rolling insights window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub nights_in_window: usize,
    pub checkins_in_window: usize,
    pub average_duration: Option<SleepDuration>,
    pub average_duration_display: String,
    pub average_mood: Option<RatingAverage>,
    pub average_mood_label: Option<MoodCategory>,
    pub average_wake_feeling: Option<RatingAverage>,
    pub average_energy: Option<RatingAverage>,
    pub average_energy_label: Option<EnergyCategory>,
    pub aid_comparison: Option<AidComparison>,
    pub sleep_mood: Option<SleepMoodComparison>,
    pub mood_trend: Option<MoodTrend>,
    pub recommendation: SleepRecommendation,
}

/// Report producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Complete metrics report handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub entries: Vec<EntryMetrics>,
    pub checkins: Vec<CheckinMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<Insights>,
}
