//! Rolling insights
//!
//! This module keeps a bounded window of recent nights and check-ins and
//! summarizes them: average sleep, mood and energy, how sleep aids and sleep
//! quality line up with mood, the week-over-week mood trend, and a bed/wake
//! time suggestion drawn from the best-rated nights.

use crate::clock::format_12_hour;
use crate::duration::{compute_duration, format_duration};
use crate::error::MetricsError;
use crate::types::{
    AidComparison, ClockTime, EnergyCategory, Insights, MoodCategory, MoodTrend, ParsedCheckin,
    ParsedSleepEntry, RatingAverage, RatingScore, SleepDuration, SleepMoodComparison,
    SleepRecommendation, TrendDirection, MINUTES_PER_DAY, MINUTES_PER_HOUR,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of nights kept in the window
pub const DEFAULT_INSIGHT_WINDOW: usize = 30;

/// Default number of check-ins kept in the window
pub const DEFAULT_CHECKIN_WINDOW: usize = 50;

/// Wake feeling and mood must both reach this for a night to count as good
pub const DEFAULT_GOOD_NIGHT_THRESHOLD: i64 = 7;

pub const DEFAULT_MIN_GOOD_NIGHTS: usize = 5;
pub const DEFAULT_MAX_GOOD_NIGHTS: usize = 20;

/// Upper bound for any window or cap in the config (ten years of nights)
pub const MAX_WINDOW_SIZE: usize = 3650;

/// Nights per week when comparing the latest week to the one before
const TREND_WEEK_NIGHTS: usize = 7;
/// Mood changes within this band count as steady
const TREND_STEADY_BAND: f64 = 0.5;
/// Mood gap after good sleep that counts as a real connection
const SLEEP_MOOD_CONNECTED_GAP: f64 = 1.0;

/// Bedtimes are averaged on an axis starting at noon so that 23:30 and 00:30
/// land next to each other
const BEDTIME_ANCHOR_MINUTES: u32 = 12 * MINUTES_PER_HOUR;
const WAKE_ANCHOR_MINUTES: u32 = 0;

/// Tunables for the insights window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub window_days: usize,
    pub checkin_window: usize,
    pub good_night_threshold: i64,
    pub min_good_nights: usize,
    pub max_good_nights: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_INSIGHT_WINDOW,
            checkin_window: DEFAULT_CHECKIN_WINDOW,
            good_night_threshold: DEFAULT_GOOD_NIGHT_THRESHOLD,
            min_good_nights: DEFAULT_MIN_GOOD_NIGHTS,
            max_good_nights: DEFAULT_MAX_GOOD_NIGHTS,
        }
    }
}

impl InsightConfig {
    pub fn validate(&self) -> Result<(), MetricsError> {
        if self.window_days == 0 {
            return Err(MetricsError::ConfigError("window_days must be at least 1".into()));
        }
        if self.checkin_window == 0 {
            return Err(MetricsError::ConfigError(
                "checkin_window must be at least 1".into(),
            ));
        }
        if self.max_good_nights == 0 {
            return Err(MetricsError::ConfigError(
                "max_good_nights must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("window_days", self.window_days),
            ("checkin_window", self.checkin_window),
            ("max_good_nights", self.max_good_nights),
        ] {
            if value > MAX_WINDOW_SIZE {
                return Err(MetricsError::ConfigError(format!(
                    "{name} ({value}) exceeds the limit of {MAX_WINDOW_SIZE}"
                )));
            }
        }
        if self.min_good_nights > self.max_good_nights {
            return Err(MetricsError::ConfigError(format!(
                "min_good_nights ({}) exceeds max_good_nights ({})",
                self.min_good_nights, self.max_good_nights
            )));
        }
        Ok(())
    }

    /// Load a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, MetricsError> {
        let config: InsightConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// What the window remembers about one night
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NightRecord {
    entry_date: NaiveDate,
    retire: Option<ClockTime>,
    wake: Option<ClockTime>,
    duration_minutes: Option<u32>,
    mood: Option<RatingScore>,
    wake_feeling: Option<RatingScore>,
    aided: bool,
}

impl NightRecord {
    fn from_entry(entry: &ParsedSleepEntry) -> Self {
        Self {
            entry_date: entry.entry_date,
            retire: entry.interval.retire,
            wake: entry.interval.wake,
            duration_minutes: compute_duration(&entry.interval).map(|d| d.total_minutes),
            mood: entry.overall_mood,
            wake_feeling: entry.wake_feeling,
            aided: !entry.sleep_aids.is_empty(),
        }
    }
}

/// Rolling store of recent nights and check-in energy levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightStore {
    /// Nights ordered by date, one per date
    nights: VecDeque<NightRecord>,
    /// Most recent check-in energy levels
    energy_values: VecDeque<RatingScore>,
    config: InsightConfig,
}

impl Default for InsightStore {
    fn default() -> Self {
        Self::new(InsightConfig::default())
    }
}

impl InsightStore {
    pub fn new(config: InsightConfig) -> Self {
        Self {
            nights: VecDeque::new(),
            energy_values: VecDeque::new(),
            config,
        }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Swap in a new config, shrinking the windows if needed
    pub fn set_config(&mut self, config: InsightConfig) {
        self.config = config;
        self.trim();
    }

    /// Record a night. A second entry for the same date replaces the first.
    pub fn add_entry(&mut self, entry: &ParsedSleepEntry) {
        let night = NightRecord::from_entry(entry);

        match self
            .nights
            .binary_search_by_key(&night.entry_date, |n| n.entry_date)
        {
            Ok(pos) => self.nights[pos] = night,
            Err(pos) => self.nights.insert(pos, night),
        }

        self.trim();
    }

    /// Record a check-in; only its energy level is kept
    pub fn add_checkin(&mut self, checkin: &ParsedCheckin) {
        if let Some(energy) = checkin.energy_level {
            self.energy_values.push_back(energy);
            self.trim();
        }
    }

    fn trim(&mut self) {
        while self.nights.len() > self.config.window_days {
            if let Some(dropped) = self.nights.pop_front() {
                tracing::trace!(date = %dropped.entry_date, "night left the insights window");
            }
        }
        while self.energy_values.len() > self.config.checkin_window {
            self.energy_values.pop_front();
        }
    }

    /// Summarize the current window
    pub fn insights(&self) -> Insights {
        let average_duration = average_minutes(self.nights.iter().filter_map(|n| n.duration_minutes))
            .map(SleepDuration::from_total_minutes);

        let average_mood = rating_average(self.nights.iter().filter_map(|n| n.mood));
        let average_wake_feeling = rating_average(self.nights.iter().filter_map(|n| n.wake_feeling));
        let average_energy = rating_average(self.energy_values.iter().copied());

        Insights {
            nights_in_window: self.nights.len(),
            checkins_in_window: self.energy_values.len(),
            average_duration,
            average_duration_display: format_duration(average_duration.as_ref()),
            average_mood_label: average_mood
                .as_ref()
                .map(|a| MoodCategory::from_score(rounded_score(a.value))),
            average_mood,
            average_wake_feeling,
            average_energy_label: average_energy
                .as_ref()
                .map(|a| EnergyCategory::from_score(rounded_score(a.value))),
            average_energy,
            aid_comparison: self.compare_aids(),
            sleep_mood: self.compare_sleep_mood(),
            mood_trend: self.mood_trend(),
            recommendation: self.recommend(),
        }
    }

    fn compare_aids(&self) -> Option<AidComparison> {
        let (aided, unaided): (Vec<&NightRecord>, Vec<&NightRecord>) = self
            .nights
            .iter()
            .filter(|n| n.mood.is_some())
            .partition(|n| n.aided);

        let aided_avg = rating_average(aided.iter().filter_map(|n| n.mood))?;
        let unaided_avg = rating_average(unaided.iter().filter_map(|n| n.mood))?;

        Some(AidComparison {
            aided_nights: aided.len(),
            unaided_nights: unaided.len(),
            aided_average_mood: aided_avg.value,
            unaided_average_mood: unaided_avg.value,
            difference: aided_avg.value - unaided_avg.value,
        })
    }

    /// Good sleep means a wake feeling at or above the good-night threshold
    fn compare_sleep_mood(&self) -> Option<SleepMoodComparison> {
        let threshold = self.config.good_night_threshold;
        let (good, poor): (Vec<_>, Vec<_>) = self
            .nights
            .iter()
            .filter_map(|n| Some((n.wake_feeling?, n.mood?)))
            .partition(|(feeling, _)| feeling.value() >= threshold);

        let good_avg = rating_average(good.into_iter().map(|(_, mood)| mood))?;
        let poor_avg = rating_average(poor.into_iter().map(|(_, mood)| mood))?;
        let difference = good_avg.value - poor_avg.value;

        Some(SleepMoodComparison {
            good_sleep_nights: good_avg.samples,
            poor_sleep_nights: poor_avg.samples,
            good_sleep_mood: good_avg.value,
            poor_sleep_mood: poor_avg.value,
            difference,
            connected: difference > SLEEP_MOOD_CONNECTED_GAP,
        })
    }

    /// Latest week of nights against the week before; needs two full weeks
    fn mood_trend(&self) -> Option<MoodTrend> {
        if self.nights.len() < 2 * TREND_WEEK_NIGHTS {
            return None;
        }

        let mut newest_first = self.nights.iter().rev();
        let recent = rating_average(
            newest_first
                .by_ref()
                .take(TREND_WEEK_NIGHTS)
                .filter_map(|n| n.mood),
        )?;
        let previous = rating_average(
            newest_first
                .take(TREND_WEEK_NIGHTS)
                .filter_map(|n| n.mood),
        )?;

        let difference = recent.value - previous.value;
        let direction = if difference > TREND_STEADY_BAND {
            TrendDirection::Up
        } else if difference < -TREND_STEADY_BAND {
            TrendDirection::Down
        } else {
            TrendDirection::Steady
        };

        Some(MoodTrend {
            recent_mood: recent.value,
            previous_mood: previous.value,
            difference,
            direction,
            recent_display: recent.display,
        })
    }

    fn recommend(&self) -> SleepRecommendation {
        let threshold = self.config.good_night_threshold;

        let mut good: Vec<(f64, ClockTime, ClockTime)> = self
            .nights
            .iter()
            .filter_map(|n| match (n.retire, n.wake, n.wake_feeling, n.mood) {
                (Some(retire), Some(wake), Some(feeling), Some(mood))
                    if feeling.value() >= threshold && mood.value() >= threshold =>
                {
                    let score = (feeling.value() + mood.value()) as f64 / 2.0;
                    Some((score, retire, wake))
                }
                _ => None,
            })
            .collect();

        // Stable sort keeps date order among equal scores
        good.sort_by(|a, b| b.0.total_cmp(&a.0));
        good.truncate(self.config.max_good_nights);

        if good.is_empty() || good.len() < self.config.min_good_nights {
            return SleepRecommendation::InsufficientData {
                good_nights: good.len(),
                required: self.config.min_good_nights.max(1),
                message: format!(
                    "Need more data (at least {} good nights)",
                    self.config.min_good_nights.max(1)
                ),
            };
        }

        let bedtime = mean_clock_time(good.iter().map(|g| g.1), BEDTIME_ANCHOR_MINUTES);
        let wake_time = mean_clock_time(good.iter().map(|g| g.2), WAKE_ANCHOR_MINUTES);

        SleepRecommendation::Recommended {
            bedtime,
            bedtime_display: format_12_hour(Some(bedtime)),
            wake_time,
            wake_time_display: format_12_hour(Some(wake_time)),
            confidence: good.len() as f64 / self.config.max_good_nights as f64,
            based_on_nights: good.len(),
        }
    }

    /// Load an insight store from JSON. Nights go back into date order with
    /// one night per date (the last one saved wins) before trimming.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut store: Self = serde_json::from_str(json)?;
        store.normalize();
        Ok(store)
    }

    fn normalize(&mut self) {
        let mut nights = Vec::from(std::mem::take(&mut self.nights));
        // Stable, so among equal dates the later one stays last
        nights.sort_by_key(|n| n.entry_date);

        let mut merged: VecDeque<NightRecord> = VecDeque::with_capacity(nights.len());
        for night in nights {
            match merged.back_mut() {
                Some(last) if last.entry_date == night.entry_date => *last = night,
                _ => merged.push_back(night),
            }
        }

        self.nights = merged;
        self.trim();
    }

    /// Serialize the insight store to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn average_minutes(values: impl Iterator<Item = u32>) -> Option<u32> {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| (sum + v as u64, count + 1));
    if count == 0 {
        return None;
    }
    Some(((sum + count / 2) / count) as u32)
}

fn rating_average(values: impl Iterator<Item = RatingScore>) -> Option<RatingAverage> {
    let scores: Vec<i64> = values.map(|s| s.value()).collect();
    if scores.is_empty() {
        return None;
    }
    let value = scores.iter().sum::<i64>() as f64 / scores.len() as f64;
    Some(RatingAverage {
        value,
        display: format!("{value:.1}/10"),
        samples: scores.len(),
    })
}

fn rounded_score(value: f64) -> RatingScore {
    RatingScore::new(value.round() as i64)
}

/// Average clock times on a 24h axis that starts at `anchor_minutes`
fn mean_clock_time(times: impl Iterator<Item = ClockTime>, anchor_minutes: u32) -> ClockTime {
    let shifted = times.map(|t| {
        let m = t.minutes_since_midnight();
        if m < anchor_minutes {
            m + MINUTES_PER_DAY
        } else {
            m
        }
    });
    ClockTime::from_minutes(average_minutes(shifted).unwrap_or(anchor_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SleepAid, SleepInterval};
    use pretty_assertions::assert_eq;

    fn at(hour: u32, minute: u32) -> Option<ClockTime> {
        Some(ClockTime::new(hour, minute).unwrap())
    }

    fn make_entry(
        day: u32,
        retire: Option<ClockTime>,
        wake: Option<ClockTime>,
        feeling: i64,
        mood: i64,
    ) -> ParsedSleepEntry {
        ParsedSleepEntry {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            interval: SleepInterval::new(retire, wake),
            wake_feeling: Some(RatingScore::new(feeling)),
            overall_mood: Some(RatingScore::new(mood)),
            sleep_aids: vec![],
            wake_feeling_notes: None,
            mood_notes: None,
            general_notes: None,
        }
    }

    fn make_checkin(energy: i64) -> ParsedCheckin {
        ParsedCheckin {
            id: None,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            check_time: ClockTime::new(12, 0).unwrap(),
            mood_level: None,
            energy_level: Some(RatingScore::new(energy)),
            notes: None,
        }
    }

    #[test]
    fn test_averages() {
        let mut store = InsightStore::default();
        store.add_entry(&make_entry(1, at(23, 0), at(7, 0), 6, 5));
        store.add_entry(&make_entry(2, at(22, 30), at(6, 15), 8, 8));
        store.add_checkin(&make_checkin(3));
        store.add_checkin(&make_checkin(6));

        let insights = store.insights();
        assert_eq!(insights.nights_in_window, 2);
        // (480 + 465) / 2 = 472.5, rounded up
        assert_eq!(insights.average_duration, Some(SleepDuration::from_parts(7, 53)));
        assert_eq!(insights.average_duration_display, "7h 53m");

        let mood = insights.average_mood.unwrap();
        assert!((mood.value - 6.5).abs() < 1e-9);
        assert_eq!(mood.display, "6.5/10");
        assert_eq!(insights.average_mood_label, Some(MoodCategory::Good));

        let energy = insights.average_energy.unwrap();
        assert_eq!(energy.samples, 2);
        // 4.5 rounds to 5
        assert_eq!(insights.average_energy_label, Some(EnergyCategory::Moderate));
    }

    #[test]
    fn test_empty_window() {
        let insights = InsightStore::default().insights();
        assert_eq!(insights.average_duration, None);
        assert_eq!(insights.average_duration_display, "\u{2014}");
        assert_eq!(insights.average_mood, None);
        assert_eq!(insights.aid_comparison, None);
        assert_eq!(insights.sleep_mood, None);
        assert_eq!(insights.mood_trend, None);
        assert!(matches!(
            insights.recommendation,
            SleepRecommendation::InsufficientData { good_nights: 0, .. }
        ));
    }

    #[test]
    fn test_window_rolling() {
        let config = InsightConfig {
            window_days: 3,
            checkin_window: 2,
            ..Default::default()
        };
        let mut store = InsightStore::new(config);

        for day in 1..=5 {
            store.add_entry(&make_entry(day, at(23, 0), at(7, 0), 5, day as i64));
        }
        for energy in [1, 2, 9] {
            store.add_checkin(&make_checkin(energy));
        }

        let insights = store.insights();
        assert_eq!(insights.nights_in_window, 3);
        // Only days 3, 4, 5 remain
        assert!((insights.average_mood.unwrap().value - 4.0).abs() < 1e-9);
        assert_eq!(insights.checkins_in_window, 2);
        assert!((insights.average_energy.unwrap().value - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_same_date_replaces_night() {
        let mut store = InsightStore::default();
        store.add_entry(&make_entry(1, at(23, 0), at(7, 0), 5, 2));
        store.add_entry(&make_entry(1, at(23, 0), at(7, 0), 5, 8));

        let insights = store.insights();
        assert_eq!(insights.nights_in_window, 1);
        assert!((insights.average_mood.unwrap().value - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_aid_comparison() {
        let mut store = InsightStore::default();
        let mut aided = make_entry(1, at(23, 0), at(7, 0), 5, 8);
        aided.sleep_aids = vec![SleepAid::Melatonin];
        store.add_entry(&aided);
        store.add_entry(&make_entry(2, at(23, 0), at(7, 0), 5, 5));
        store.add_entry(&make_entry(3, at(23, 0), at(7, 0), 5, 6));

        let comparison = store.insights().aid_comparison.unwrap();
        assert_eq!(comparison.aided_nights, 1);
        assert_eq!(comparison.unaided_nights, 2);
        assert!((comparison.difference - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_recommendation_averages_across_midnight() {
        let mut store = InsightStore::default();
        store.add_entry(&make_entry(1, at(23, 30), at(7, 0), 8, 8));
        store.add_entry(&make_entry(2, at(0, 30), at(7, 30), 9, 8));
        store.add_entry(&make_entry(3, at(23, 0), at(6, 30), 7, 7));
        store.add_entry(&make_entry(4, at(1, 0), at(8, 0), 8, 9));
        store.add_entry(&make_entry(5, at(0, 0), at(7, 0), 10, 10));
        // Poorly rated night is ignored
        store.add_entry(&make_entry(6, at(3, 0), at(11, 0), 3, 4));

        match store.insights().recommendation {
            SleepRecommendation::Recommended {
                bedtime,
                bedtime_display,
                wake_time,
                based_on_nights,
                confidence,
                ..
            } => {
                // 23:30, 00:30, 23:00, 01:00, 00:00 average to 00:00
                assert_eq!(bedtime, ClockTime::new(0, 0).unwrap());
                assert_eq!(bedtime_display, "12:00 AM");
                assert_eq!(wake_time, ClockTime::new(7, 12).unwrap());
                assert_eq!(based_on_nights, 5);
                assert!((confidence - 0.25).abs() < 1e-9);
            }
            other => panic!("expected a recommendation, got {other:?}"),
        }
    }

    #[test]
    fn test_recommendation_needs_enough_good_nights() {
        let mut store = InsightStore::default();
        for day in 1..=4 {
            store.add_entry(&make_entry(day, at(23, 0), at(7, 0), 8, 8));
        }
        store.add_entry(&make_entry(5, None, at(7, 0), 9, 9));

        assert_eq!(
            store.insights().recommendation,
            SleepRecommendation::InsufficientData {
                good_nights: 4,
                required: 5,
                message: "Need more data (at least 5 good nights)".to_string(),
            }
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(InsightConfig::default().validate().is_ok());
        let bad = InsightConfig {
            min_good_nights: 30,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(MetricsError::ConfigError(_))));

        let config = InsightConfig::from_json(r#"{"window_days": 7}"#).unwrap();
        assert_eq!(config.window_days, 7);
        assert_eq!(config.max_good_nights, DEFAULT_MAX_GOOD_NIGHTS);
        assert!(InsightConfig::from_json(r#"{"window_days": 0}"#).is_err());
    }

    #[test]
    fn test_serialization() {
        let mut store = InsightStore::default();
        store.add_entry(&make_entry(1, at(23, 0), at(7, 0), 6, 7));
        store.add_checkin(&make_checkin(4));

        let json = store.to_json().unwrap();
        let loaded = InsightStore::from_json(&json).unwrap();

        assert_eq!(store.insights(), loaded.insights());
    }

    #[test]
    fn test_set_config_shrinks_window() {
        let mut store = InsightStore::default();
        for day in 1..=10 {
            store.add_entry(&make_entry(day, at(23, 0), at(7, 0), 6, 7));
        }
        store.set_config(InsightConfig {
            window_days: 4,
            ..Default::default()
        });
        assert_eq!(store.insights().nights_in_window, 4);
    }

    #[test]
    fn test_config_rejects_oversized_window() {
        let result = InsightConfig::from_json(r#"{"window_days": 18446744073709551615}"#);
        assert!(matches!(result, Err(MetricsError::ConfigError(_))));

        let huge_checkins = InsightConfig {
            checkin_window: usize::MAX,
            ..Default::default()
        };
        assert!(huge_checkins.validate().is_err());

        let at_limit = InsightConfig {
            window_days: MAX_WINDOW_SIZE,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
        assert_eq!(InsightStore::new(at_limit).insights().nights_in_window, 0);
    }

    #[test]
    fn test_loaded_state_is_put_back_in_order() {
        let mut store = InsightStore::default();
        for day in 3..=5 {
            store.add_entry(&make_entry(day, at(23, 0), at(7, 0), 6, 5));
        }

        // Scramble the saved nights, repeat a date and shrink the window
        let mut state: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();
        let nights = state["nights"].as_array_mut().unwrap();
        nights.reverse();
        let mut replacement = nights[1].clone();
        replacement["mood"] = serde_json::json!(9);
        nights.push(replacement);
        state["config"]["window_days"] = serde_json::json!(2);

        let mut loaded = InsightStore::from_json(&state.to_string()).unwrap();
        let insights = loaded.insights();
        assert_eq!(insights.nights_in_window, 2);
        // Jan 4 (replaced, mood 9) and Jan 5 (mood 5)
        assert!((insights.average_mood.unwrap().value - 7.0).abs() < 1e-9);

        // An older night must not push out the newest one
        loaded.add_entry(&make_entry(3, at(23, 0), at(7, 0), 6, 5));
        let saved: serde_json::Value = serde_json::from_str(&loaded.to_json().unwrap()).unwrap();
        let dates: Vec<&str> = saved["nights"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["entry_date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2024-01-04", "2024-01-05"]);
    }

    #[test]
    fn test_sleep_mood_comparison() {
        let mut store = InsightStore::default();
        store.add_entry(&make_entry(1, at(23, 0), at(7, 0), 8, 8));
        store.add_entry(&make_entry(2, at(23, 0), at(7, 0), 9, 7));
        store.add_entry(&make_entry(3, at(23, 0), at(7, 0), 4, 5));
        store.add_entry(&make_entry(4, at(23, 0), at(7, 0), 3, 4));

        let comparison = store.insights().sleep_mood.unwrap();
        assert_eq!(comparison.good_sleep_nights, 2);
        assert_eq!(comparison.poor_sleep_nights, 2);
        assert!((comparison.good_sleep_mood - 7.5).abs() < 1e-9);
        assert!((comparison.poor_sleep_mood - 4.5).abs() < 1e-9);
        assert!((comparison.difference - 3.0).abs() < 1e-9);
        assert!(comparison.connected);
    }

    #[test]
    fn test_sleep_mood_needs_both_groups() {
        let mut store = InsightStore::default();
        store.add_entry(&make_entry(1, at(23, 0), at(7, 0), 8, 8));
        store.add_entry(&make_entry(2, at(23, 0), at(7, 0), 9, 7));
        assert_eq!(store.insights().sleep_mood, None);

        // A small gap is reported but not flagged
        store.add_entry(&make_entry(3, at(23, 0), at(7, 0), 5, 7));
        let comparison = store.insights().sleep_mood.unwrap();
        assert!((comparison.difference - 0.5).abs() < 1e-9);
        assert!(!comparison.connected);
    }

    fn two_weeks(first_week_mood: i64, second_week_mood: i64) -> InsightStore {
        let mut store = InsightStore::default();
        for day in 1..=14 {
            let mood = if day <= 7 { first_week_mood } else { second_week_mood };
            store.add_entry(&make_entry(day, at(23, 0), at(7, 0), 6, mood));
        }
        store
    }

    #[test]
    fn test_mood_trend_directions() {
        let trend = two_weeks(5, 7).insights().mood_trend.unwrap();
        assert_eq!(trend.direction, TrendDirection::Up);
        assert!((trend.recent_mood - 7.0).abs() < 1e-9);
        assert!((trend.previous_mood - 5.0).abs() < 1e-9);
        assert_eq!(trend.recent_display, "7.0/10");

        let trend = two_weeks(8, 6).insights().mood_trend.unwrap();
        assert_eq!(trend.direction, TrendDirection::Down);

        let trend = two_weeks(6, 6).insights().mood_trend.unwrap();
        assert_eq!(trend.direction, TrendDirection::Steady);
    }

    #[test]
    fn test_mood_trend_needs_two_weeks() {
        let mut store = InsightStore::default();
        for day in 1..=13 {
            store.add_entry(&make_entry(day, at(23, 0), at(7, 0), 6, 6));
        }
        assert_eq!(store.insights().mood_trend, None);
        assert_eq!(two_weeks(6, 6).insights().mood_trend.map(|t| t.difference), Some(0.0));
    }
}
