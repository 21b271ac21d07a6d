//! Mood and energy classification
//!
//! Both scales share the same band edges (2, 4, 6, 8). Bands are open-ended
//! at the extremes, so scores outside 1-10 still get a label.

use crate::types::{ColorValue, EnergyCategory, MoodCategory, RatingScore};

/// Color used when a mood score is missing or off the scale
pub const NEUTRAL_COLOR: ColorValue = ColorValue::new("#64748b");

/// Mood colors indexed by `score - 1`
pub const MOOD_PALETTE: [ColorValue; 10] = [
    ColorValue::new("#ef4444"),
    ColorValue::new("#f97316"),
    ColorValue::new("#f59e0b"),
    ColorValue::new("#eab308"),
    ColorValue::new("#84cc16"),
    ColorValue::new("#22c55e"),
    ColorValue::new("#10b981"),
    ColorValue::new("#14b8a6"),
    ColorValue::new("#06b6d4"),
    ColorValue::new("#6366f1"),
];

/// Color for a mood score
pub fn mood_color(score: Option<RatingScore>) -> ColorValue {
    match score {
        Some(score) if score.is_in_range() => MOOD_PALETTE[(score.value() - 1) as usize],
        _ => NEUTRAL_COLOR,
    }
}

impl MoodCategory {
    /// Mood band for a score
    pub fn from_score(score: RatingScore) -> Self {
        match score.value() {
            i64::MIN..=2 => MoodCategory::VeryLow,
            3..=4 => MoodCategory::Low,
            5..=6 => MoodCategory::Okay,
            7..=8 => MoodCategory::Good,
            _ => MoodCategory::Excellent,
        }
    }
}

impl EnergyCategory {
    /// Energy band for a score
    pub fn from_score(score: RatingScore) -> Self {
        match score.value() {
            i64::MIN..=2 => EnergyCategory::Drained,
            3..=4 => EnergyCategory::Tired,
            5..=6 => EnergyCategory::Moderate,
            7..=8 => EnergyCategory::Energized,
            _ => EnergyCategory::VeryEnergized,
        }
    }
}

/// Display label for a mood score
pub fn mood_label(score: RatingScore) -> &'static str {
    MoodCategory::from_score(score).as_str()
}

/// Display label for an energy score, also used for wake feeling
pub fn energy_label(score: RatingScore) -> &'static str {
    EnergyCategory::from_score(score).as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(v: i64) -> RatingScore {
        RatingScore::new(v)
    }

    #[test]
    fn test_palette_lookup() {
        let expected = [
            "#ef4444", "#f97316", "#f59e0b", "#eab308", "#84cc16", "#22c55e", "#10b981",
            "#14b8a6", "#06b6d4", "#6366f1",
        ];
        for (i, hex) in expected.iter().enumerate() {
            assert_eq!(mood_color(Some(score(i as i64 + 1))).as_str(), *hex);
        }
    }

    #[test]
    fn test_color_fallback() {
        assert_eq!(mood_color(None), NEUTRAL_COLOR);
        assert_eq!(mood_color(Some(score(0))).as_str(), "#64748b");
        assert_eq!(mood_color(Some(score(11))).as_str(), "#64748b");
        assert_eq!(mood_color(Some(score(-3))).as_str(), "#64748b");
    }

    #[test]
    fn test_mood_labels() {
        assert_eq!(mood_label(score(1)), "Very Low");
        assert_eq!(mood_label(score(2)), "Very Low");
        assert_eq!(mood_label(score(3)), "Low");
        assert_eq!(mood_label(score(5)), "Okay");
        assert_eq!(mood_label(score(6)), "Okay");
        assert_eq!(mood_label(score(8)), "Good");
        assert_eq!(mood_label(score(9)), "Excellent");
        assert_eq!(mood_label(score(10)), "Excellent");
    }

    #[test]
    fn test_energy_labels() {
        assert_eq!(energy_label(score(1)), "Drained");
        assert_eq!(energy_label(score(4)), "Tired");
        assert_eq!(energy_label(score(6)), "Moderate");
        assert_eq!(energy_label(score(7)), "Energized");
        assert_eq!(energy_label(score(9)), "Very Energized");
    }

    #[test]
    fn test_out_of_band_labels_extend() {
        assert_eq!(mood_label(score(0)), "Very Low");
        assert_eq!(mood_label(score(42)), "Excellent");
        assert_eq!(energy_label(score(-5)), "Drained");
        assert_eq!(energy_label(score(11)), "Very Energized");
    }

    #[test]
    fn test_repeated_calls_agree() {
        for v in -2..=12 {
            assert_eq!(mood_color(Some(score(v))), mood_color(Some(score(v))));
            assert_eq!(mood_label(score(v)), mood_label(score(v)));
            assert_eq!(energy_label(score(v)), energy_label(score(v)));
        }
        assert_eq!(mood_color(None), mood_color(None));
    }
}
