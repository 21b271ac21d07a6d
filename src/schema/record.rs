//! Raw record formats
//!
//! These mirror what the tracker's forms and database hand over: loosely typed
//! fields where an empty string means "not filled in", ratings that may arrive
//! as numbers or strings, and checkbox flags stored as 0/1. Conversion into the
//! typed `Parsed*` values happens here and nowhere else.

use crate::clock::parse_clock_time;
use crate::error::MetricsError;
use crate::types::{ClockTime, ParsedCheckin, ParsedSleepEntry, RatingScore, SleepAid, SleepInterval};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by entry records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A checkbox value: `true`, `1`, `"on"` and `"1"` all mean checked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl Flag {
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Integer(i) => *i != 0,
            Flag::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "on" | "true" | "yes"
            ),
        }
    }
}

fn flag_set(flag: &Option<Flag>) -> bool {
    flag.as_ref().map(Flag::is_set).unwrap_or(false)
}

/// One night's sleep log as submitted by the tracker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SleepEntryRecord {
    pub entry_date: String,
    #[serde(default)]
    pub bed_time: Option<String>,
    #[serde(default)]
    pub wake_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_melatonin: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_weed: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_cold_medicine: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_benadryl: Option<Flag>,
    /// How rested the user felt on waking (1-10)
    #[serde(default)]
    pub wake_feeling: Option<serde_json::Value>,
    /// Mood over the day (1-10)
    #[serde(default)]
    pub overall_mood: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wake_feeling_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_notes: Option<String>,
}

/// A mood/energy check-in taken during the day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodCheckinRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub entry_date: String,
    pub check_time: String,
    #[serde(default)]
    pub mood_level: Option<serde_json::Value>,
    #[serde(default)]
    pub energy_level: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Validation errors for raw records
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid date in {field}: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid time in {field}: {value:?} ({reason})")]
    InvalidTime {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Time out of range in {field}: hour {hour}, minute {minute}")]
    TimeOutOfRange {
        field: &'static str,
        hour: u32,
        minute: u32,
    },
}

/// A raw record that can be checked and converted into typed values
pub trait Record {
    type Parsed;

    /// Convert into typed values, failing on the first invalid field
    fn to_parsed(&self) -> Result<Self::Parsed, RecordError>;

    /// Short identifier for reports
    fn label(&self) -> Option<String>;

    fn validate(&self) -> Result<(), RecordError> {
        self.to_parsed().map(|_| ())
    }
}

impl Record for SleepEntryRecord {
    type Parsed = ParsedSleepEntry;

    fn to_parsed(&self) -> Result<ParsedSleepEntry, RecordError> {
        let entry_date = parse_date("entry_date", &self.entry_date)?;
        let retire = parse_time_field("bed_time", self.bed_time.as_deref())?;
        let wake = parse_time_field("wake_time", self.wake_time.as_deref())?;

        let aids = [
            (&self.med_melatonin, SleepAid::Melatonin),
            (&self.med_weed, SleepAid::Weed),
            (&self.med_cold_medicine, SleepAid::ColdMedicine),
            (&self.med_benadryl, SleepAid::Benadryl),
        ];
        let sleep_aids = aids
            .into_iter()
            .filter(|(flag, _)| flag_set(flag))
            .map(|(_, aid)| aid)
            .collect();

        Ok(ParsedSleepEntry {
            entry_date,
            interval: SleepInterval::new(retire, wake),
            wake_feeling: RatingScore::from_field("wake_feeling", self.wake_feeling.as_ref()),
            overall_mood: RatingScore::from_field("overall_mood", self.overall_mood.as_ref()),
            sleep_aids,
            wake_feeling_notes: non_blank(&self.wake_feeling_notes),
            mood_notes: non_blank(&self.mood_notes),
            general_notes: non_blank(&self.general_notes),
        })
    }

    fn label(&self) -> Option<String> {
        Some(self.entry_date.trim().to_string()).filter(|date| !date.is_empty())
    }
}

impl Record for MoodCheckinRecord {
    type Parsed = ParsedCheckin;

    fn to_parsed(&self) -> Result<ParsedCheckin, RecordError> {
        let entry_date = parse_date("entry_date", &self.entry_date)?;
        let check_time = parse_time_field("check_time", Some(&self.check_time))?
            .ok_or(RecordError::MissingField("check_time"))?;

        Ok(ParsedCheckin {
            id: self.id,
            entry_date,
            check_time,
            mood_level: RatingScore::from_field("mood_level", self.mood_level.as_ref()),
            energy_level: RatingScore::from_field("energy_level", self.energy_level.as_ref()),
            notes: non_blank(&self.notes),
        })
    }

    fn label(&self) -> Option<String> {
        match self.id {
            Some(id) => Some(format!("#{id}")),
            None => Some(format!("{} {}", self.entry_date, self.check_time)),
        }
    }
}

impl RatingScore {
    /// Read a rating from a loosely typed JSON field.
    ///
    /// Integers and integer strings are accepted. Null, blank strings and
    /// anything non-integer count as "not rated".
    pub fn from_value(value: &serde_json::Value) -> Option<RatingScore> {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(RatingScore::new(i)),
                None => n
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| RatingScore::new(f as i64)),
            },
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok().map(RatingScore::new),
            _ => None,
        }
    }

    fn from_field(field: &'static str, value: Option<&serde_json::Value>) -> Option<RatingScore> {
        let value = value?;
        let score = RatingScore::from_value(value);
        if score.is_none() && !is_blank(value) {
            tracing::warn!(field, %value, "ignoring non-integer rating");
        }
        score
    }
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, RecordError> {
    if value.trim().is_empty() {
        return Err(RecordError::MissingField(field));
    }
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| RecordError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn parse_time_field(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<ClockTime>, RecordError> {
    let Some(value) = value else {
        return Ok(None);
    };
    parse_clock_time(value).map_err(|e| match e {
        MetricsError::InvalidInput { hour, minute } => RecordError::TimeOutOfRange {
            field,
            hour,
            minute,
        },
        other => RecordError::InvalidTime {
            field,
            value: value.to_string(),
            reason: other.to_string(),
        },
    })
}
