//! Adapter for turning raw record payloads into parsed values
//!
//! Handles both JSON arrays and NDJSON, and converts whole batches so callers
//! get either a fully validated, date-ordered list or the first error.

use crate::error::MetricsError;
use crate::schema::record::{MoodCheckinRecord, Record, RecordError, SleepEntryRecord};
use crate::types::{ParsedCheckin, ParsedSleepEntry};
use serde::de::DeserializeOwned;

/// Adapter for converting raw records to parsed values
pub struct RecordAdapter;

impl RecordAdapter {
    /// Parse a JSON string containing an array of records
    pub fn parse_array<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, MetricsError> {
        let records: Vec<T> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (newline-delimited JSON) containing records
    pub fn parse_ndjson<T: DeserializeOwned>(ndjson: &str) -> Result<Vec<T>, MetricsError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<T>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(MetricsError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Convert sleep entry records, ordered by date
    pub fn to_entries(records: &[SleepEntryRecord]) -> Result<Vec<ParsedSleepEntry>, MetricsError> {
        let mut entries = Self::convert(records)?;
        entries.sort_by_key(|e| e.entry_date);
        Ok(entries)
    }

    /// Convert check-in records, ordered by date then time
    pub fn to_checkins(records: &[MoodCheckinRecord]) -> Result<Vec<ParsedCheckin>, MetricsError> {
        let mut checkins = Self::convert(records)?;
        checkins.sort_by_key(|c| (c.entry_date, c.check_time));
        Ok(checkins)
    }

    fn convert<R: Record>(records: &[R]) -> Result<Vec<R::Parsed>, MetricsError> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record.to_parsed().map_err(|e| {
                    tracing::debug!(index, error = %e, "rejecting record");
                    into_metrics_error(index, record.label(), e)
                })
            })
            .collect()
    }

    /// Validate a batch of records, returning only the failures
    pub fn validate_records<R: Record>(records: &[R]) -> Vec<ValidationResult> {
        records
            .iter()
            .enumerate()
            .map(|(idx, record)| ValidationResult {
                index: idx,
                label: record.label(),
                result: record.validate().err(),
            })
            .filter(|r| r.result.is_some())
            .collect()
    }
}

/// Out-of-range times keep their own error kind so callers can tell a
/// data-entry bug from a malformed payload
fn into_metrics_error(index: usize, label: Option<String>, error: RecordError) -> MetricsError {
    match error {
        RecordError::TimeOutOfRange { hour, minute, .. } => {
            MetricsError::InvalidInput { hour, minute }
        }
        other => MetricsError::ParseError(format!(
            "Invalid record {} (index {}): {}",
            label.as_deref().unwrap_or("unknown"),
            index,
            other
        )),
    }
}

/// Result of record validation
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub label: Option<String>,
    pub result: Option<RecordError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const ENTRIES_NDJSON: &str = r#"
{"entry_date": "2024-03-03", "bed_time": "23:00", "wake_time": "07:00", "overall_mood": 7}

{"entry_date": "2024-03-01", "bed_time": "22:30", "wake_time": "06:15", "overall_mood": 5}
"#;

    #[test]
    fn test_parse_ndjson_skips_blank_lines() {
        let records: Vec<SleepEntryRecord> = RecordAdapter::parse_ndjson(ENTRIES_NDJSON).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let input = "{\"entry_date\": \"2024-03-01\"}\nnot json\n";
        let err = RecordAdapter::parse_ndjson::<SleepEntryRecord>(input).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_array() {
        let json = r#"[{"entry_date": "2024-03-01", "check_time": "09:00", "mood_level": 6, "energy_level": 4}]"#;
        let records: Vec<MoodCheckinRecord> = RecordAdapter::parse_array(json).unwrap();
        assert_eq!(records.len(), 1);
        assert!(RecordAdapter::parse_array::<MoodCheckinRecord>("{").is_err());
    }

    #[test]
    fn test_entries_sorted_by_date() {
        let records: Vec<SleepEntryRecord> = RecordAdapter::parse_ndjson(ENTRIES_NDJSON).unwrap();
        let entries = RecordAdapter::to_entries(&records).unwrap();
        assert_eq!(entries[0].entry_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(entries[1].entry_date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
    }

    #[test]
    fn test_out_of_range_time_surfaces_as_invalid_input() {
        let records = vec![SleepEntryRecord {
            entry_date: "2024-03-01".to_string(),
            wake_time: Some("07:75".to_string()),
            ..Default::default()
        }];
        assert!(matches!(
            RecordAdapter::to_entries(&records),
            Err(MetricsError::InvalidInput { hour: 7, minute: 75 })
        ));
    }

    #[test]
    fn test_validate_records() {
        let records = vec![
            MoodCheckinRecord {
                entry_date: "2024-03-01".to_string(),
                check_time: "09:00".to_string(),
                ..Default::default()
            },
            MoodCheckinRecord {
                id: Some(9),
                entry_date: "2024-03-01".to_string(),
                check_time: "9am".to_string(),
                ..Default::default()
            },
        ];

        let failures = RecordAdapter::validate_records(&records);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[0].label.as_deref(), Some("#9"));
    }
}
