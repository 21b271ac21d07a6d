//! Pipeline orchestration
//!
//! This module provides the public API for wellness metrics.
//! It runs raw records through parsing, derivation and encoding, and
//! optionally feeds them into a persistent insights window.

use crate::encoder::ReportEncoder;
use crate::error::MetricsError;
use crate::features::MetricsDeriver;
use crate::insights::{InsightConfig, InsightStore};
use crate::schema::{MoodCheckinRecord, RecordAdapter, SleepEntryRecord};
use crate::types::{CheckinMetrics, EntryMetrics, Insights, MetricsReport};

/// Convert a JSON array of sleep entry records into a metrics report.
///
/// # Arguments
/// * `raw_json` - JSON array of sleep entry records
///
/// # Returns
/// Pretty-printed report JSON with one metrics object per entry
///
/// # Example
/// ```ignore
/// let report = entries_to_metrics(
///     r#"[{"entry_date": "2024-01-15", "bed_time": "23:00", "wake_time": "07:00"}]"#
///         .to_string(),
/// )?;
/// ```
pub fn entries_to_metrics(raw_json: String) -> Result<String, MetricsError> {
    let records: Vec<SleepEntryRecord> = RecordAdapter::parse_array(&raw_json)?;
    let entries = RecordAdapter::to_entries(&records)?;
    let metrics = entries.iter().map(MetricsDeriver::entry).collect();

    ReportEncoder::new().encode_to_json(metrics, Vec::new(), None)
}

/// Convert a JSON array of check-in records into a metrics report.
pub fn checkins_to_metrics(raw_json: String) -> Result<String, MetricsError> {
    let records: Vec<MoodCheckinRecord> = RecordAdapter::parse_array(&raw_json)?;
    let checkins = RecordAdapter::to_checkins(&records)?;
    let metrics = checkins.iter().map(MetricsDeriver::checkin).collect();

    ReportEncoder::new().encode_to_json(Vec::new(), metrics, None)
}

/// Stateful processor that keeps an insights window across calls.
///
/// Use this when averages and recommendations should cover more than a
/// single batch of records.
pub struct MetricsProcessor {
    insight_store: InsightStore,
    encoder: ReportEncoder,
}

impl Default for MetricsProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProcessor {
    /// Create a new processor with default settings
    pub fn new() -> Self {
        Self {
            insight_store: InsightStore::default(),
            encoder: ReportEncoder::new(),
        }
    }

    /// Create a processor with a specific insights configuration
    pub fn with_config(config: InsightConfig) -> Result<Self, MetricsError> {
        config.validate()?;
        Ok(Self {
            insight_store: InsightStore::new(config),
            encoder: ReportEncoder::new(),
        })
    }

    pub fn config(&self) -> &InsightConfig {
        self.insight_store.config()
    }

    /// Replace the insights configuration, keeping the recorded window
    pub fn set_config(&mut self, config: InsightConfig) -> Result<(), MetricsError> {
        config.validate()?;
        self.insight_store.set_config(config);
        Ok(())
    }

    /// Load insights window state from JSON
    pub fn load_state(&mut self, json: &str) -> Result<(), MetricsError> {
        let store =
            InsightStore::from_json(json).map_err(|e| MetricsError::ParseError(e.to_string()))?;
        store.config().validate()?;
        self.insight_store = store;
        Ok(())
    }

    /// Save insights window state to JSON
    pub fn save_state(&self) -> Result<String, MetricsError> {
        self.insight_store
            .to_json()
            .map_err(|e| MetricsError::EncodingError(e.to_string()))
    }

    /// Derive metrics for sleep entries and add them to the window
    pub fn process_entries(
        &mut self,
        records: &[SleepEntryRecord],
    ) -> Result<Vec<EntryMetrics>, MetricsError> {
        let entries = RecordAdapter::to_entries(records)?;

        let mut metrics = Vec::with_capacity(entries.len());
        for entry in &entries {
            self.insight_store.add_entry(entry);
            metrics.push(MetricsDeriver::entry(entry));
        }

        tracing::debug!(count = metrics.len(), "processed sleep entries");
        Ok(metrics)
    }

    /// Derive metrics for check-ins and add their energy levels to the window
    pub fn process_checkins(
        &mut self,
        records: &[MoodCheckinRecord],
    ) -> Result<Vec<CheckinMetrics>, MetricsError> {
        let checkins = RecordAdapter::to_checkins(records)?;

        let mut metrics = Vec::with_capacity(checkins.len());
        for checkin in &checkins {
            self.insight_store.add_checkin(checkin);
            metrics.push(MetricsDeriver::checkin(checkin));
        }

        tracing::debug!(count = metrics.len(), "processed check-ins");
        Ok(metrics)
    }

    /// Process a JSON array of sleep entries and return report JSON
    /// including the updated insights
    pub fn process_entries_json(&mut self, raw_json: &str) -> Result<String, MetricsError> {
        let records: Vec<SleepEntryRecord> = RecordAdapter::parse_array(raw_json)?;
        let metrics = self.process_entries(&records)?;
        self.encoder
            .encode_to_json(metrics, Vec::new(), Some(self.insights()))
    }

    /// Process a JSON array of check-ins and return report JSON
    /// including the updated insights
    pub fn process_checkins_json(&mut self, raw_json: &str) -> Result<String, MetricsError> {
        let records: Vec<MoodCheckinRecord> = RecordAdapter::parse_array(raw_json)?;
        let metrics = self.process_checkins(&records)?;
        self.encoder
            .encode_to_json(Vec::new(), metrics, Some(self.insights()))
    }

    /// Summary of the current insights window
    pub fn insights(&self) -> Insights {
        self.insight_store.insights()
    }

    /// Wrap already derived metrics in a report from this processor
    pub fn report(
        &self,
        entries: Vec<EntryMetrics>,
        checkins: Vec<CheckinMetrics>,
        with_insights: bool,
    ) -> MetricsReport {
        let insights = with_insights.then(|| self.insights());
        self.encoder.encode(entries, checkins, insights)
    }
}
