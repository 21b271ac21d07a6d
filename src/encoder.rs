//! Report encoding
//!
//! This module wraps derived metrics into a `MetricsReport` with producer
//! metadata and a computation timestamp, and serializes it to JSON.

use crate::error::MetricsError;
use crate::types::{CheckinMetrics, EntryMetrics, Insights, MetricsReport, ReportProducer};
use crate::{METRICS_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current report format version
pub const REPORT_VERSION: &str = "1.0.0";

/// Encoder for producing metrics reports
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Assemble a report
    pub fn encode(
        &self,
        entries: Vec<EntryMetrics>,
        checkins: Vec<CheckinMetrics>,
        insights: Option<Insights>,
    ) -> MetricsReport {
        MetricsReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: METRICS_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            entries,
            checkins,
            insights,
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        entries: Vec<EntryMetrics>,
        checkins: Vec<CheckinMetrics>,
        insights: Option<Insights>,
    ) -> Result<String, MetricsError> {
        let report = self.encode(entries, checkins, insights);
        serde_json::to_string_pretty(&report).map_err(|e| MetricsError::EncodingError(e.to_string()))
    }
}
