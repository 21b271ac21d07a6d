//! Wellness Metrics - Sleep, mood and energy calculations for a local tracker
//!
//! The calculator turns raw logged values into display-ready metrics through a
//! deterministic pipeline: record parsing → metrics derivation → insights
//! window → report encoding.
//!
//! ## Modules
//!
//! - **Calculator**: 12-hour time formatting, sleep duration with overnight
//!   wrap, mood/energy labels and the mood color palette
//! - **Records**: the loosely typed boundary where form and database values
//!   are parsed once into validated values
//! - **Insights**: rolling averages, sleep-aid comparison and a bed/wake time
//!   recommendation

pub mod clock;
pub mod duration;
pub mod encoder;
pub mod error;
pub mod features;
pub mod insights;
pub mod pipeline;
pub mod rating;
pub mod schema;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use clock::{format_12_hour, format_12_hour_parts, parse_clock_time};
pub use duration::{compute_duration, format_duration};
pub use error::MetricsError;
pub use insights::{InsightConfig, InsightStore};
pub use pipeline::{checkins_to_metrics, entries_to_metrics, MetricsProcessor};
pub use rating::{energy_label, mood_color, mood_label};

// Schema exports
pub use schema::{MoodCheckinRecord, RecordAdapter, SleepEntryRecord};

pub use types::{ClockTime, RatingScore, SleepDuration, SleepInterval};

/// Library version embedded in every report
pub const METRICS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "wellness-metrics";
