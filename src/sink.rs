//! Metric sink boundary.
//!
//! The driver does not talk to a time-series store itself; it hands each
//! measurement cycle to a [`MetricSink`] as a tagged, timestamped sample.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

/// One timestamped sample for a recording sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Measurement name, e.g. `laser_distance`.
    pub measurement: String,
    /// Free-form tags attached to the sample.
    pub tags: HashMap<String, String>,
    /// Numeric field values.
    pub fields: HashMap<String, f64>,
    /// Unix timestamp in seconds.
    pub timestamp_secs: u64,
}

/// Trait for recording sinks.
pub trait MetricSink: Send + Sync {
    /// Records one sample.
    fn record(&self, sample: Sample) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
