//! Continuous measurement loop.
//!
//! Polls the device on a fixed interval and records every completed cycle
//! to a [`MetricSink`]: laser on, measure, record, sleep. Invalid readings
//! are recorded with the `-1` sentinel field value and never stop the
//! loop; transport failures do, leaving reconnection to the caller.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::sink::{MetricSink, Sample};
use crate::session::DeviceSession;
use crate::transport::Transport;
use crate::types::ReferencePoint;

/// Default poll interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Field name the distance is recorded under.
pub const DISTANCE_FIELD: &str = "distance_mm";

/// Configuration for the measurement loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Measurement name passed to the sink.
    pub measurement: String,
    /// Tags attached to every sample.
    pub tags: HashMap<String, String>,
    /// Reference point readings are reported from.
    pub reference: ReferencePoint,
    /// Delay between measurement cycles.
    pub interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            measurement: "laser_distance".into(),
            tags: HashMap::new(),
            reference: ReferencePoint::Top,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Measurement loop over a connected session.
pub struct Monitor<T, S> {
    session: DeviceSession<T>,
    sink: S,
    config: MonitorConfig,
}

impl<T: Transport, S: MetricSink> Monitor<T, S> {
    /// Creates a monitor over an already-connected session.
    #[must_use]
    pub const fn new(session: DeviceSession<T>, sink: S, config: MonitorConfig) -> Self {
        Self {
            session,
            sink,
            config,
        }
    }

    /// Runs measurement cycles until `shutdown` resolves or the transport
    /// fails.
    ///
    /// Shutdown is honored between exchanges, never mid-exchange. Sink
    /// write failures are logged and the loop continues; a transport
    /// failure returns the error with the session already forced to
    /// disconnected.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            self.session.set_laser(true).await?;
            let measurement = self.session.measure(self.config.reference).await?;

            let sample = Sample {
                measurement: self.config.measurement.clone(),
                tags: self.config.tags.clone(),
                fields: HashMap::from([(
                    DISTANCE_FIELD.to_string(),
                    measurement.distance.as_millimeters(),
                )]),
                timestamp_secs: unix_timestamp(),
            };

            tracing::debug!(distance = ?measurement.distance, "measurement cycle complete");
            if let Err(e) = self.sink.record(sample).await {
                tracing::warn!("sink write failed: {e}");
            }

            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!("monitor stopped");
                    return Ok(());
                }
                () = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }

    /// Consumes the monitor, returning the session for teardown.
    #[must_use]
    pub fn into_session(self) -> DeviceSession<T> {
        self.session
    }
}

/// Current Unix timestamp in seconds.
fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
