//! # bosch-glm
//!
//! A Rust client library for Bosch GLM laser rangefinders over Bluetooth.
//!
//! Supports the GLM 50 C and GLM 100 C (and should adapt to similar
//! Bluetooth-enabled Bosch measuring devices) via their RFCOMM serial
//! service.
//!
//! ## Features
//!
//! - Async/await based API using Tokio
//! - Bluetooth inquiry scanning with model matching
//! - Bit-exact implementation of the GLM command/response framing
//! - Distance readings with selectable reference point (top, tripod
//!   socket, back)
//! - Explicit sentinel handling for corrupt readings: a noisy
//!   measurement never tears down the session
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use bosch_glm::{DeviceModel, DeviceSession, ReferencePoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bosch_glm::Error> {
//!     // Find a GLM 50 C via inquiry scan and connect
//!     let mut session =
//!         DeviceSession::discover(DeviceModel::Glm50c, Duration::from_secs(8)).await?;
//!     session.connect().await?;
//!
//!     session.set_laser(true).await?;
//!     let measurement = session.measure(ReferencePoint::Top).await?;
//!     println!("distance: {:?} mm", measurement.distance.millimeters());
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! Known addresses can skip discovery:
//!
//! ```no_run
//! use bosch_glm::{DeviceAddress, DeviceModel, DeviceSession};
//!
//! # async fn example() -> Result<(), bosch_glm::Error> {
//! let address = DeviceAddress::new("00:13:43:BD:58:5C", DeviceModel::Glm50c);
//! let mut session = DeviceSession::rfcomm(address);
//! session.connect().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`protocol`] - Low-level protocol types (command frames, response
//!   decoding, status codes, measurement parsing)
//! - [`types`] - Data structures (device models, addresses, measurements)
//! - [`transport`] - Transport implementations (Bluetooth RFCOMM, serial)
//! - [`discovery`] - Bluetooth inquiry scanning
//! - [`session`] - High-level [`DeviceSession`] command API
//! - [`sink`] / [`monitor`] - Continuous measurement recording

pub mod discovery;
pub mod error;
pub mod monitor;
pub mod protocol;
pub mod session;
pub mod sink;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use discovery::{DEFAULT_SCAN_TIMEOUT, DiscoveredDevice, find_by_model, scan};
pub use error::{Error, FrameError, Result};
pub use monitor::{Monitor, MonitorConfig};
pub use protocol::{Command, Response, StatusCode, parse_distance};
pub use session::DeviceSession;
pub use sink::{MetricSink, Sample};
pub use transport::{RfcommTransport, SerialTransport, Transport};
pub use types::{DeviceAddress, DeviceModel, Distance, Measurement, ReferencePoint};
