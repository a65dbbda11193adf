//! Error types for the bosch-glm library.

use thiserror::Error;

use crate::types::DeviceModel;

/// The main error type for rangefinder operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Bluetooth stack error.
    #[error("bluetooth error: {0}")]
    Bluetooth(#[from] bluer::Error),

    /// Serial port error.
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Response frame decoding error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Opening the transport stream failed.
    #[error("connection failed: {reason}")]
    ConnectionFailed { reason: String },

    /// No response arrived within the exchange timeout.
    ///
    /// The session is forced back to disconnected when this occurs.
    #[error("command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Command issued on a closed session.
    #[error("not connected")]
    NotConnected,

    /// Discovery found no matching device within the scan window.
    ///
    /// A normal outcome when the device is powered off or out of range.
    #[error("no {model} device found")]
    DeviceNotFound { model: DeviceModel },
}

/// Frame-specific errors.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Response too short to contain status and length bytes.
    #[error("response too short: need at least 2 bytes, got {0}")]
    TooShort(usize),
}

/// Result type alias for rangefinder operations.
pub type Result<T> = std::result::Result<T, Error>;
