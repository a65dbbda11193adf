//! Status codes reported by the device.
//!
//! The first byte of every response frame is a status code indicating the
//! outcome of the last command. The lookup is total: bytes outside the
//! documented table map to [`StatusCode::Unrecognized`] instead of failing.

use std::fmt;

/// Outcome of a command as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Command executed successfully.
    Ok,
    /// Device-side communication timeout.
    CommunicationTimeout,
    /// Frame checksum did not match.
    ChecksumError,
    /// Command byte not understood.
    UnknownCommand,
    /// Command requires a higher access level.
    InvalidAccessLevel,
    /// Device hardware fault.
    HardwareError,
    /// Device not ready to execute the command.
    DeviceNotReady,
    /// Status byte outside the documented table.
    Unrecognized(u8),
}

impl StatusCode {
    /// Parses a status code from the first response byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Ok,
            1 => Self::CommunicationTimeout,
            3 => Self::ChecksumError,
            4 => Self::UnknownCommand,
            5 => Self::InvalidAccessLevel,
            8 => Self::HardwareError,
            10 => Self::DeviceNotReady,
            other => Self::Unrecognized(other),
        }
    }

    /// Returns true if the command succeeded.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::CommunicationTimeout => f.write_str("communication timeout"),
            Self::ChecksumError => f.write_str("checksum error"),
            Self::UnknownCommand => f.write_str("unknown command"),
            Self::InvalidAccessLevel => f.write_str("invalid access level"),
            Self::HardwareError => f.write_str("hardware error"),
            Self::DeviceNotReady => f.write_str("device not ready"),
            Self::Unrecognized(byte) => write!(f, "unrecognized (0x{byte:02X})"),
        }
    }
}
