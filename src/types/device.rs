//! Device models and addressing.

use std::fmt;

/// Supported rangefinder variants.
///
/// The variants speak the same protocol and differ only in the RFCOMM
/// channel their serial service listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceModel {
    /// GLM 50 C.
    Glm50c,
    /// GLM 100 C.
    Glm100c,
}

impl DeviceModel {
    /// Returns the RFCOMM channel this model listens on.
    #[must_use]
    pub const fn channel(self) -> u8 {
        match self {
            Self::Glm50c => 5,
            Self::Glm100c => 1,
        }
    }

    /// Model string as it appears in the device's Bluetooth name
    /// (e.g. `BOSCH GLM50C 12345`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Glm50c => "GLM50C",
            Self::Glm100c => "GLM100C",
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transport identifier for a device.
///
/// The channel is fixed per device model at construction time, never
/// guessed per-connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAddress {
    /// Bluetooth address, e.g. `00:13:43:BD:58:5C`.
    pub address: String,
    /// RFCOMM channel of the serial service.
    pub channel: u8,
    /// Name reported during discovery, if the address came from a scan.
    pub name: Option<String>,
}

impl DeviceAddress {
    /// Creates an address for a known device, skipping discovery.
    #[must_use]
    pub fn new(address: impl Into<String>, model: DeviceModel) -> Self {
        Self {
            address: address.into(),
            channel: model.channel(),
            name: None,
        }
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.channel)
    }
}
