//! Serial port transport implementation.
//!
//! Useful when the device has already been bound to a device node with
//! `rfcomm bind` (e.g. `/dev/rfcomm0`), or when the RFCOMM link is bridged
//! by other means.

use std::future::Future;
use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use crate::error::{Error, Result};
use crate::transport::Transport;

/// Default baud rate. RFCOMM device nodes ignore the line rate, but the
/// serial API requires one.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Configuration for serial transport.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Serial port path (e.g., "/dev/rfcomm0").
    pub path: String,
    /// Baud rate.
    pub baud_rate: u32,
}

impl SerialConfig {
    /// Creates a new serial configuration with default settings.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    /// Sets the baud rate.
    #[must_use]
    pub const fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = rate;
        self
    }
}

/// Serial transport for GLM communication.
pub struct SerialTransport {
    config: SerialConfig,
    stream: Option<SerialStream>,
}

impl SerialTransport {
    /// Creates a new serial transport with the given configuration.
    #[must_use]
    pub const fn new(config: SerialConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Creates a new serial transport for the given port with default
    /// settings.
    #[must_use]
    pub fn with_path(path: impl Into<String>) -> Self {
        Self::new(SerialConfig::new(path))
    }
}

impl Transport for SerialTransport {
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.stream.is_some() {
                return Ok(());
            }

            tracing::info!(port = %self.config.path, "opening serial port");

            let stream = tokio_serial::new(&self.config.path, self.config.baud_rate)
                .open_native_async()
                .map_err(Error::Serial)?;

            self.stream = Some(stream);
            tracing::info!("serial port open");
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.stream.take().is_some() {
                tracing::info!(port = %self.config.path, "serial port closed");
            }
            Ok(())
        })
    }

    fn send(&mut self, data: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

            stream.write_all(&data).await.map_err(Error::Io)?;
            stream.flush().await.map_err(Error::Io)?;
            Ok(())
        })
    }

    fn recv(&mut self, max_len: usize) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

            let mut buf = BytesMut::zeroed(max_len);
            let n = stream.read(&mut buf).await.map_err(Error::Io)?;
            if n == 0 {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "serial port closed",
                )));
            }

            buf.truncate(n);
            Ok(buf.freeze())
        })
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_config_defaults() {
        let config = SerialConfig::new("/dev/rfcomm0");
        assert_eq!(config.path, "/dev/rfcomm0");
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
    }

    #[test]
    fn test_serial_config_builder() {
        let config = SerialConfig::new("/dev/rfcomm0").baud_rate(9600);
        assert_eq!(config.baud_rate, 9600);
    }

    #[test]
    fn test_new_transport_is_disconnected() {
        let transport = SerialTransport::with_path("/dev/rfcomm0");
        assert!(!transport.is_connected());
    }
}
