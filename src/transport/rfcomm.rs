//! Bluetooth RFCOMM transport implementation.
//!
//! Connects to the device's serial service through a BlueZ RFCOMM stream
//! socket at `address:channel`.

use std::future::Future;
use std::io;
use std::pin::Pin;

use bluer::rfcomm::{SocketAddr, Stream};
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::DeviceAddress;

/// RFCOMM transport for GLM communication.
pub struct RfcommTransport {
    address: DeviceAddress,
    stream: Option<Stream>,
}

impl RfcommTransport {
    /// Creates a new transport targeting the given device address.
    #[must_use]
    pub const fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            stream: None,
        }
    }

    /// Returns the target device address.
    #[must_use]
    pub const fn address(&self) -> &DeviceAddress {
        &self.address
    }
}

impl Transport for RfcommTransport {
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.stream.is_some() {
                return Ok(());
            }

            tracing::info!(target_device = %self.address, "connecting to RFCOMM service");

            let addr: bluer::Address =
                self.address
                    .address
                    .parse()
                    .map_err(|e: bluer::InvalidAddress| Error::ConnectionFailed {
                        reason: e.to_string(),
                    })?;

            let target = SocketAddr::new(addr, self.address.channel);
            let stream = Stream::connect(target)
                .await
                .map_err(|e| Error::ConnectionFailed {
                    reason: e.to_string(),
                })?;

            self.stream = Some(stream);
            tracing::info!("connected");
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if self.stream.take().is_some() {
                tracing::info!(target_device = %self.address, "disconnected");
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
                    "connection closed by device",
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
