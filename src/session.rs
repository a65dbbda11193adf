//! Device session: connection lifecycle and the command API.
//!
//! A [`DeviceSession`] exclusively owns its transport and sequences
//! strictly synchronous request/response exchanges: write one command
//! frame, block for one bounded response, decode, repeat. Every exchange
//! takes `&mut self`, so a second command cannot be issued while one is
//! in flight.

use std::time::Duration;

use bytes::Bytes;

use crate::discovery;
use crate::error::{Error, Result};
use crate::protocol::{Command, Response, StatusCode, frame, parse_distance};
use crate::transport::{RfcommTransport, SerialTransport, Transport};
use crate::types::{DeviceAddress, DeviceModel, Distance, Measurement, ReferencePoint};

/// Default exchange timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on a single response read.
pub const MAX_RESPONSE_LEN: usize = 1024;

/// Session with a rangefinder.
///
/// Lifecycle: `disconnected` → [`connect`](Self::connect) → `connected` →
/// [`close`](Self::close) (or any transport failure) → `disconnected`.
/// Transport-level failures force the session back to disconnected;
/// protocol-level failures (non-ok status, corrupt payload) are
/// per-exchange outcomes and leave the session connected.
pub struct DeviceSession<T> {
    transport: T,
    timeout: Duration,
}

impl DeviceSession<RfcommTransport> {
    /// Creates a session over Bluetooth RFCOMM (not yet connected).
    #[must_use]
    pub const fn rfcomm(address: DeviceAddress) -> Self {
        Self::new(RfcommTransport::new(address))
    }

    /// Finds a device of the given model via an inquiry scan and creates
    /// a session for it (not yet connected).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if no matching device answers
    /// within the scan window.
    pub async fn discover(model: DeviceModel, scan_timeout: Duration) -> Result<Self> {
        let address = discovery::find_by_model(model, scan_timeout).await?;
        Ok(Self::rfcomm(address))
    }
}

impl DeviceSession<SerialTransport> {
    /// Creates a session over a pre-bound serial device node such as
    /// `/dev/rfcomm0` (not yet connected).
    #[must_use]
    pub fn serial(path: impl Into<String>) -> Self {
        Self::new(SerialTransport::with_path(path))
    }
}

impl<T: Transport> DeviceSession<T> {
    /// Creates a session over the given transport (not yet connected).
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-exchange response timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Returns true if the transport stream is open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Opens the transport stream.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::ConnectionFailed`] if the stream cannot be
    /// opened; any partially-opened handle is closed first, so the
    /// session is never left half-open.
    pub async fn connect(&mut self) -> Result<()> {
        if let Err(e) = self.transport.connect().await {
            let _ = self.transport.disconnect().await;
            return Err(match e {
                Error::ConnectionFailed { .. } => e,
                other => Error::ConnectionFailed {
                    reason: other.to_string(),
                },
            });
        }
        Ok(())
    }

    /// Closes the session. Idempotent; a no-op when already disconnected.
    pub async fn close(&mut self) -> Result<()> {
        if self.transport.is_connected() {
            self.transport.disconnect().await?;
        }
        Ok(())
    }

    /// Sends a built-in command and decodes its response.
    ///
    /// # Errors
    ///
    /// Transport-level failures ([`Error::NotConnected`],
    /// [`Error::Timeout`], I/O) force disconnect and propagate; an
    /// undecodable response surfaces as [`Error::Frame`] with the session
    /// still connected.
    pub async fn send_command(&mut self, command: Command) -> Result<Response> {
        let raw = self.exchange(Bytes::from_static(command.frame())).await?;
        Ok(frame::decode(&raw)?)
    }

    /// Triggers a measurement and interprets the reading.
    ///
    /// A non-ok status or corrupt payload yields
    /// [`Distance::Invalid`], an expected steady-state outcome during
    /// noisy readings, not an error. Only transport-level failures are
    /// `Err`.
    pub async fn measure(&mut self, reference: ReferencePoint) -> Result<Measurement> {
        let response = match self.send_command(Command::Measure).await {
            Ok(response) => response,
            Err(Error::Frame(e)) => {
                tracing::debug!("undecodable measure response: {e}");
                return Ok(Measurement::invalid(reference));
            }
            Err(e) => return Err(e),
        };

        let distance = if response.status.is_ok() {
            parse_distance(&response.payload).from_reference(reference)
        } else {
            tracing::debug!(status = %response.status, "measure returned non-ok status");
            Distance::Invalid
        };

        Ok(Measurement {
            distance,
            reference,
            status: Some(response.status),
        })
    }

    /// Turns the laser on or off.
    ///
    /// Fire-and-forget: a non-ok status is logged and ignored. Transport
    /// failures still propagate.
    pub async fn set_laser(&mut self, on: bool) -> Result<()> {
        let command = if on { Command::LaserOn } else { Command::LaserOff };
        self.send_acknowledged(command).await
    }

    /// Turns the display backlight on or off.
    ///
    /// Fire-and-forget: a non-ok status is logged and ignored. Transport
    /// failures still propagate.
    pub async fn set_backlight(&mut self, on: bool) -> Result<()> {
        let command = if on {
            Command::BacklightOn
        } else {
            Command::BacklightOff
        };
        self.send_acknowledged(command).await
    }

    /// Sends arbitrary command bytes and returns the decoded payload and
    /// status.
    ///
    /// Escape hatch for undocumented commands; the caller is fully
    /// responsible for frame correctness, including the checksum. Uses
    /// the same one-exchange-at-a-time discipline as every other command.
    pub async fn raw_command(&mut self, bytes: Bytes) -> Result<(Bytes, StatusCode)> {
        let raw = self.exchange(bytes).await?;
        let response = frame::decode(&raw)?;
        Ok((response.payload, response.status))
    }

    async fn send_acknowledged(&mut self, command: Command) -> Result<()> {
        match self.send_command(command).await {
            Ok(response) if response.status.is_ok() => {}
            Ok(response) => {
                tracing::warn!(?command, status = %response.status, "command not acknowledged");
            }
            Err(Error::Frame(e)) => {
                tracing::warn!(?command, "undecodable response: {e}");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// One write/read exchange against the transport.
    async fn exchange(&mut self, data: Bytes) -> Result<Bytes> {
        if !self.transport.is_connected() {
            return Err(Error::NotConnected);
        }

        tracing::trace!("sending {}", hex::encode(&data));
        if let Err(e) = self.transport.send(data).await {
            let _ = self.transport.disconnect().await;
            return Err(e);
        }

        let raw = match tokio::time::timeout(self.timeout, self.transport.recv(MAX_RESPONSE_LEN))
            .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                let _ = self.transport.disconnect().await;
                return Err(e);
            }
            Err(_) => {
                let _ = self.transport.disconnect().await;
                return Err(Error::Timeout {
                    timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
        };

        tracing::trace!("received {}", hex::encode(&raw));
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;

    use super::*;

    /// Scripted transport: pops one canned response per exchange.
    #[derive(Default)]
    struct MockTransport {
        connected: bool,
        fail_connect: bool,
        hang_on_recv: bool,
        responses: VecDeque<Bytes>,
        sent: Vec<Bytes>,
    }

    impl MockTransport {
        fn connected_with(responses: &[&'static [u8]]) -> Self {
            Self {
                connected: true,
                responses: responses.iter().copied().map(Bytes::from_static).collect(),
                ..Self::default()
            }
        }
    }

    impl Transport for MockTransport {
        fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
            Box::pin(async move {
                if self.fail_connect {
                    return Err(Error::ConnectionFailed {
                        reason: "refused".into(),
                    });
                }
                self.connected = true;
                Ok(())
            })
        }

        fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
            Box::pin(async move {
                self.connected = false;
                Ok(())
            })
        }

        fn send(&mut self, data: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
            Box::pin(async move {
                self.sent.push(data);
                Ok(())
            })
        }

        fn recv(
            &mut self,
            _max_len: usize,
        ) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>> {
            Box::pin(async move {
                if self.hang_on_recv {
                    std::future::pending::<()>().await;
                }
                self.responses.pop_front().ok_or(Error::NotConnected)
            })
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    #[tokio::test]
    async fn test_command_on_disconnected_session() {
        let mut session = DeviceSession::new(MockTransport::default());

        let err = session.send_command(Command::Measure).await.unwrap_err();
        assert!(matches!(err, Error::NotConnected));
        // No transport write may have been attempted
        assert!(session.transport.sent.is_empty());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let mut session = DeviceSession::new(MockTransport::connected_with(&[]));

        session.close().await.unwrap();
        assert!(!session.is_connected());
        session.close().await.unwrap();
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let mut session = DeviceSession::new(MockTransport {
            fail_connect: true,
            ..MockTransport::default()
        });

        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, Error::ConnectionFailed { .. }));
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_measure_ok() {
        // Raw 100 -> 5.0 mm from top, +110 from the back edge
        let mut session = DeviceSession::new(MockTransport::connected_with(&[&[
            0x00, 0x04, 0x64, 0x00, 0x00, 0x00, 0x1E,
        ]]));

        let measurement = session.measure(ReferencePoint::Back).await.unwrap();
        assert_eq!(measurement.distance, Distance::Millimeters(115.0));
        assert_eq!(measurement.status, Some(StatusCode::Ok));
        assert_eq!(
            &session.transport.sent[0][..],
            Command::Measure.frame().as_slice()
        );
    }

    #[tokio::test]
    async fn test_measure_non_ok_status_yields_invalid() {
        let mut session =
            DeviceSession::new(MockTransport::connected_with(&[&[0x0A, 0x00, 0x55]]));

        let measurement = session.measure(ReferencePoint::Top).await.unwrap();
        assert_eq!(measurement.distance, Distance::Invalid);
        assert_eq!(measurement.status, Some(StatusCode::DeviceNotReady));
        assert!(session.is_connected());
    }

    #[tokio::test]
    async fn test_measure_undecodable_response_yields_invalid() {
        let mut session = DeviceSession::new(MockTransport::connected_with(&[&[0x00]]));

        let measurement = session.measure(ReferencePoint::Top).await.unwrap();
        assert_eq!(measurement.distance, Distance::Invalid);
        assert_eq!(measurement.status, None);
        assert!(session.is_connected());
    }

    #[tokio::test]
    async fn test_measure_short_payload_yields_invalid() {
        let mut session =
            DeviceSession::new(MockTransport::connected_with(&[&[0x00, 0x02, 0x64, 0x00]]));

        let measurement = session.measure(ReferencePoint::Back).await.unwrap();
        // Offset must not be applied to the sentinel
        assert_eq!(measurement.distance, Distance::Invalid);
        assert_eq!(measurement.status, Some(StatusCode::Ok));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_forces_disconnect() {
        let mut session = DeviceSession::new(MockTransport {
            connected: true,
            hang_on_recv: true,
            ..MockTransport::default()
        });

        let err = session.measure(ReferencePoint::Top).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { timeout_ms: 5000 }));
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_set_laser_tolerates_bad_status() {
        let mut session =
            DeviceSession::new(MockTransport::connected_with(&[&[0x08, 0x00, 0x55]]));

        session.set_laser(true).await.unwrap();
        assert!(session.is_connected());
        assert_eq!(
            &session.transport.sent[0][..],
            Command::LaserOn.frame().as_slice()
        );
    }

    #[tokio::test]
    async fn test_set_backlight_sends_matching_frame() {
        let mut session =
            DeviceSession::new(MockTransport::connected_with(&[&[0x00, 0x00, 0x55]]));

        session.set_backlight(false).await.unwrap();
        assert_eq!(
            &session.transport.sent[0][..],
            Command::BacklightOff.frame().as_slice()
        );
    }

    #[tokio::test]
    async fn test_raw_command_roundtrip() {
        let mut session = DeviceSession::new(MockTransport::connected_with(&[&[
            0x00, 0x02, 0xDE, 0xAD, 0x55,
        ]]));

        let (payload, status) = session
            .raw_command(Bytes::from_static(&[0xC0, 0x55, 0x00, 0x00]))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(&payload[..], &[0xDE, 0xAD]);
    }

    #[tokio::test]
    async fn test_raw_command_surfaces_frame_error() {
        let mut session = DeviceSession::new(MockTransport::connected_with(&[&[0x00]]));

        let err = session
            .raw_command(Bytes::from_static(&[0xC0, 0x55, 0x00, 0x00]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Frame(_)));
        // A malformed response is a failed exchange, not a dead session
        assert!(session.is_connected());
    }
}
