//! Transport layer for GLM communication.
//!
//! This module provides the abstraction for different transport methods:
//! a native Bluetooth RFCOMM socket, and a serial port for device nodes
//! already bound with `rfcomm bind`.

pub mod rfcomm;
pub mod serial;

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::Result;

/// Trait for transport implementations.
///
/// The protocol is strictly request/response, so a transport only needs
/// sequential send and bounded receive; there is no background read loop.
pub trait Transport: Send {
    /// Connects to the device.
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Disconnects from the device. Must be idempotent.
    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Sends raw bytes to the device.
    fn send(&mut self, data: Bytes) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Receives up to `max_len` bytes from the device, blocking until at
    /// least one byte arrives.
    fn recv(&mut self, max_len: usize) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>>;

    /// Returns true if connected.
    fn is_connected(&self) -> bool;
}

pub use rfcomm::RfcommTransport;
pub use serial::SerialTransport;
