//! Bluetooth device discovery.
//!
//! Runs a BlueZ inquiry scan and matches discovered device names against
//! a rangefinder model. Discovery does not require (or hold) a connected
//! transport; it may run alongside an unrelated session's command loop.

use std::time::Duration;

use bluer::{Adapter, AdapterEvent};
use futures::{Stream, StreamExt, pin_mut};
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::types::{DeviceAddress, DeviceModel};

/// Default inquiry window.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(8);

/// A device visible during an inquiry scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Bluetooth address.
    pub address: String,
    /// Device name, if the adapter resolved one.
    pub name: Option<String>,
}

/// Scans for nearby devices within the timeout window.
///
/// No ordering is guaranteed; the underlying stack reports devices as
/// they answer the inquiry.
pub async fn scan(timeout: Duration) -> Result<Vec<DiscoveredDevice>> {
    let session = bluer::Session::new().await?;
    let adapter = session.default_adapter().await?;
    adapter.set_powered(true).await?;

    tracing::debug!(adapter = %adapter.name(), "starting inquiry scan");
    let events = adapter.discover_devices().await?;
    pin_mut!(events);

    let deadline = Instant::now() + timeout;
    let mut found = Vec::new();

    while let Some(device) = next_discovered(&adapter, &mut events, deadline).await? {
        found.push(device);
    }

    tracing::debug!(count = found.len(), "inquiry scan finished");
    Ok(found)
}

/// Finds the first device whose name matches the given model.
///
/// Matching is a case-insensitive substring test, so full inquiry names
/// like `BOSCH GLM50C 12345` match their model. The scan stops at the
/// first hit.
///
/// # Errors
///
/// Returns [`Error::DeviceNotFound`] if nothing matches within the
/// timeout window, a normal outcome when the device is off or out of
/// range.
pub async fn find_by_model(model: DeviceModel, timeout: Duration) -> Result<DeviceAddress> {
    tracing::info!(%model, "searching for rangefinder");

    let session = bluer::Session::new().await?;
    let adapter = session.default_adapter().await?;
    adapter.set_powered(true).await?;

    tracing::debug!(adapter = %adapter.name(), "starting inquiry scan");
    let events = adapter.discover_devices().await?;
    pin_mut!(events);

    let deadline = Instant::now() + timeout;

    while let Some(device) = next_discovered(&adapter, &mut events, deadline).await? {
        if matches_model(&device, model) {
            tracing::info!(address = %device.address, name = ?device.name, "found rangefinder");
            return Ok(DeviceAddress {
                address: device.address,
                channel: model.channel(),
                name: device.name,
            });
        }
    }

    Err(Error::DeviceNotFound { model })
}

/// Selects the first matching device from already-collected scan results.
#[must_use]
pub fn find_in<I>(devices: I, model: DeviceModel) -> Option<DeviceAddress>
where
    I: IntoIterator<Item = DiscoveredDevice>,
{
    devices
        .into_iter()
        .find(|device| matches_model(device, model))
        .map(|device| DeviceAddress {
            address: device.address,
            channel: model.channel(),
            name: device.name,
        })
}

fn matches_model(device: &DiscoveredDevice, model: DeviceModel) -> bool {
    device
        .name
        .as_ref()
        .is_some_and(|name| name.to_uppercase().contains(model.name()))
}

async fn next_discovered<S>(
    adapter: &Adapter,
    events: &mut S,
    deadline: Instant,
) -> Result<Option<DiscoveredDevice>>
where
    S: Stream<Item = AdapterEvent> + Unpin,
{
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }

        match tokio::time::timeout(remaining, events.next()).await {
            Ok(Some(AdapterEvent::DeviceAdded(addr))) => {
                // A failed name lookup must not abort the scan
                let name = adapter.device(addr)?.name().await.unwrap_or_default();
                tracing::debug!(address = %addr, name = ?name, "device discovered");
                return Ok(Some(DiscoveredDevice {
                    address: addr.to_string(),
                    name,
                }));
            }
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => return Ok(None),
        }
    }
}
