//! Measurement payload parsing.
//!
//! A measure response carries the raw distance as an unsigned 32-bit
//! little-endian integer at payload offset 0 (bytes 2..6 of the full
//! frame), in units of 0.05 mm.

use crate::types::Distance;

/// Scale from the raw distance field to millimeters.
pub const DISTANCE_SCALE_MM: f64 = 0.05;

/// Size of the raw distance field in bytes.
pub const DISTANCE_FIELD_LEN: usize = 4;

/// Parses the distance from a measure response payload.
///
/// A payload shorter than the distance field yields
/// [`Distance::Invalid`] rather than an error: corrupt readings are an
/// expected steady-state outcome and must not tear down the session.
#[must_use]
pub fn parse_distance(payload: &[u8]) -> Distance {
    if payload.len() < DISTANCE_FIELD_LEN {
        return Distance::Invalid;
    }

    let raw = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    Distance::Millimeters(f64::from(raw) * DISTANCE_SCALE_MM)
}
