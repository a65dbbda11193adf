//! Response frame decoding for the GLM protocol.
//!
//! The wire format of a response is:
//! ```text
//! ┌──────────┬──────────┬─────────────────┬──────────┐
//! │  status  │  length  │     payload     │ checksum │
//! │  1 byte  │  1 byte  │  length bytes   │  1 byte  │
//! └──────────┴──────────┴─────────────────┴──────────┘
//! ```
//!
//! The device computes and validates checksums itself and reports a
//! mismatch through the `checksum error` status code; the trailing
//! checksum byte is therefore not re-verified on receipt.

use bytes::Bytes;

use crate::error::FrameError;
use crate::protocol::status::StatusCode;

/// Minimum response size (status + length byte).
pub const MIN_RESPONSE_SIZE: usize = 2;

/// A decoded response frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Outcome reported by the device.
    pub status: StatusCode,
    /// Payload bytes; only meaningful when `status` is ok.
    pub payload: Bytes,
}

/// Decodes a raw response into status and payload.
///
/// The payload is the declared number of bytes following the two-byte
/// header, clamped to what actually arrived. A truncated payload is not a
/// decode failure: command-specific interpreters treat it as an invalid
/// reading, which is a recoverable per-exchange condition.
///
/// # Errors
///
/// Returns [`FrameError::TooShort`] if `raw` cannot hold the status and
/// length bytes.
pub fn decode(raw: &[u8]) -> Result<Response, FrameError> {
    if raw.len() < MIN_RESPONSE_SIZE {
        return Err(FrameError::TooShort(raw.len()));
    }

    let status = StatusCode::from_byte(raw[0]);
    let declared = raw[1] as usize;
    let end = raw.len().min(MIN_RESPONSE_SIZE + declared);
    let payload = Bytes::copy_from_slice(&raw[MIN_RESPONSE_SIZE..end]);

    Ok(Response { status, payload })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ok_response() {
        let raw = [0x00, 0x04, 0x78, 0x56, 0x34, 0x12, 0xCC];
        let response = decode(&raw).unwrap();

        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(&response.payload[..], &[0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_decode_status_mapping() {
        let response = decode(&[0x0A, 0x00, 0x55]).unwrap();
        assert_eq!(response.status, StatusCode::DeviceNotReady);

        let response = decode(&[0x7F, 0x00, 0x55]).unwrap();
        assert_eq!(response.status, StatusCode::Unrecognized(0x7F));
    }

    #[test]
    fn test_decode_too_short() {
        assert!(matches!(decode(&[]), Err(FrameError::TooShort(0))));
        assert!(matches!(decode(&[0x00]), Err(FrameError::TooShort(1))));
    }

    #[test]
    fn test_decode_excludes_checksum_from_payload() {
        // Length byte says 4; the trailing 0xCC is the checksum, not payload
        let raw = [0x00, 0x04, 0x01, 0x02, 0x03, 0x04, 0xCC];
        let response = decode(&raw).unwrap();
        assert_eq!(response.payload.len(), 4);
    }

    #[test]
    fn test_decode_truncated_payload_is_clamped() {
        // Declared length 4 but only 2 payload bytes arrived
        let raw = [0x00, 0x04, 0x01, 0x02];
        let response = decode(&raw).unwrap();

        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(&response.payload[..], &[0x01, 0x02]);
    }

    #[test]
    fn test_decode_empty_payload() {
        let response = decode(&[0x00, 0x00]).unwrap();
        assert_eq!(response.status, StatusCode::Ok);
        assert!(response.payload.is_empty());
    }
}
