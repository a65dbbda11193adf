//! Measurement values and reference points.

use crate::protocol::StatusCode;

/// Physical point on the device a distance is reported from.
///
/// The device always measures from its top edge; other reference points
/// are derived by adding the device geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReferencePoint {
    /// Top edge of the device (no offset).
    #[default]
    Top,
    /// Tripod socket (+40 mm).
    TripodSocket,
    /// Back edge of the device (+110 mm).
    Back,
}

impl ReferencePoint {
    /// Offset added to a top-edge distance for this reference point.
    #[must_use]
    pub const fn offset_mm(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::TripodSocket => 40.0,
            Self::Back => 110.0,
        }
    }
}

/// A distance reading, or the sentinel for a failed reading.
///
/// `Invalid` replaces the `-1` magic value of the wire-level API: a
/// corrupt payload or non-ok status yields `Invalid` rather than a number
/// that could be mistaken for a measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    /// A measured distance in millimeters.
    Millimeters(f64),
    /// No valid measurement was obtained.
    Invalid,
}

impl Distance {
    /// Rebases a top-edge distance onto the given reference point.
    ///
    /// `Invalid` propagates unchanged; the offset is never applied to the
    /// sentinel.
    #[must_use]
    pub fn from_reference(self, reference: ReferencePoint) -> Self {
        match self {
            Self::Millimeters(mm) => Self::Millimeters(mm + reference.offset_mm()),
            Self::Invalid => Self::Invalid,
        }
    }

    /// Returns true for an actual reading.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Millimeters(_))
    }

    /// Returns the distance in millimeters, if valid.
    #[must_use]
    pub const fn millimeters(self) -> Option<f64> {
        match self {
            Self::Millimeters(mm) => Some(mm),
            Self::Invalid => None,
        }
    }

    /// Returns the distance as a numeric field value, with `Invalid`
    /// encoded as `-1.0` for recording sinks.
    #[must_use]
    pub const fn as_millimeters(self) -> f64 {
        match self {
            Self::Millimeters(mm) => mm,
            Self::Invalid => -1.0,
        }
    }
}

/// One measurement cycle's outcome.
///
/// Produced and consumed per command; not persisted by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// The reading, rebased onto `reference`.
    pub distance: Distance,
    /// Reference point the distance is reported from.
    pub reference: ReferencePoint,
    /// Status reported by the device, or `None` if the response could not
    /// be decoded at all.
    pub status: Option<StatusCode>,
}

impl Measurement {
    /// A failed reading with no decodable device status.
    #[must_use]
    pub const fn invalid(reference: ReferencePoint) -> Self {
        Self {
            distance: Distance::Invalid,
            reference,
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_offsets() {
        let base = Distance::Millimeters(100.0);

        assert_eq!(
            base.from_reference(ReferencePoint::Top),
            Distance::Millimeters(100.0)
        );
        assert_eq!(
            base.from_reference(ReferencePoint::TripodSocket),
            Distance::Millimeters(140.0)
        );
        assert_eq!(
            base.from_reference(ReferencePoint::Back),
            Distance::Millimeters(210.0)
        );
    }

    #[test]
    fn test_invalid_propagates_through_offset() {
        assert_eq!(
            Distance::Invalid.from_reference(ReferencePoint::Back),
            Distance::Invalid
        );
    }

    #[test]
    fn test_field_value_sentinel() {
        assert_eq!(Distance::Millimeters(5.0).as_millimeters(), 5.0);
        assert_eq!(Distance::Invalid.as_millimeters(), -1.0);
    }

    #[test]
    fn test_millimeters_accessor() {
        assert_eq!(Distance::Millimeters(5.0).millimeters(), Some(5.0));
        assert_eq!(Distance::Invalid.millimeters(), None);
        assert!(Distance::Millimeters(0.0).is_valid());
        assert!(!Distance::Invalid.is_valid());
    }
}
