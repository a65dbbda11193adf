//! Data types for GLM entities.
//!
//! This module contains the core data structures used throughout the
//! library:
//! - Device models and transport addresses
//! - Distance readings and reference points

pub mod device;
pub mod measurement;

pub use device::{DeviceAddress, DeviceModel};
pub use measurement::{Distance, Measurement, ReferencePoint};
