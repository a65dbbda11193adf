//! Protocol definitions for GLM communication.
//!
//! This module contains the low-level protocol types including:
//! - Command frame templates
//! - Response frame decoding
//! - Status code taxonomy
//! - Measurement payload parsing

pub mod command;
pub mod frame;
pub mod parser;
pub mod status;

pub use command::{COMMAND_START, Command};
pub use frame::{MIN_RESPONSE_SIZE, Response, decode};
pub use parser::{DISTANCE_FIELD_LEN, DISTANCE_SCALE_MM, parse_distance};
pub use status::StatusCode;
