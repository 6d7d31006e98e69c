//! Wire frame types
//!
//! This module provides types for the header of a transfer: the
//! command byte (direction + size) and the three address bytes
//! (device-select byte followed by a 16-bit big-endian register address).

mod address;
mod command;

pub use address::{decode_address, encode_address, DEVICE_SELECT};
pub use command::{CommandByte, Direction};
