//! Address bytes
//!
//! Three bytes follow the command byte: a fixed device-select byte and
//! a 16-bit big-endian register address. A responder that sees a foreign
//! device-select byte silently disengages for the rest of the transfer.

/// Fixed device-select byte identifying the register space
pub const DEVICE_SELECT: u8 = 0xD4;

/// Encode a register address into its three wire bytes
pub fn encode_address(addr: u16) -> [u8; 3] {
    let be = addr.to_be_bytes();
    [DEVICE_SELECT, be[0], be[1]]
}

/// Combine the two captured address bytes into the effective address
pub fn decode_address(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}
