//! Command byte encoding
//!
//! The first byte of every transfer. Bit 7 selects the direction
//! (1 = read), bits 6:2 are reserved and must be zero, bits 1:0 hold
//! the requested size minus one (1-4 bytes).

/// Transfer direction, latched from bit 7 of the command byte
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Host writes register bytes to the responder
    #[default]
    Write,
    /// Host reads register bytes from the responder
    Read,
}

const DIRECTION_BIT: u8 = 0x80;
const RESERVED_MASK: u8 = 0x7C;
const SIZE_MASK: u8 = 0x03;

/// A decoded command byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandByte {
    /// Transfer direction
    pub direction: Direction,
    /// Requested transfer size in bytes (1-4), before any boundary clamp
    pub len: u8,
}

impl CommandByte {
    /// Build a command byte for a transfer of `len` bytes (1-4)
    ///
    /// Returns `None` when the length cannot be encoded.
    pub fn new(direction: Direction, len: u8) -> Option<Self> {
        if len == 0 || len > 4 {
            return None;
        }
        Some(Self { direction, len })
    }

    /// Decode a command byte sampled off the wire
    ///
    /// Returns `None` when any reserved bit (6:2) is set; the transfer
    /// must then be silently rejected.
    pub fn decode(byte: u8) -> Option<Self> {
        if byte & RESERVED_MASK != 0 {
            return None;
        }
        let direction = if byte & DIRECTION_BIT != 0 {
            Direction::Read
        } else {
            Direction::Write
        };
        Some(Self {
            direction,
            len: (byte & SIZE_MASK) + 1,
        })
    }

    /// Encode into the wire representation
    pub fn encode(&self) -> u8 {
        let dir = match self.direction {
            Direction::Read => DIRECTION_BIT,
            Direction::Write => 0,
        };
        dir | ((self.len - 1) & SIZE_MASK)
    }
}
