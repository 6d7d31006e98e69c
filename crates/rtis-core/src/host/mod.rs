//! Host-side (bus master) support
//!
//! The engine only makes sense opposite a bus master that wiggles the
//! clock, data and chip-select lines. This module provides the bit-bang
//! trait such a master implements plus the byte-oriented transfer tasks
//! (header composition, wait-state polling, oversize handling) built on
//! top of the raw bit primitive. In a real deployment the master is a
//! physical SPI controller; in tests it is the loopback bus from the
//! simulation crate.

mod bitbang;
mod tasks;

pub use bitbang::{single, BitbangHost};
#[cfg(feature = "alloc")]
pub use tasks::read_registers_raw;
pub use tasks::{read_registers, write_registers, DEFAULT_POLL_BUDGET};
