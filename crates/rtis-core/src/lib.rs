//! rtis-core - Responder-side engine for a TPM-style SPI register interface
//!
//! This crate models the subordinate (responder) end of the byte-serial
//! command/address/data protocol used by TPM-style FIFO register spaces
//! (SPI mode 0). The heart of the crate is [`engine::TisEngine`], a
//! bit-synchronous state machine that is stepped once per clock edge and
//! has no notion of wall-clock time. It is designed to be `no_std`
//! compatible so the same engine can back a host-side simulation or run
//! on a microcontroller bridging a real bus.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable heap allocation (raw wire captures)
//!
//! # Example
//!
//! ```ignore
//! use rtis_core::engine::{SampleInput, TisEngine};
//!
//! let mut engine = TisEngine::new();
//! engine.chip_select(true);
//! // drive one clock period
//! let out = engine.rising_edge(SampleInput::bit(true));
//! let miso = engine.falling_edge(true);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod delay;
pub mod engine;
pub mod error;
pub mod frame;
pub mod host;
pub mod provider;

pub use error::{Error, Result};
