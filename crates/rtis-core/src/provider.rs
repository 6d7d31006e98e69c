//! Data provider trait definitions
//!
//! The engine does not store register contents itself. It emits request
//! strobes toward a data provider - the register file that actually holds
//! values - and consumes the provider's response signals on subsequent
//! clock edges. The trait is the software-facing rendition of that
//! interface boundary.

/// A write strobe toward the provider: one byte at a latched address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteRequest {
    /// Effective 16-bit register address
    pub addr: u16,
    /// The byte shifted in off the wire
    pub value: u8,
}

/// The register-file side of the engine interface
///
/// Timing contract: after `read_request(addr)` the provider must make the
/// byte available through `take_read_data` within core-compatible latency.
/// For the first byte of a read the engine waits indefinitely (the wire
/// protocol's wait state has no timeout); for subsequent bytes the strobe
/// is issued one byte-period ahead, so a provider slower than that misses
/// its deadline - a correctness violation the engine counts rather than
/// hides.
///
/// Cancellation: chip-select may deassert at any time, in which case a
/// requested byte is never consumed. A provider with read side effects
/// (e.g. a FIFO pop) must tolerate the response never being delivered.
pub trait RegisterProvider {
    /// Store `value` at `addr`
    ///
    /// The returned acknowledgement is informational only; this protocol
    /// variant has no byte-level back-pressure path for writes.
    fn write_request(&mut self, addr: u16, value: u8) -> bool;

    /// Begin fetching the byte at `addr`
    fn read_request(&mut self, addr: u16);

    /// Poll for the byte of the most recent `read_request`
    ///
    /// Called once per sample edge. Returns `Some` exactly once, when the
    /// data is ready.
    fn take_read_data(&mut self) -> Option<u8>;
}
