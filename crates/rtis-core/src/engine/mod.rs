//! The responder protocol engine
//!
//! A bit-synchronous state machine driven purely by clock edges and the
//! chip-select level. Each clock period has two strictly ordered steps:
//! [`TisEngine::rising_edge`] samples the input line and advances the
//! decode pipeline, [`TisEngine::falling_edge`] drives the response line
//! for the next sample (SPI mode 0). The two steps are deliberately
//! separate functions - drive-time behavior must reflect state decided at
//! the prior sample edge, so collapsing them would be wrong.
//!
//! One transfer spans one chip-select assertion: command byte, three
//! address bytes, then data. Malformed or foreign transfers are not
//! answered with an error - the engine disengages and leaves the line
//! released for the rest of the assertion, which is the only rejection
//! signal this wire protocol has.

use crate::delay::DelayLine;
use crate::error::Result;
use crate::frame::{self, CommandByte, Direction};
use crate::provider::WriteRequest;

/// Decode phase within an engaged transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Command,
    DeviceSelect,
    AddressHigh,
    AddressLow,
    Wait,
    Write,
    Read,
}

/// Engine state across one chip-select assertion
///
/// `Disengaged` is the "mask chip-select" trick made explicit: the
/// physical line is still asserted but the engine pretends it is not,
/// ignoring all further clock activity until the line really deasserts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Active(Phase),
    Disengaged,
}

/// Signals consumed on a sample (rising) edge
#[derive(Clone, Copy, Debug)]
pub struct SampleInput {
    /// Chip-select level, true = asserted
    pub cs_active: bool,
    /// The input data line as sampled on this edge
    pub mosi: bool,
    /// Provider response to an earlier read request, `Some` = data ready
    pub read_data: Option<u8>,
    /// Provider write acknowledgement (informational only)
    pub write_ack: bool,
}

impl SampleInput {
    /// A plain data bit with chip-select asserted and no provider signals
    pub fn bit(mosi: bool) -> Self {
        Self {
            cs_active: true,
            mosi,
            read_data: None,
            write_ack: false,
        }
    }
}

/// Request strobes produced on a sample edge
///
/// At most one of the two is `Some` on any edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeOutput {
    /// Write strobe toward the provider
    pub write_request: Option<WriteRequest>,
    /// Read strobe toward the provider, carrying the latched address
    pub read_request: Option<u16>,
}

impl EdgeOutput {
    fn from_request(request: Option<Request>) -> Self {
        match request {
            Some(Request::Write(w)) => Self {
                write_request: Some(w),
                read_request: None,
            },
            Some(Request::Read(addr)) => Self {
                write_request: None,
                read_request: Some(addr),
            },
            None => Self::default(),
        }
    }
}

/// A strobe in flight through the delay line
#[derive(Clone, Copy, Debug)]
enum Request {
    Write(WriteRequest),
    Read(u16),
}

/// Default strobe delay depth: the one-edge propagation realization
pub const DEFAULT_DELAY_DEPTH: usize = 1;

/// The responder engine
///
/// All state is scoped to one chip-select assertion; nothing persists
/// across transfers except the [`late_responses`](Self::late_responses)
/// diagnostic counter.
#[derive(Debug)]
pub struct TisEngine {
    state: State,
    /// Bit position within the current byte, 7 down to 0
    cursor: u8,
    /// Shift register shared by capture and output staging
    buffer: u8,
    /// Remaining data bytes after the current one (size-1 counter)
    remaining: u8,
    direction: Direction,
    addr: u16,
    addr_high: u8,
    /// Provider data arrived (Wait phase)
    ready: bool,
    /// The ready level was actually driven on the wire this byte
    wire_ready: bool,
    /// Provider data staged for the next read byte
    fetched: Option<u8>,
    requests: DelayLine<Request>,
    late_responses: u32,
}

impl TisEngine {
    /// Create an engine with the default strobe delay depth
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_DELAY_DEPTH).expect("default depth within capacity")
    }

    /// Create an engine whose request strobes become visible `depth`
    /// edges after the byte boundary that produced them
    pub fn with_delay(depth: usize) -> Result<Self> {
        Ok(Self {
            state: State::Idle,
            cursor: 7,
            buffer: 0,
            remaining: 0,
            direction: Direction::Write,
            addr: 0,
            addr_high: 0,
            ready: false,
            wire_ready: false,
            fetched: None,
            requests: DelayLine::new(depth)?,
            late_responses: 0,
        })
    }

    /// Notify the engine of a chip-select transition
    ///
    /// Assertion resets all transfer state. Deassertion is an asynchronous
    /// abort: it also absorbs the implicit final clock edge, so a strobe
    /// for an already-completed byte still comes out here, while any
    /// partially shifted byte produces nothing.
    pub fn chip_select(&mut self, active: bool) -> EdgeOutput {
        if active {
            self.reset();
            EdgeOutput::default()
        } else {
            self.abort()
        }
    }

    /// Sample step, to be called once per rising clock edge
    ///
    /// A call with chip-select deasserted is a no-op that reports idle.
    pub fn rising_edge(&mut self, input: SampleInput) -> EdgeOutput {
        if !input.cs_active {
            return self.abort();
        }
        if input.write_ack {
            log::trace!("write acknowledged (informational, no back-pressure)");
        }
        if self.state == State::Idle {
            self.engage();
        }

        let mut produced = None;
        if let State::Active(phase) = self.state {
            if matches!(phase, Phase::Wait | Phase::Read) {
                if let Some(byte) = input.read_data {
                    self.fetched = Some(byte);
                    if phase == Phase::Wait {
                        self.ready = true;
                    }
                }
            }

            self.buffer = (self.buffer << 1) | input.mosi as u8;
            if self.cursor == 0 {
                self.cursor = 7;
                produced = self.byte_complete(phase);
            } else {
                self.cursor -= 1;
            }
        }

        EdgeOutput::from_request(self.requests.feed(produced))
    }

    /// Drive step, to be called once per falling clock edge
    ///
    /// Returns the response line level for the next sample; `None` means
    /// the line is released (high impedance), which is distinct from a
    /// driven high level.
    pub fn falling_edge(&mut self, cs_active: bool) -> Option<bool> {
        if !cs_active {
            return None;
        }
        match self.state {
            State::Active(Phase::Wait) => {
                if self.ready {
                    self.wire_ready = true;
                }
                Some(self.ready)
            }
            State::Active(Phase::Read) => Some(self.buffer & 0x80 != 0),
            _ => None,
        }
    }

    /// Number of provider responses that missed their byte boundary
    ///
    /// A nonzero value means protocol-level data corruption occurred;
    /// tests treat this as a hard failure.
    pub fn late_responses(&self) -> u32 {
        self.late_responses
    }

    /// Configured strobe delay depth in edges
    pub fn delay_depth(&self) -> usize {
        self.requests.depth()
    }

    fn engage(&mut self) {
        self.state = State::Active(Phase::Command);
        self.cursor = 7;
        self.buffer = 0;
    }

    fn reset(&mut self) {
        self.state = State::Idle;
        self.cursor = 7;
        self.buffer = 0;
        self.remaining = 0;
        self.addr = 0;
        self.addr_high = 0;
        self.ready = false;
        self.wire_ready = false;
        self.fetched = None;
    }

    fn abort(&mut self) -> EdgeOutput {
        let pending = self.requests.drain();
        self.reset();
        EdgeOutput::from_request(pending)
    }

    /// Process a completed byte; returns the strobe to feed the delay line
    fn byte_complete(&mut self, phase: Phase) -> Option<Request> {
        match phase {
            Phase::Command => {
                match CommandByte::decode(self.buffer) {
                    Some(cmd) => {
                        self.direction = cmd.direction;
                        self.remaining = cmd.len - 1;
                        self.state = State::Active(Phase::DeviceSelect);
                    }
                    None => {
                        log::debug!(
                            "command byte {:#04x} has reserved bits set, rejecting transfer",
                            self.buffer
                        );
                        self.state = State::Disengaged;
                    }
                }
                None
            }
            Phase::DeviceSelect => {
                if self.buffer == frame::DEVICE_SELECT {
                    self.state = State::Active(Phase::AddressHigh);
                } else {
                    log::debug!(
                        "device-select byte {:#04x} is not ours, disengaging",
                        self.buffer
                    );
                    self.state = State::Disengaged;
                }
                None
            }
            Phase::AddressHigh => {
                self.addr_high = self.buffer;
                self.state = State::Active(Phase::AddressLow);
                None
            }
            Phase::AddressLow => {
                self.addr = frame::decode_address(self.addr_high, self.buffer);
                self.clamp_size();
                match self.direction {
                    Direction::Write => {
                        self.state = State::Active(Phase::Write);
                        None
                    }
                    Direction::Read => {
                        self.ready = false;
                        self.wire_ready = false;
                        self.fetched = None;
                        self.state = State::Active(Phase::Wait);
                        Some(Request::Read(self.addr))
                    }
                }
            }
            Phase::Write => {
                let request = Request::Write(WriteRequest {
                    addr: self.addr,
                    value: self.buffer,
                });
                self.advance_or_finish();
                Some(request)
            }
            Phase::Wait => {
                // Stay in Wait until the ready level has been seen on the
                // wire; a response landing on the boundary edge itself is
                // signaled during the following poll byte instead.
                if !self.wire_ready {
                    return None;
                }
                self.buffer = self.take_fetched();
                self.state = State::Active(Phase::Read);
                self.next_read_request()
            }
            Phase::Read => {
                if self.remaining == 0 {
                    self.state = State::Disengaged;
                    return None;
                }
                self.remaining -= 1;
                self.addr = self.addr.wrapping_add(1);
                self.buffer = self.take_fetched();
                self.next_read_request()
            }
        }
    }

    /// Strobe the next byte one byte-period ahead of its first bit
    fn next_read_request(&mut self) -> Option<Request> {
        if self.remaining > 0 {
            Some(Request::Read(self.addr.wrapping_add(1)))
        } else {
            None
        }
    }

    fn advance_or_finish(&mut self) {
        if self.remaining == 0 {
            self.state = State::Disengaged;
        } else {
            self.remaining -= 1;
            self.addr = self.addr.wrapping_add(1);
        }
    }

    fn take_fetched(&mut self) -> u8 {
        match self.fetched.take() {
            Some(byte) => byte,
            None => {
                self.late_responses += 1;
                log::error!(
                    "provider response missed its byte-boundary deadline at {:#06x}",
                    self.addr
                );
                0
            }
        }
    }

    /// Truncate the transfer so it never crosses a 4-byte-aligned
    /// register boundary. Applied exactly once, when the low address
    /// byte completes.
    fn clamp_size(&mut self) {
        let base = (self.addr & 3) as u8;
        let requested = self.remaining + 1;
        if base + requested > 4 {
            self.remaining = 3 - base;
            log::trace!(
                "clamped {}-byte transfer at {:#06x} to {} bytes",
                requested,
                self.addr,
                self.remaining + 1
            );
        }
    }
}

impl Default for TisEngine {
    fn default() -> Self {
        Self::new()
    }
}
