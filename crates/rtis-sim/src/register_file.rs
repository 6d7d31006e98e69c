//! In-memory register file
//!
//! The data provider used by the simulation: a flat 64 KiB register
//! space with a configurable read latency and a journal of every request
//! strobe, so tests can assert exactly what the engine asked for.

use rtis_core::provider::RegisterProvider;

/// Size of the 16-bit register space
const SPACE_SIZE: usize = 64 * 1024;

struct PendingRead {
    addr: u16,
    countdown: u32,
}

/// Register file with configurable read latency (in sample-edge units)
pub struct RegisterFile {
    data: Vec<u8>,
    read_latency: u32,
    first_latency: Option<u32>,
    pending: Option<PendingRead>,
    writes: Vec<(u16, u8)>,
    reads: Vec<u16>,
}

impl RegisterFile {
    /// Create a register file that answers reads on the next sample edge
    pub fn new() -> Self {
        Self::with_latency(0)
    }

    /// Create a register file whose reads become ready `latency` sample
    /// edges after the request strobe
    pub fn with_latency(latency: u32) -> Self {
        Self {
            data: vec![0; SPACE_SIZE],
            read_latency: latency,
            first_latency: None,
            pending: None,
            writes: Vec::new(),
            reads: Vec::new(),
        }
    }

    /// Like [`with_latency`](Self::with_latency), but the very first read
    /// is slower - models a provider pipeline that needs warming up. The
    /// wire protocol's wait state absorbs the slow first byte; later
    /// bytes must fit the one-byte-period lead the engine gives them.
    pub fn with_warmup_latency(first: u32, rest: u32) -> Self {
        let mut regs = Self::with_latency(rest);
        regs.first_latency = Some(first);
        regs
    }

    /// Store a value directly, bypassing the wire
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    /// Fetch a value directly, bypassing the wire
    pub fn peek(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    /// Every write strobe observed, in order
    pub fn writes(&self) -> &[(u16, u8)] {
        &self.writes
    }

    /// Every read strobe observed, in order
    pub fn reads(&self) -> &[u16] {
        &self.reads
    }

    /// Forget the journal (keeps register contents)
    pub fn clear_journal(&mut self) {
        self.writes.clear();
        self.reads.clear();
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterProvider for RegisterFile {
    fn write_request(&mut self, addr: u16, value: u8) -> bool {
        log::debug!("write_request {:#06x} <- {:#04x}", addr, value);
        self.data[addr as usize] = value;
        self.writes.push((addr, value));
        true
    }

    fn read_request(&mut self, addr: u16) {
        log::debug!("read_request {:#06x}", addr);
        self.reads.push(addr);
        let countdown = self.first_latency.take().unwrap_or(self.read_latency);
        // A newer request supersedes an undelivered one; the engine never
        // has more than one outstanding, but an aborted transfer may leave
        // a stale pending read behind.
        self.pending = Some(PendingRead { addr, countdown });
    }

    fn take_read_data(&mut self) -> Option<u8> {
        let pending = self.pending.as_mut()?;
        if pending.countdown > 0 {
            pending.countdown -= 1;
            return None;
        }
        let value = self.data[pending.addr as usize];
        self.pending = None;
        Some(value)
    }
}
