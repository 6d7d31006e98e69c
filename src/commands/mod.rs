//! CLI command implementations
//!
//! Each command builds a loopback bus (protocol engine plus in-memory
//! register file), drives one transfer through the host routines, and
//! reports what reached the provider.

use rtis_core::engine::TisEngine;
use rtis_core::host::{read_registers, read_registers_raw, write_registers};
use rtis_sim::{LoopbackBus, RegisterFile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("transfer failed: {0}")]
    Transfer(#[from] rtis_core::Error),
    #[error("read length must be 1-4 bytes, got {0}")]
    BadLength(usize),
}

pub struct BusOptions {
    pub delay: usize,
    pub latency: u32,
    pub poke: Vec<(u16, u8)>,
}

fn build_bus(opts: &BusOptions) -> Result<LoopbackBus<RegisterFile>, CommandError> {
    let engine = TisEngine::with_delay(opts.delay)?;
    let mut regs = RegisterFile::with_latency(opts.latency);
    for &(addr, value) in &opts.poke {
        regs.poke(addr, value);
    }
    regs.clear_journal();
    Ok(LoopbackBus::new(engine, regs))
}

fn report(bus: &LoopbackBus<RegisterFile>) {
    for &(addr, value) in bus.provider().writes() {
        log::debug!("provider write {:#06x} <- {:#04x}", addr, value);
    }
    for &addr in bus.provider().reads() {
        log::debug!("provider read  {:#06x}", addr);
    }
    let late = bus.engine().late_responses();
    if late > 0 {
        log::warn!("{} provider response(s) arrived too late", late);
    }
}

pub fn run_write(opts: &BusOptions, addr: u16, values: &[u8]) -> Result<(), CommandError> {
    let mut bus = build_bus(opts)?;
    write_registers(&mut bus, addr, values)?;
    report(&bus);
    println!("Wrote {} byte(s) at {:#06x}", bus.provider().writes().len(), addr);
    for &(addr, value) in bus.provider().writes() {
        println!("  {:#06x} = {:#04x}", addr, value);
    }
    Ok(())
}

pub fn run_read(
    opts: &BusOptions,
    addr: u16,
    len: usize,
    poll_budget: u32,
) -> Result<(), CommandError> {
    if !(1..=4).contains(&len) {
        return Err(CommandError::BadLength(len));
    }
    let mut bus = build_bus(opts)?;
    let mut buf = vec![0u8; len];
    read_registers(&mut bus, addr, &mut buf, poll_budget)?;
    report(&bus);
    for (i, value) in buf.iter().enumerate() {
        println!("{:#06x} = {:#04x}", addr.wrapping_add(i as u16), value);
    }
    Ok(())
}

pub fn run_raw_read(
    opts: &BusOptions,
    addr: u16,
    wire_len: usize,
    poll_budget: u32,
) -> Result<(), CommandError> {
    let mut bus = build_bus(opts)?;
    let bytes = read_registers_raw(&mut bus, addr, wire_len, poll_budget)?;
    report(&bus);
    for (i, byte) in bytes.iter().enumerate() {
        match byte {
            Some(value) => println!("{:#06x} = {:#04x}", addr.wrapping_add(i as u16), value),
            None => println!("{:#06x} : line released", addr.wrapping_add(i as u16)),
        }
    }
    Ok(())
}
