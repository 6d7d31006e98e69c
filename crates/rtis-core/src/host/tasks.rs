//! Byte-oriented transfer tasks
//!
//! These functions bit-bang whole transfers on top of [`BitbangHost`]:
//! command/address header, wait-state polling for reads, then the data
//! bytes. Writes have no wait state on this protocol variant - the
//! responder's acknowledgement is informational and carries no
//! back-pressure - so a write is simply clocked out.

use super::{single, BitbangHost};
use crate::error::{Error, Result};
use crate::frame::{encode_address, CommandByte, Direction};

/// Default number of poll bytes before giving up on a read
///
/// The responder may wait indefinitely (that is protocol-correct), so any
/// timeout belongs to the host, not the engine. The default covers
/// several hundred clock edges of provider latency.
pub const DEFAULT_POLL_BUDGET: u32 = 64;

fn send_header<H: BitbangHost + ?Sized>(host: &mut H, command: CommandByte, addr: u16) {
    single::write_byte(host, command.encode());
    for byte in encode_address(addr) {
        single::write_byte(host, byte);
    }
}

fn command_for(direction: Direction, len: usize) -> Result<CommandByte> {
    u8::try_from(len)
        .ok()
        .and_then(|len| CommandByte::new(direction, len))
        .ok_or(Error::InvalidLength)
}

/// Poll until the responder raises the line, one byte at a time
///
/// A poll byte other than 0x00 means the ready level was seen; data
/// starts at the next byte boundary.
fn wait_ready<H: BitbangHost + ?Sized>(host: &mut H, poll_budget: u32) -> Result<()> {
    for _ in 0..poll_budget {
        match single::read_byte(host) {
            Some(0) => continue,
            Some(_) => return Ok(()),
            None => return Err(Error::NoResponse),
        }
    }
    Err(Error::Timeout)
}

/// Write `data` to the register space starting at `addr`
///
/// Lengths outside 1-4 bytes cannot be encoded in the command byte and
/// fail with [`Error::InvalidLength`]. Note that the responder may still
/// clamp the transfer at the next 4-byte register boundary; the wire
/// gives the host no indication of that.
pub fn write_registers<H: BitbangHost + ?Sized>(
    host: &mut H,
    addr: u16,
    data: &[u8],
) -> Result<()> {
    let command = command_for(Direction::Write, data.len())?;
    host.set_cs(true);
    send_header(host, command, addr);
    for &byte in data {
        single::write_byte(host, byte);
    }
    host.set_cs(false);
    Ok(())
}

/// Read `buf.len()` bytes from the register space starting at `addr`
///
/// Sends all-ones poll bytes while the responder holds the line low,
/// up to `poll_budget` of them.
pub fn read_registers<H: BitbangHost + ?Sized>(
    host: &mut H,
    addr: u16,
    buf: &mut [u8],
    poll_budget: u32,
) -> Result<()> {
    let command = command_for(Direction::Read, buf.len())?;
    host.set_cs(true);
    send_header(host, command, addr);
    host.set_mosi(true);
    if let Err(e) = wait_ready(host, poll_budget) {
        host.set_cs(false);
        return Err(e);
    }
    for byte in buf.iter_mut() {
        match single::read_byte(host) {
            Some(value) => *byte = value,
            None => {
                host.set_cs(false);
                return Err(Error::NoResponse);
            }
        }
    }
    host.set_cs(false);
    Ok(())
}

/// Clock an arbitrary wire length of read data, keeping floating bytes
/// visible
///
/// The command byte encodes at most 4 bytes; `wire_len` beyond that (or
/// beyond the responder's boundary clamp) comes back as `None` entries,
/// never as provider-sourced values. This is the oversize/undersize
/// exercise path.
#[cfg(feature = "alloc")]
pub fn read_registers_raw<H: BitbangHost + ?Sized>(
    host: &mut H,
    addr: u16,
    wire_len: usize,
    poll_budget: u32,
) -> Result<alloc::vec::Vec<Option<u8>>> {
    if wire_len == 0 {
        return Err(Error::InvalidLength);
    }
    let command = command_for(Direction::Read, wire_len.min(4))?;
    host.set_cs(true);
    send_header(host, command, addr);
    host.set_mosi(true);
    if let Err(e) = wait_ready(host, poll_budget) {
        host.set_cs(false);
        return Err(e);
    }
    let mut bytes = alloc::vec::Vec::with_capacity(wire_len);
    for _ in 0..wire_len {
        bytes.push(single::read_byte(host));
    }
    host.set_cs(false);
    Ok(bytes)
}
