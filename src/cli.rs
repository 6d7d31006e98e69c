//! CLI argument parsing

use clap::{Parser, Subcommand};

/// Parse a string as a hex or decimal u16
pub fn parse_hex_u16(s: &str) -> Result<u16, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u16>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a string as a hex or decimal u8
pub fn parse_hex_u8(s: &str) -> Result<u8, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u8>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse an ADDR=VALUE register seed
fn parse_poke(s: &str) -> Result<(u16, u8), String> {
    let (addr, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected ADDR=VALUE, got {:?}", s))?;
    Ok((parse_hex_u16(addr)?, parse_hex_u8(value)?))
}

#[derive(Parser)]
#[command(name = "rtis")]
#[command(author, version, about = "SPI register interface exerciser", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of bit periods the responder delays its strobes by
    #[arg(long, default_value = "1", global = true)]
    pub delay: usize,

    /// Sample edges the register file takes to answer a read
    #[arg(long, default_value = "0", global = true)]
    pub latency: u32,

    /// Seed a register before the transfer (ADDR=VALUE, repeatable)
    #[arg(long, value_parser = parse_poke, global = true)]
    pub poke: Vec<(u16, u8)>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write 1-4 bytes to consecutive registers
    Write {
        /// Start address
        #[arg(short, long, value_parser = parse_hex_u16)]
        addr: u16,

        /// Byte values (hex or decimal)
        #[arg(required = true, value_parser = parse_hex_u8)]
        values: Vec<u8>,
    },

    /// Read 1-4 bytes from consecutive registers
    Read {
        /// Start address
        #[arg(short, long, value_parser = parse_hex_u16)]
        addr: u16,

        /// Number of bytes to read
        #[arg(short, long, default_value = "1")]
        len: usize,

        /// Poll bytes to spend waiting for data-ready
        #[arg(long, default_value = "64")]
        poll_budget: u32,
    },

    /// Clock out an arbitrary number of data bytes and show which ones
    /// the responder actually drove
    RawRead {
        /// Start address
        #[arg(short, long, value_parser = parse_hex_u16)]
        addr: u16,

        /// Data bytes to clock regardless of what the command encodes
        #[arg(short, long)]
        wire_len: usize,

        /// Poll bytes to spend waiting for data-ready
        #[arg(long, default_value = "64")]
        poll_budget: u32,
    },
}
