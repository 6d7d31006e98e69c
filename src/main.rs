//! rtis - exerciser for a TPM-style SPI register interface
//!
//! Runs host-side register transfers against the protocol engine over an
//! in-process loopback bus, with a plain-RAM register file standing in
//! for the device behind the interface. Useful for watching the wire
//! protocol behave: wait states, the 4-byte window clamp, configurable
//! strobe delay and provider latency.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::BusOptions;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Verbosity picks the default filter; RUST_LOG still overrides
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let opts = BusOptions {
        delay: cli.delay,
        latency: cli.latency,
        poke: cli.poke,
    };

    match cli.command {
        Commands::Write { addr, values } => commands::run_write(&opts, addr, &values)?,
        Commands::Read {
            addr,
            len,
            poll_budget,
        } => commands::run_read(&opts, addr, len, poll_budget)?,
        Commands::RawRead {
            addr,
            wire_len,
            poll_budget,
        } => commands::run_raw_read(&opts, addr, wire_len, poll_budget)?,
    }

    Ok(())
}
