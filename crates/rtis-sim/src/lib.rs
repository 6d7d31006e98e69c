//! In-memory test double for the register interface.
//!
//! [`RegisterFile`] is a flat 64 KiB backing store that implements
//! [`RegisterProvider`](rtis_core::provider::RegisterProvider) with a
//! configurable read latency and journals every strobe it receives.
//! [`LoopbackBus`] wires a [`TisEngine`](rtis_core::engine::TisEngine)
//! and a provider together behind the
//! [`BitbangHost`](rtis_core::host::BitbangHost) trait, so the host-side
//! transfer routines can talk to the engine without any hardware.

mod bus;
mod register_file;

pub use bus::LoopbackBus;
pub use register_file::RegisterFile;

#[cfg(test)]
mod tests {
    use super::*;
    use rtis_core::delay::MAX_DEPTH;
    use rtis_core::engine::{TisEngine, DEFAULT_DELAY_DEPTH};
    use rtis_core::frame::{encode_address, CommandByte, Direction};
    use rtis_core::host::{
        read_registers, read_registers_raw, single, write_registers, BitbangHost,
        DEFAULT_POLL_BUDGET,
    };
    use rtis_core::Error;

    fn bus(delay: usize, latency: u32) -> LoopbackBus<RegisterFile> {
        let _ = env_logger::builder().is_test(true).try_init();
        LoopbackBus::new(
            TisEngine::with_delay(delay).unwrap(),
            RegisterFile::with_latency(latency),
        )
    }

    /// Every legal (address, length) pair must read back what was
    /// written, at every supported strobe delay and with a provider
    /// that is either immediate or needs a few edges per byte.
    #[test]
    fn roundtrip_all_legal_transfers() {
        for delay in 0..=MAX_DEPTH {
            for latency in [0u32, 3] {
                // The strobe lead for subsequent read bytes is one
                // byte-period minus the delay depth; provider latency
                // must fit inside what is left.
                if delay + latency as usize > 7 {
                    continue;
                }
                let mut bus = bus(delay, latency);
                for addr in [0x0000u16, 0x00fe, 0x0101, 0xc44c, 0xfff0] {
                    for len in 1..=4usize {
                        if (addr & 3) as usize + len > 4 {
                            continue;
                        }
                        let data: Vec<u8> = (0..len)
                            .map(|i| (addr as u8).wrapping_add(0x3b * (i as u8 + 1)))
                            .collect();
                        write_registers(&mut bus, addr, &data).unwrap();
                        let mut back = vec![0u8; len];
                        read_registers(&mut bus, addr, &mut back, DEFAULT_POLL_BUDGET).unwrap();
                        assert_eq!(back, data, "addr {addr:#06x} len {len} delay {delay}");
                    }
                }
                assert_eq!(bus.engine().late_responses(), 0);
            }
        }
    }

    #[test]
    fn single_write_reaches_provider_once() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 0);
        write_registers(&mut bus, 0xc44c, &[0x3c]).unwrap();
        assert_eq!(bus.provider().writes(), &[(0xc44c, 0x3c)]);
    }

    #[test]
    fn multi_write_increments_address() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 0);
        write_registers(&mut bus, 0x0100, &[0xde, 0xad, 0xbe, 0xef]).unwrap();
        assert_eq!(
            bus.provider().writes(),
            &[(0x0100, 0xde), (0x0101, 0xad), (0x0102, 0xbe), (0x0103, 0xef)]
        );
        assert_eq!(bus.provider().peek(0x0102), 0xbe);
    }

    /// A provider that takes ~40 sample edges to warm up keeps the
    /// response line low for five full poll bytes, then the transfer
    /// completes uncorrupted.
    #[test]
    fn slow_first_read_holds_wait_state() {
        let mut bus = LoopbackBus::new(
            TisEngine::new(),
            RegisterFile::with_warmup_latency(40, 0),
        );
        for (i, v) in [0x11u8, 0x22, 0x33, 0x44].iter().enumerate() {
            bus.provider_mut().poke(i as u16, *v);
        }
        bus.provider_mut().clear_journal();

        bus.set_cs(true);
        let cmd = CommandByte::new(Direction::Read, 4).unwrap();
        single::write_byte(&mut bus, cmd.encode());
        for byte in encode_address(0x0000) {
            single::write_byte(&mut bus, byte);
        }
        bus.set_mosi(true);
        let mut polls = 0;
        loop {
            let byte = single::read_byte(&mut bus).unwrap();
            polls += 1;
            if byte != 0 {
                break;
            }
            assert!(polls < 32, "wait state never ended");
        }
        // 40 edges of latency span the first five poll bytes.
        assert_eq!(polls, 6);

        let mut data = [0u8; 4];
        for slot in &mut data {
            *slot = single::read_byte(&mut bus).unwrap();
        }
        bus.set_cs(false);

        assert_eq!(data, [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(bus.provider().reads(), &[0x0000, 0x0001, 0x0002, 0x0003]);
        assert_eq!(bus.engine().late_responses(), 0);
    }

    /// Oversized wire request starting at offset 2 within a 4-byte
    /// window: two live bytes, then the line floats. The provider is
    /// never asked for anything past the window.
    #[test]
    fn oversized_read_floats_after_window() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 0);
        bus.provider_mut().poke(0xc44e, 0xaa);
        bus.provider_mut().poke(0xc44f, 0xbb);
        bus.provider_mut().poke(0xc450, 0xcc);
        bus.provider_mut().clear_journal();

        let bytes = read_registers_raw(&mut bus, 0xc44e, 7, DEFAULT_POLL_BUDGET).unwrap();
        assert_eq!(
            bytes,
            vec![Some(0xaa), Some(0xbb), None, None, None, None, None]
        );
        assert_eq!(bus.provider().reads(), &[0xc44e, 0xc44f]);
    }

    #[test]
    fn clamped_write_stops_at_window_edge() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 0);
        write_registers(&mut bus, 0x0006, &[0x10, 0x20, 0x30, 0x40]).unwrap();
        // addr & 3 == 2, so only two slots remain before the boundary.
        assert_eq!(bus.provider().writes(), &[(0x0006, 0x10), (0x0007, 0x20)]);
    }

    /// Deselect three bits into a data byte: nothing reaches the
    /// provider, and the next transfer starts clean.
    #[test]
    fn mid_byte_deselect_discards_partial_transfer() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 0);
        bus.set_cs(true);
        let cmd = CommandByte::new(Direction::Write, 2).unwrap();
        single::write_byte(&mut bus, cmd.encode());
        for byte in encode_address(0x0040) {
            single::write_byte(&mut bus, byte);
        }
        for _ in 0..3 {
            bus.set_sck_set_mosi(false, true);
            bus.set_sck(true);
        }
        bus.set_cs(false);
        assert!(bus.provider().writes().is_empty());

        write_registers(&mut bus, 0x0040, &[0x55, 0x66]).unwrap();
        assert_eq!(bus.provider().writes(), &[(0x0040, 0x55), (0x0041, 0x66)]);
    }

    /// Reserved command bits set: the responder releases the line for
    /// the rest of the transfer and the provider never hears about it.
    #[test]
    fn reserved_command_bits_float_the_line() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 0);
        bus.set_cs(true);
        single::write_byte(&mut bus, 0x84);
        for byte in encode_address(0x0000) {
            single::write_byte(&mut bus, byte);
        }
        bus.set_mosi(true);
        assert_eq!(single::read_byte(&mut bus), None);
        bus.set_cs(false);
        assert!(bus.provider().reads().is_empty());
        assert!(bus.provider().writes().is_empty());
    }

    #[test]
    fn foreign_device_select_floats_the_line() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 0);
        bus.set_cs(true);
        let cmd = CommandByte::new(Direction::Read, 1).unwrap();
        single::write_byte(&mut bus, cmd.encode());
        single::write_byte(&mut bus, 0xa4);
        single::write_byte(&mut bus, 0x00);
        single::write_byte(&mut bus, 0x00);
        bus.set_mosi(true);
        assert_eq!(single::read_byte(&mut bus), None);
        bus.set_cs(false);
        assert!(bus.provider().reads().is_empty());

        // The host routine reports the floating line as no response.
        let mut buf = [0u8; 1];
        let err = read_registers(&mut bus, 0x0000, &mut buf, DEFAULT_POLL_BUDGET);
        assert!(err.is_ok(), "proper select must still work");
    }

    /// Master walks away after one data byte of a 4-byte read. The
    /// engine must come back clean for the next transfer.
    #[test]
    fn undersized_read_aborts_cleanly() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 0);
        bus.provider_mut().poke(0x0020, 0x99);
        bus.provider_mut().poke(0x0021, 0x88);
        bus.provider_mut().clear_journal();

        bus.set_cs(true);
        let cmd = CommandByte::new(Direction::Read, 4).unwrap();
        single::write_byte(&mut bus, cmd.encode());
        for byte in encode_address(0x0020) {
            single::write_byte(&mut bus, byte);
        }
        bus.set_mosi(true);
        while single::read_byte(&mut bus) == Some(0) {}
        assert_eq!(single::read_byte(&mut bus), Some(0x99));
        bus.set_cs(false);

        let mut back = [0u8; 2];
        read_registers(&mut bus, 0x0020, &mut back, DEFAULT_POLL_BUDGET).unwrap();
        assert_eq!(back, [0x99, 0x88]);
        assert_eq!(bus.engine().late_responses(), 0);
    }

    #[test]
    fn read_times_out_on_stuck_provider() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 100_000);
        let mut buf = [0u8; 2];
        assert_eq!(
            read_registers(&mut bus, 0x0000, &mut buf, 4),
            Err(Error::Timeout)
        );
        // A patient retry against a fresh provider succeeds.
        *bus.provider_mut() = RegisterFile::new();
        assert_eq!(read_registers(&mut bus, 0x0000, &mut buf, DEFAULT_POLL_BUDGET), Ok(()));
    }

    /// At the deepest accepted delay the subsequent-byte strobe lands
    /// exactly one byte-period ahead; one edge deeper would miss the
    /// boundary deadline, so construction must refuse it.
    #[test]
    fn deepest_delay_keeps_reads_timely() {
        assert_eq!(
            TisEngine::with_delay(MAX_DEPTH + 1).unwrap_err(),
            Error::DelayTooDeep
        );

        let mut bus = bus(MAX_DEPTH, 0);
        write_registers(&mut bus, 0x0100, &[0x5a, 0xa5]).unwrap();
        let mut back = [0u8; 2];
        read_registers(&mut bus, 0x0100, &mut back, DEFAULT_POLL_BUDGET).unwrap();
        assert_eq!(back, [0x5a, 0xa5]);
        assert_eq!(bus.engine().late_responses(), 0);
    }

    #[test]
    fn transfer_length_bounds() {
        let mut bus = bus(DEFAULT_DELAY_DEPTH, 0);
        assert_eq!(write_registers(&mut bus, 0, &[]), Err(Error::InvalidLength));
        assert_eq!(
            write_registers(&mut bus, 0, &[0; 5]),
            Err(Error::InvalidLength)
        );
        let mut buf = [0u8; 5];
        assert_eq!(
            read_registers(&mut bus, 0, &mut buf, DEFAULT_POLL_BUDGET),
            Err(Error::InvalidLength)
        );
    }
}
