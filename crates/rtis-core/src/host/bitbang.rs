//! Bitbang master trait and single-wire byte primitives
//!
//! Mode 0 timing throughout: the master changes its output while the
//! clock is low and samples the responder's line on the rising edge; the
//! responder drives its line on the falling edge.

/// Trait for low-level bitbang operations toward the responder
///
/// `get_miso` returns `None` when the line is not driven. Keeping the
/// floating case visible matters: a disengaged responder is only
/// distinguishable from one answering 0xFF by the line being released.
pub trait BitbangHost {
    /// Set chip select (active low on the wire, so `active=true` means CS=0)
    fn set_cs(&mut self, active: bool);

    /// Set clock line value
    fn set_sck(&mut self, high: bool);

    /// Set MOSI line value
    fn set_mosi(&mut self, high: bool);

    /// Get the MISO line value, `None` if the line floats
    fn get_miso(&self) -> Option<bool>;

    /// Delay for half a clock period
    fn half_period_delay(&self);

    /// Optional: Set SCK and MOSI atomically (optimization)
    fn set_sck_set_mosi(&mut self, sck: bool, mosi: bool) {
        self.set_sck(sck);
        self.set_mosi(mosi);
    }

    /// Optional: Set SCK and get MISO atomically (optimization)
    fn set_sck_get_miso(&mut self, sck: bool) -> Option<bool> {
        self.set_sck(sck);
        self.get_miso()
    }
}

/// Byte primitives for single-wire I/O
pub mod single {
    use super::BitbangHost;

    /// Write a byte MSB-first
    pub fn write_byte<H: BitbangHost + ?Sized>(host: &mut H, byte: u8) {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1 != 0;
            host.set_sck_set_mosi(false, bit);
            host.half_period_delay();
            host.set_sck(true);
            host.half_period_delay();
        }
    }

    /// Read a byte MSB-first
    ///
    /// Returns `None` when the responder left the line floating for any
    /// bit of the byte.
    pub fn read_byte<H: BitbangHost + ?Sized>(host: &mut H) -> Option<u8> {
        let mut byte = 0u8;
        let mut driven = true;
        for _ in 0..8 {
            host.set_sck(false);
            host.half_period_delay();
            byte <<= 1;
            match host.set_sck_get_miso(true) {
                Some(true) => byte |= 1,
                Some(false) => {}
                None => driven = false,
            }
            host.half_period_delay();
        }
        driven.then_some(byte)
    }
}
