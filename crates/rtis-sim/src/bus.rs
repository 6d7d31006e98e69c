//! Loopback bus
//!
//! Connects a bit-bang host directly to the engine, turning every clock
//! transition into the two ordered per-period engine callbacks and
//! routing request strobes to the data provider. Chip-select transitions
//! are delivered as such - they never masquerade as clock edges.

use rtis_core::engine::{EdgeOutput, SampleInput, TisEngine};
use rtis_core::host::BitbangHost;
use rtis_core::provider::RegisterProvider;

/// A host whose wires terminate at an in-process engine
pub struct LoopbackBus<P: RegisterProvider> {
    engine: TisEngine,
    provider: P,
    cs: bool,
    sck: bool,
    mosi: bool,
    miso: Option<bool>,
    write_ack: bool,
}

impl<P: RegisterProvider> LoopbackBus<P> {
    /// Wire an engine to a provider
    pub fn new(engine: TisEngine, provider: P) -> Self {
        Self {
            engine,
            provider,
            cs: false,
            sck: false,
            mosi: false,
            miso: None,
            write_ack: false,
        }
    }

    /// The engine side, for diagnostics
    pub fn engine(&self) -> &TisEngine {
        &self.engine
    }

    /// The provider side, for assertions on the request journal
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable provider access (seeding register contents)
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    fn route(&mut self, out: EdgeOutput) {
        if let Some(w) = out.write_request {
            self.write_ack = self.provider.write_request(w.addr, w.value);
        }
        if let Some(addr) = out.read_request {
            self.provider.read_request(addr);
        }
    }
}

impl<P: RegisterProvider> BitbangHost for LoopbackBus<P> {
    fn set_cs(&mut self, active: bool) {
        if active == self.cs {
            return;
        }
        self.cs = active;
        let out = self.engine.chip_select(active);
        self.route(out);
        if !active {
            self.miso = None;
            self.write_ack = false;
        }
    }

    fn set_sck(&mut self, high: bool) {
        if high == self.sck {
            return;
        }
        self.sck = high;
        if high {
            let input = SampleInput {
                cs_active: self.cs,
                mosi: self.mosi,
                read_data: self.provider.take_read_data(),
                write_ack: core::mem::take(&mut self.write_ack),
            };
            let out = self.engine.rising_edge(input);
            self.route(out);
        } else {
            self.miso = self.engine.falling_edge(self.cs);
        }
    }

    fn set_mosi(&mut self, high: bool) {
        self.mosi = high;
    }

    fn get_miso(&self) -> Option<bool> {
        self.miso
    }

    fn half_period_delay(&self) {
        // Simulated time advances with the edges themselves
    }
}
