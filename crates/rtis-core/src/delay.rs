//! Fixed-depth strobe delay line
//!
//! Request strobes toward the data provider become visible with a
//! propagation delay in some realizations of this interface. The delay
//! line models that lead time deterministically: a value fed in on one
//! clock edge emerges `depth` edges later. The depth is a construction
//! parameter, never a hard constant, so the engine stays correct for
//! whatever lead time the surrounding integration uses.

use heapless::Deque;

use crate::error::{Error, Result};

/// Maximum supported delay depth, strictly inside one byte-period
///
/// A strobe fed in at a byte boundary must emerge before the next
/// boundary's sample edge, or its response can never arrive in time. A
/// byte is 8 edges, so 7 is the deepest usable line.
pub const MAX_DEPTH: usize = 7;

/// A shift register of `depth` slots, ticked once per clock edge
#[derive(Debug)]
pub struct DelayLine<T> {
    slots: Deque<Option<T>, MAX_DEPTH>,
}

impl<T> DelayLine<T> {
    /// Create a delay line of the given depth (0 = same-edge visibility)
    pub fn new(depth: usize) -> Result<Self> {
        if depth > MAX_DEPTH {
            return Err(Error::DelayTooDeep);
        }
        let mut slots = Deque::new();
        for _ in 0..depth {
            // Cannot fail: depth is within capacity
            let _ = slots.push_back(None);
        }
        Ok(Self { slots })
    }

    /// Advance one edge: feed `item` in, return what falls out
    pub fn feed(&mut self, item: Option<T>) -> Option<T> {
        if self.slots.is_empty() {
            // Depth 0: pass through
            return item;
        }
        let out = self.slots.pop_front().flatten();
        let _ = self.slots.push_back(item);
        out
    }

    /// Drop everything in flight and pull out the pending item, if any
    ///
    /// Used on chip-select deassertion, which absorbs the implicit final
    /// clock edge: a strobe for an already-completed byte is still
    /// delivered, anything younger is discarded along with it. At most one
    /// strobe is ever in flight, so one slot suffices.
    pub fn drain(&mut self) -> Option<T> {
        let depth = self.slots.len();
        let mut pending = None;
        while let Some(slot) = self.slots.pop_front() {
            if let Some(item) = slot {
                pending = Some(item);
            }
        }
        for _ in 0..depth {
            let _ = self.slots.push_back(None);
        }
        pending
    }

    /// Configured depth in edges
    pub fn depth(&self) -> usize {
        self.slots.len()
    }
}
