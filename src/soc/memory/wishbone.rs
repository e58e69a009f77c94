//! Wishbone RAM Port.
//!
//! Exposes a [`SinglePortRam`] as a Wishbone slave. The acknowledgment is
//! generated from the held `cyc` line with an edge detector, `ack_next = cyc
//! AND NOT ack`, so a master that keeps `cyc` asserted for several cycles
//! still sees exactly one `ack` per access.

use super::SinglePortRam;
use crate::common::edge::EdgePulse;
use crate::common::error::SimResult;
use crate::soc::signals::{WbRequest, WbResponse};
use crate::soc::traits::{Clocked, RamBacked, WishboneSlave};

/// Registered state latched by a [`WishboneRam`] at the clock edge.
#[derive(Clone, Copy, Debug, Default)]
pub struct WishboneNext {
    ack: EdgePulse,
    rdt: u64,
    write: Option<(usize, u64)>,
}

/// Single-cycle Wishbone slave over a RAM.
pub struct WishboneRam {
    name: String,
    ram: SinglePortRam,
    /// Previous-cycle `ack`, which is also the current `ack` output.
    ack: EdgePulse,
    rdt: u64,
}

impl WishboneRam {
    /// Wraps `ram` in a Wishbone port called `name`.
    pub fn new(name: &str, ram: SinglePortRam) -> Self {
        Self {
            name: name.to_string(),
            ram,
            ack: EdgePulse::new(),
            rdt: 0,
        }
    }
}

impl Clocked for WishboneRam {
    type Next = WishboneNext;

    fn commit(&mut self, next: WishboneNext) {
        if let Some((index, value)) = next.write {
            self.ram.store_word(index, value);
        }
        self.ack = next.ack;
        self.rdt = next.rdt;
    }
}

impl WishboneSlave for WishboneRam {
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&self) -> WbResponse {
        if self.ack.previous() {
            WbResponse::ack(self.rdt)
        } else {
            WbResponse::none()
        }
    }

    fn next_state(&self, req: &WbRequest) -> SimResult<WishboneNext> {
        let ack = self.ack.rising(req.cyc);
        let mut next = WishboneNext {
            ack: self.ack.advance(ack),
            rdt: 0,
            write: None,
        };

        if ack {
            let (index, _) = self.ram.decode(req.access(), req.adr)?;
            if req.we {
                next.write = Some((index, req.dat));
            } else {
                next.rdt = self.ram.load_word(index);
            }
        }
        Ok(next)
    }
}

impl RamBacked for WishboneRam {
    fn ram(&self) -> &SinglePortRam {
        &self.ram
    }

    fn ram_mut(&mut self) -> &mut SinglePortRam {
        &mut self.ram
    }
}
