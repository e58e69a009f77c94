//! Wishbone to Avalon-MM Bridge.
//!
//! Adapts a held Wishbone request to a one-cycle Avalon strobe and turns the
//! Avalon completion back into a Wishbone `ack`:
//!
//! * **Accept:** with nothing in flight, the request lines are latched.
//! * **Issue:** the latched access is strobed downstream for one cycle. A
//!   write completes in this cycle, so `ack` is raised immediately.
//! * **Wait:** a read waits for the rising edge of `readdatavalid` and
//!   forwards `readdata` with `ack` in that same cycle.
//!
//! Only one transaction is ever in flight. A request that arrives while the
//! record is occupied is simply not accepted until it clears.

use crate::common::edge::EdgePulse;
use crate::common::error::SimResult;
use crate::soc::memory::SinglePortRam;
use crate::soc::signals::{AvRequest, AvResponse, WbRequest, WbResponse};
use crate::soc::traits::{AvalonSlave, Clocked, RamBacked, WishboneSlave};

/// The latched access being serviced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InFlight {
    pub address: u64,
    pub we: bool,
    pub data: u64,
}

impl InFlight {
    fn latch(req: &WbRequest) -> Self {
        Self {
            address: req.adr,
            we: req.we,
            data: req.dat,
        }
    }
}

/// Registered bridge state. The in-flight record only exists inside the
/// busy variants, so a second record cannot be represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BridgeState {
    #[default]
    Idle,
    /// Strobing the access downstream this cycle.
    Issue(InFlight),
    /// Read strobed; waiting for `readdatavalid`.
    Wait(InFlight),
}

/// Registered state latched by the bridge at the clock edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BridgeNext {
    state: BridgeState,
    valid: EdgePulse,
}

/// Single-outstanding Wishbone slave, Avalon master.
#[derive(Default)]
pub struct WbAvalonBridge {
    state: BridgeState,
    /// Previous-cycle `readdatavalid`.
    valid: EdgePulse,
}

impl WbAvalonBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Returns the access currently being serviced.
    pub fn in_flight(&self) -> Option<&InFlight> {
        match &self.state {
            BridgeState::Issue(r) | BridgeState::Wait(r) => Some(r),
            BridgeState::Idle => None,
        }
    }

    /// Drives the Avalon strobes for this cycle.
    pub fn downstream(&self) -> AvRequest {
        match self.state {
            BridgeState::Issue(r) => AvRequest {
                read: !r.we,
                write: r.we,
                address: r.address,
                writedata: if r.we { r.data } else { 0 },
            },
            _ => AvRequest::idle(),
        }
    }

    /// Drives the Wishbone response for this cycle from the Avalon response.
    pub fn upstream(&self, av: &AvResponse) -> WbResponse {
        match self.state {
            BridgeState::Issue(r) if r.we => WbResponse::ack(0),
            BridgeState::Wait(_) if self.valid.rising(av.readdatavalid) => {
                WbResponse::ack(av.readdata)
            }
            _ => WbResponse::none(),
        }
    }

    /// Computes the registered state for the next cycle.
    pub fn next_state(&self, req: &WbRequest, av: &AvResponse) -> BridgeNext {
        let state = match self.state {
            BridgeState::Idle if req.cyc => BridgeState::Issue(InFlight::latch(req)),
            BridgeState::Idle => BridgeState::Idle,
            BridgeState::Issue(r) if r.we => BridgeState::Idle,
            BridgeState::Issue(r) => BridgeState::Wait(r),
            BridgeState::Wait(_) if self.valid.rising(av.readdatavalid) => BridgeState::Idle,
            BridgeState::Wait(r) => BridgeState::Wait(r),
        };
        BridgeNext {
            state,
            valid: self.valid.advance(av.readdatavalid),
        }
    }
}

impl Clocked for WbAvalonBridge {
    type Next = BridgeNext;

    fn commit(&mut self, next: BridgeNext) {
        if next.state != self.state {
            match next.state {
                BridgeState::Issue(r) => log::debug!(
                    "[Bridge] latched {} {:#x}",
                    if r.we { "write" } else { "read" },
                    r.address
                ),
                BridgeState::Wait(r) => log::debug!("[Bridge] waiting on read {:#x}", r.address),
                BridgeState::Idle => log::debug!("[Bridge] cleared"),
            }
        }
        self.state = next.state;
        self.valid = next.valid;
    }
}

/// A bridge and the Avalon slave behind it, seen as one Wishbone slave.
pub struct BridgedSlave<S: AvalonSlave> {
    name: String,
    bridge: WbAvalonBridge,
    slave: S,
}

impl<S: AvalonSlave> BridgedSlave<S> {
    pub fn new(slave: S) -> Self {
        Self {
            name: format!("bridge->{}", slave.name()),
            bridge: WbAvalonBridge::new(),
            slave,
        }
    }

    pub fn bridge(&self) -> &WbAvalonBridge {
        &self.bridge
    }

    pub fn slave(&self) -> &S {
        &self.slave
    }

    /// The Avalon lines between the bridge and the slave this cycle.
    pub fn avalon_lines(&self) -> (AvRequest, AvResponse) {
        (self.bridge.downstream(), self.slave.respond())
    }
}

impl<S: AvalonSlave> Clocked for BridgedSlave<S> {
    type Next = (BridgeNext, S::Next);

    fn commit(&mut self, next: Self::Next) {
        self.bridge.commit(next.0);
        self.slave.commit(next.1);
    }
}

impl<S: AvalonSlave> WishboneSlave for BridgedSlave<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&self) -> WbResponse {
        self.bridge.upstream(&self.slave.respond())
    }

    fn next_state(&self, req: &WbRequest) -> SimResult<Self::Next> {
        let (av_req, av_resp) = self.avalon_lines();
        Ok((
            self.bridge.next_state(req, &av_resp),
            self.slave.next_state(&av_req)?,
        ))
    }

    fn accepting(&self) -> bool {
        self.bridge.state() == BridgeState::Idle
    }
}

impl<S: AvalonSlave + RamBacked> RamBacked for BridgedSlave<S> {
    fn ram(&self) -> &SinglePortRam {
        self.slave.ram()
    }

    fn ram_mut(&mut self) -> &mut SinglePortRam {
        self.slave.ram_mut()
    }
}
