//! System-on-Chip Traits.
//!
//! This module defines the interfaces shared by the clocked components of the
//! fabric. Every component exposes its outputs as a function of its present
//! state, computes a next state without mutating anything, and only changes
//! when the system commits all next states together at the clock edge.

use crate::common::error::SimResult;
use crate::soc::memory::SinglePortRam;
use crate::soc::signals::{AvRequest, AvResponse, WbRequest, WbResponse};

/// A component with registered state advanced once per clock edge.
pub trait Clocked {
    /// Snapshot of everything the component latches at the edge.
    type Next;

    /// Replaces the present state with `next`.
    ///
    /// Called only after every component has computed its next state for the
    /// cycle, so no component observes another's update mid-cycle.
    fn commit(&mut self, next: Self::Next);
}

/// A slave port speaking the Wishbone strobe/acknowledge convention.
pub trait WishboneSlave: Clocked {
    /// Returns the name used in logs and reports.
    fn name(&self) -> &str;

    /// Drives the response lines for the current cycle.
    ///
    /// Depends only on registered state; a request is never answered in the
    /// cycle it is first presented.
    fn respond(&self) -> WbResponse;

    /// Computes the next state given this cycle's request lines.
    ///
    /// # Errors
    ///
    /// Addressing and alignment faults for the presented request.
    fn next_state(&self, req: &WbRequest) -> SimResult<Self::Next>;

    /// Returns `true` if a request presented this cycle would be taken.
    ///
    /// Used for statistics only; the handshake itself never depends on it.
    fn accepting(&self) -> bool {
        true
    }
}

/// A slave port speaking the Avalon-MM latched-request convention.
pub trait AvalonSlave: Clocked {
    fn name(&self) -> &str;

    /// Drives `readdatavalid`/`readdata` for the current cycle.
    fn respond(&self) -> AvResponse;

    /// Computes the next state given this cycle's strobes.
    ///
    /// # Errors
    ///
    /// Addressing and alignment faults for the strobed address.
    fn next_state(&self, req: &AvRequest) -> SimResult<Self::Next>;
}

/// A slave with a [`SinglePortRam`] behind it that harnesses may access
/// directly, outside the bus, for image loading and inspection.
pub trait RamBacked {
    fn ram(&self) -> &SinglePortRam;

    fn ram_mut(&mut self) -> &mut SinglePortRam;
}
