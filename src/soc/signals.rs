//! Bus Channel Signals.
//!
//! Plain-data snapshots of the wires between components for one cycle. Two
//! handshake conventions coexist on the fabric:
//!
//! * **Wishbone** (strobe/acknowledge): `cyc` is held with the address and
//!   write data until the slave answers with a one-cycle `ack`.
//! * **Avalon** (latched request, valid after latency): `read`/`write` is a
//!   one-cycle strobe; read data comes back later on a separate
//!   `readdatavalid` pulse.

use crate::common::data::AccessType;

/// Master-to-slave half of a Wishbone channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WbRequest {
    /// Bus cycle in progress.
    pub cyc: bool,
    /// Write enable; read when low.
    pub we: bool,
    /// Byte address.
    pub adr: u64,
    /// Write data, meaningful only while `we` is high.
    pub dat: u64,
}

impl WbRequest {
    /// Builds a held read request.
    pub fn read(adr: u64) -> Self {
        Self {
            cyc: true,
            we: false,
            adr,
            dat: 0,
        }
    }

    /// Builds a held write request.
    pub fn write(adr: u64, dat: u64) -> Self {
        Self {
            cyc: true,
            we: true,
            adr,
            dat,
        }
    }

    /// The idle channel: no cycle, all lines low.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Access type selected by `we`.
    pub fn access(&self) -> AccessType {
        AccessType::from_we(self.we)
    }
}

/// Slave-to-master half of a Wishbone channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WbResponse {
    /// Transaction completed this cycle.
    pub ack: bool,
    /// Read data, meaningful only while `ack` is high on a read.
    pub rdt: u64,
}

impl WbResponse {
    /// No acknowledgment this cycle.
    pub fn none() -> Self {
        Self::default()
    }

    /// Acknowledgment carrying `rdt`.
    pub fn ack(rdt: u64) -> Self {
        Self { ack: true, rdt }
    }
}

/// Master-to-slave half of an Avalon-MM channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AvRequest {
    /// One-cycle read strobe.
    pub read: bool,
    /// One-cycle write strobe.
    pub write: bool,
    /// Byte address.
    pub address: u64,
    /// Write data, meaningful only with `write`.
    pub writedata: u64,
}

impl AvRequest {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Slave-to-master half of an Avalon-MM channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AvResponse {
    /// Read response present this cycle.
    pub readdatavalid: bool,
    /// Read data, meaningful only with `readdatavalid`.
    pub readdata: u64,
}

impl AvResponse {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn valid(readdata: u64) -> Self {
        Self {
            readdatavalid: true,
            readdata,
        }
    }
}
