//! Scripted Bus Requester.
//!
//! A behavioral Wishbone master standing in for the CPU's instruction and data
//! buses. It works through a queue of accesses one at a time, holding each
//! request's lines steady until the fabric acknowledges it, and records every
//! completion with the tick it arrived on.

use crate::common::data::AccessType;
use crate::soc::signals::{WbRequest, WbResponse};
use crate::soc::traits::Clocked;
use std::collections::VecDeque;

/// One bus access as seen by a requester.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    pub op: AccessType,
    pub address: u64,
    /// Write data; ignored for reads.
    pub data: u64,
}

impl Access {
    pub fn read(address: u64) -> Self {
        Self {
            op: AccessType::Read,
            address,
            data: 0,
        }
    }

    pub fn write(address: u64, data: u64) -> Self {
        Self {
            op: AccessType::Write,
            address,
            data,
        }
    }

    /// The Wishbone lines that present this access.
    pub fn to_request(&self) -> WbRequest {
        match self.op {
            AccessType::Read => WbRequest::read(self.address),
            AccessType::Write => WbRequest::write(self.address, self.data),
        }
    }
}

/// A finished access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Tick on which `ack` was observed.
    pub tick: u64,
    pub access: Access,
    /// Data returned by a read; `None` for writes.
    pub read_data: Option<u64>,
}

/// Queue-driven Wishbone master.
#[derive(Debug, Default)]
pub struct ScriptedRequester {
    name: String,
    queue: VecDeque<Access>,
    completions: Vec<Completion>,
}

impl ScriptedRequester {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            queue: VecDeque::new(),
            completions: Vec::new(),
        }
    }

    /// Appends an access to the queue.
    pub fn submit(&mut self, access: Access) {
        self.queue.push_back(access);
    }

    /// Removes the access currently presented on the bus.
    ///
    /// Only safe before the arbiter grants it; the system checks that.
    pub(crate) fn withdraw(&mut self) -> Option<Access> {
        self.queue.pop_front()
    }

    /// Number of accesses not yet acknowledged.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Drives the request lines for this cycle.
    pub fn output(&self) -> WbRequest {
        self.queue
            .front()
            .map_or_else(WbRequest::idle, Access::to_request)
    }

    /// Computes the completion, if `resp` acknowledges the current access.
    pub fn next_state(&self, tick: u64, resp: &WbResponse) -> Option<Completion> {
        if !resp.ack {
            return None;
        }
        self.queue.front().map(|access| Completion {
            tick,
            access: *access,
            read_data: (!access.op.is_write()).then_some(resp.rdt),
        })
    }
}

impl Clocked for ScriptedRequester {
    type Next = Option<Completion>;

    fn commit(&mut self, next: Option<Completion>) {
        if let Some(done) = next {
            self.queue.pop_front();
            log::trace!(
                "[{}] {} {:#x} done @ tick {}",
                self.name,
                done.access.op,
                done.access.address,
                done.tick
            );
            self.completions.push(done);
        }
    }
}
