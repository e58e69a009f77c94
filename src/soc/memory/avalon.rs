//! Avalon-MM RAM Port.
//!
//! Exposes a [`SinglePortRam`] as an Avalon-MM slave with pipelined reads.
//! A write strobe completes in its own cycle. A read strobe samples the word
//! immediately and schedules a `readdatavalid` pulse some cycles later, as
//! chosen by a [`MemoryController`]. Responses leave in strobe order even when
//! the drawn latencies would otherwise let a later read overtake an earlier one.

use super::controller::MemoryController;
use super::SinglePortRam;
use crate::common::data::AccessType;
use crate::common::error::SimResult;
use crate::soc::signals::{AvRequest, AvResponse};
use crate::soc::traits::{AvalonSlave, Clocked, RamBacked};
use std::collections::VecDeque;

/// A read whose data has been sampled but not yet returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingRead {
    /// Cycles left before the response is driven; 0 means this cycle.
    remaining: u64,
    data: u64,
}

/// Registered state latched by an [`AvalonRam`] at the clock edge.
#[derive(Clone, Debug, Default)]
pub struct AvalonNext {
    pending: VecDeque<PendingRead>,
    write: Option<(usize, u64)>,
    read: Option<(u64, u64)>,
}

/// Avalon-MM slave over a RAM with controller-driven read latency.
pub struct AvalonRam {
    name: String,
    ram: SinglePortRam,
    controller: Box<dyn MemoryController>,
    pending: VecDeque<PendingRead>,
}

impl AvalonRam {
    /// Wraps `ram` in an Avalon port whose read latency comes from `controller`.
    pub fn new(name: &str, ram: SinglePortRam, controller: Box<dyn MemoryController>) -> Self {
        Self {
            name: name.to_string(),
            ram,
            controller,
            pending: VecDeque::new(),
        }
    }

    /// Number of reads sampled but not yet returned.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }
}

impl Clocked for AvalonRam {
    type Next = AvalonNext;

    fn commit(&mut self, next: AvalonNext) {
        self.pending = next.pending;

        if let Some((index, value)) = next.write {
            self.ram.store_word(index, value);
        }

        if let Some((address, data)) = next.read {
            let latency = self.controller.access_latency(address).max(1);
            let mut remaining = latency - 1;
            if let Some(last) = self.pending.back() {
                remaining = remaining.max(last.remaining + 1);
            }
            log::trace!(
                "[{}] read {:#x} scheduled, valid in {} cycle(s)",
                self.name,
                address,
                remaining + 1
            );
            self.pending.push_back(PendingRead { remaining, data });
        }
    }
}

impl AvalonSlave for AvalonRam {
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&self) -> AvResponse {
        match self.pending.front() {
            Some(head) if head.remaining == 0 => AvResponse::valid(head.data),
            _ => AvResponse::none(),
        }
    }

    fn next_state(&self, req: &AvRequest) -> SimResult<AvalonNext> {
        let mut pending = self.pending.clone();
        if pending.front().is_some_and(|head| head.remaining == 0) {
            pending.pop_front();
        }
        for entry in pending.iter_mut() {
            entry.remaining = entry.remaining.saturating_sub(1);
        }

        let mut next = AvalonNext {
            pending,
            write: None,
            read: None,
        };

        if req.write {
            let (index, _) = self.ram.decode(AccessType::Write, req.address)?;
            next.write = Some((index, req.writedata));
        }
        if req.read {
            let (index, _) = self.ram.decode(AccessType::Read, req.address)?;
            next.read = Some((req.address, self.ram.load_word(index)));
        }
        Ok(next)
    }
}

impl RamBacked for AvalonRam {
    fn ram(&self) -> &SinglePortRam {
        &self.ram
    }

    fn ram_mut(&mut self) -> &mut SinglePortRam {
        &mut self.ram
    }
}
