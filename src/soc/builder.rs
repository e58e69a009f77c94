//! System-on-Chip (SoC) Builder.
//!
//! This module defines the `System` structure, which owns the requesters,
//! the arbiter, and the shared slave, and advances them together one clock
//! edge at a time. It also wires the two supported topologies from the
//! configuration.

use crate::common::data::AccessType;
use crate::common::error::{SimError, SimResult};
use crate::config::Config;
use crate::sim::loader;
use crate::sim::requester::{Access, ScriptedRequester};
use crate::soc::bridge::BridgedSlave;
use crate::soc::interconnect::{Arbiter, ArbiterState};
use crate::soc::memory::avalon::AvalonRam;
use crate::soc::memory::controller;
use crate::soc::memory::wishbone::WishboneRam;
use crate::soc::memory::SinglePortRam;
use crate::soc::signals::{WbRequest, WbResponse};
use crate::soc::traits::{Clocked, RamBacked, WishboneSlave};
use crate::stats::BusStats;

/// Arbiter, bridge, and latency-bearing Avalon RAM.
pub type MuxSystem = System<BridgedSlave<AvalonRam>>;

/// Instruction and loader ports sharing a Wishbone RAM.
pub type RomSystem = System<WishboneRam>;

/// Port index of the read-only instruction bus in a [`RomSystem`].
pub const ROM_IBUS_PORT: usize = 0;

/// Port index of the loader bus in a [`RomSystem`].
pub const ROM_LOADER_PORT: usize = 1;

/// What happened on the fabric during one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 0.
    pub cycle: u64,
    /// Request lines of every port.
    pub requests: Vec<WbRequest>,
    /// Port driving the shared channel.
    pub grant: Option<usize>,
    /// Response seen by every port.
    pub responses: Vec<WbResponse>,
}

impl TickReport {
    /// Ports that observed `ack` this tick.
    pub fn acked_ports(&self) -> Vec<usize> {
        self.responses
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.ack.then_some(i))
            .collect()
    }
}

/// The requesters, the arbiter, and one shared slave.
pub struct System<S: WishboneSlave> {
    requesters: Vec<ScriptedRequester>,
    read_only: Vec<bool>,
    arbiter: Arbiter,
    slave: S,
    cycle: u64,
    max_cycles: u64,
    /// Fabric counters.
    pub stats: BusStats,
}

impl<S: WishboneSlave> System<S> {
    /// Creates a system with `ports` requesters in front of `slave`.
    ///
    /// # Arguments
    ///
    /// * `slave` - The shared downstream slave.
    /// * `ports` - Number of requester ports on the arbiter.
    /// * `max_cycles` - Watchdog limit for [`System::run_until_idle`].
    ///
    /// # Errors
    ///
    /// `ConfigurationError` when `ports` is zero.
    pub fn new(slave: S, ports: usize, max_cycles: u64) -> SimResult<Self> {
        let arbiter = Arbiter::new(ports)?;
        let requesters = (0..ports)
            .map(|i| ScriptedRequester::new(&format!("wb_s{}", i)))
            .collect();
        log::info!("[System] {} requester(s) -> {}", ports, slave.name());
        Ok(Self {
            requesters,
            read_only: vec![false; ports],
            arbiter,
            slave,
            cycle: 0,
            max_cycles,
            stats: BusStats::new(ports),
        })
    }

    pub fn ports(&self) -> usize {
        self.requesters.len()
    }

    /// Number of ticks simulated so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn slave(&self) -> &S {
        &self.slave
    }

    pub fn requester(&self, port: usize) -> Option<&ScriptedRequester> {
        self.requesters.get(port)
    }

    pub fn requesters(&self) -> &[ScriptedRequester] {
        &self.requesters
    }

    /// Marks `port` as unable to issue writes.
    pub fn set_read_only(&mut self, port: usize, read_only: bool) -> SimResult<()> {
        self.check_port(port)?;
        self.read_only[port] = read_only;
        Ok(())
    }

    fn check_port(&self, port: usize) -> SimResult<()> {
        if port >= self.requesters.len() {
            return Err(SimError::ProtocolViolation(format!(
                "port {} does not exist ({} ports)",
                port,
                self.requesters.len()
            )));
        }
        Ok(())
    }

    /// Queues `access` on requester `port`.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` for a nonexistent port or a write on a read-only port.
    pub fn submit(&mut self, port: usize, access: Access) -> SimResult<()> {
        self.check_port(port)?;
        if access.op == AccessType::Write && self.read_only[port] {
            return Err(SimError::ProtocolViolation(format!(
                "write to {:#x} on read-only port {}",
                access.address, port
            )));
        }
        self.requesters[port].submit(access);
        Ok(())
    }

    /// Withdraws the request `port` is presenting, before it is granted.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if `port` currently holds the grant: its access is
    /// already on the shared channel and cannot be taken back.
    pub fn withdraw(&mut self, port: usize) -> SimResult<Option<Access>> {
        self.check_port(port)?;
        if self.arbiter.grant() == Some(port) {
            return Err(SimError::ProtocolViolation(format!(
                "port {} withdrew its request while holding the grant",
                port
            )));
        }
        Ok(self.requesters[port].withdraw())
    }

    /// Returns `true` once every queue has drained and the channel is free.
    pub fn is_idle(&self) -> bool {
        self.arbiter.state() == ArbiterState::Idle && self.requesters.iter().all(|r| r.is_idle())
    }

    /// Advances every component by one clock edge.
    ///
    /// All outputs are computed from present state, then all next states,
    /// then everything is committed together.
    ///
    /// # Errors
    ///
    /// Any addressing or alignment fault raised by the slave aborts the tick
    /// before anything is committed.
    pub fn tick(&mut self) -> SimResult<TickReport> {
        let requests: Vec<WbRequest> = self.requesters.iter().map(|r| r.output()).collect();
        let slave_resp = self.slave.respond();
        let outputs = self.arbiter.evaluate(&requests, &slave_resp)?;

        let arbiter_next = self.arbiter.next_state(&outputs, &slave_resp);
        let slave_next = self.slave.next_state(&outputs.downstream).map_err(|e| {
            log::error!("[System] cycle {}: {}", self.cycle, e);
            e
        })?;
        let requester_next: Vec<_> = self
            .requesters
            .iter()
            .zip(&outputs.upstream)
            .map(|(r, resp)| r.next_state(self.cycle, resp))
            .collect();

        self.record(&requests, &outputs.upstream, outputs.grant);

        log::trace!(
            "[System] cycle {:>6} grant={:?} down={:?} ack={:?}",
            self.cycle,
            outputs.grant,
            outputs.downstream,
            outputs.acked()
        );

        self.arbiter.commit(arbiter_next);
        self.slave.commit(slave_next);
        for (requester, next) in self.requesters.iter_mut().zip(requester_next) {
            requester.commit(next);
        }

        let report = TickReport {
            cycle: self.cycle,
            requests,
            grant: outputs.grant,
            responses: outputs.upstream,
        };
        self.cycle += 1;
        Ok(report)
    }

    fn record(&mut self, requests: &[WbRequest], responses: &[WbResponse], grant: Option<usize>) {
        self.stats.cycles += 1;

        if self.arbiter.state() == ArbiterState::Idle {
            if let Some(i) = grant {
                self.stats.grants[i] += 1;
            }
        }
        if grant.is_some() && !self.slave.accepting() {
            self.stats.slave_busy_cycles += 1;
        }

        for (i, (req, resp)) in requests.iter().zip(responses).enumerate() {
            if resp.ack {
                self.stats.acks[i] += 1;
                match req.access() {
                    AccessType::Read => self.stats.reads += 1,
                    AccessType::Write => self.stats.writes += 1,
                }
            } else if req.cyc {
                self.stats.wait_cycles[i] += 1;
            }
        }
    }

    /// Runs exactly `cycles` ticks.
    pub fn run(&mut self, cycles: u64) -> SimResult<()> {
        for _ in 0..cycles {
            self.tick()?;
        }
        Ok(())
    }

    /// Runs until every queued access has completed.
    ///
    /// Returns the number of ticks taken.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if the fabric is still busy after the watchdog
    /// limit, plus any fault raised along the way.
    pub fn run_until_idle(&mut self) -> SimResult<u64> {
        let start = self.cycle;
        while !self.is_idle() {
            if self.cycle - start >= self.max_cycles {
                return Err(SimError::ProtocolViolation(format!(
                    "watchdog: fabric still busy after {} cycles",
                    self.max_cycles
                )));
            }
            self.tick()?;
        }
        Ok(self.cycle - start)
    }
}

impl<S: WishboneSlave + RamBacked> System<S> {
    pub fn ram(&self) -> &SinglePortRam {
        self.slave.ram()
    }

    pub fn ram_mut(&mut self) -> &mut SinglePortRam {
        self.slave.ram_mut()
    }

    /// Loads a flat little-endian image from word 0, bypassing the bus.
    pub fn load_image(&mut self, data: &[u8]) -> SimResult<usize> {
        loader::load_image(self.slave.ram_mut(), data)
    }
}

/// Builds the arbiter → bridge → Avalon RAM topology.
pub fn build_mux(config: &Config) -> SimResult<MuxSystem> {
    config.validate()?;
    let ram = SinglePortRam::from_config(&config.memory)?;
    log::info!(
        "[System] RAM {} x {} bits, read latency {}..={} cycles",
        ram.depth(),
        ram.width(),
        config.bus.read_latency_min,
        config.bus.read_latency_max
    );
    let memory = AvalonRam::new("avm_s4", ram, controller::from_config(&config.bus));
    System::new(
        BridgedSlave::new(memory),
        config.bus.requester_count,
        config.general.max_cycles,
    )
}

/// Builds the instruction/loader ports → Wishbone RAM topology.
///
/// Port [`ROM_IBUS_PORT`] is read-only; [`ROM_LOADER_PORT`] may write.
pub fn build_rom(config: &Config) -> SimResult<RomSystem> {
    config.validate()?;
    let ram = SinglePortRam::from_config(&config.memory)?;
    log::info!("[System] ROM {} x {} bits", ram.depth(), ram.width());
    let mut system = System::new(WishboneRam::new("rom", ram), 2, config.general.max_cycles)?;
    system.set_read_only(ROM_IBUS_PORT, true)?;
    Ok(system)
}
