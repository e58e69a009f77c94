//! Bus statistics collection and reporting.
//!
//! Tracks per-port grant, acknowledgment, and waiting counts together with
//! overall read/write traffic and the cycles the shared slave spent busy.

use crate::common::error::{SimError, SimResult};
use serde::Serialize;
use std::time::Instant;

/// Bus statistics structure tracking all fabric metrics.
#[derive(Debug, Clone, Serialize)]
pub struct BusStats {
    #[serde(skip)]
    start_time: Instant,
    pub cycles: u64,

    pub grants: Vec<u64>,
    pub acks: Vec<u64>,
    /// Cycles each port spent with its request asserted and unacknowledged.
    pub wait_cycles: Vec<u64>,

    pub reads: u64,
    pub writes: u64,

    /// Cycles a request sat on the shared channel while the slave was mid-transaction.
    pub slave_busy_cycles: u64,
}

impl BusStats {
    /// Creates zeroed counters for `ports` requesters.
    pub fn new(ports: usize) -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            grants: vec![0; ports],
            acks: vec![0; ports],
            wait_cycles: vec![0; ports],
            reads: 0,
            writes: 0,
            slave_busy_cycles: 0,
        }
    }

    /// Longest wait any port accumulated.
    pub fn max_wait(&self) -> u64 {
        self.wait_cycles.iter().copied().max().unwrap_or(0)
    }

    /// Serializes the counters as pretty-printed JSON.
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Io {
            path: "<stats>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Prints a formatted summary of all bus statistics.
    pub fn print(&self) {
        let duration = self.start_time.elapsed();
        let seconds = duration.as_secs_f64();

        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let transactions = self.reads + self.writes;
        let khz = (self.cycles as f64 / seconds) / 1000.0;

        println!("\n==========================================================");
        println!("SERVIO BUS SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!("bus_transactions         {}", transactions);
        println!(
            "bus_utilization          {:.2}%",
            (transactions as f64 / cyc as f64) * 100.0
        );
        println!("----------------------------------------------------------");
        println!("TRAFFIC");
        println!("  op.read                {}", self.reads);
        println!("  op.write               {}", self.writes);
        println!(
            "  slave.busy             {} ({:.2}%)",
            self.slave_busy_cycles,
            (self.slave_busy_cycles as f64 / cyc as f64) * 100.0
        );
        println!("----------------------------------------------------------");
        println!("ARBITRATION");
        for (port, ((grants, acks), waits)) in self
            .grants
            .iter()
            .zip(&self.acks)
            .zip(&self.wait_cycles)
            .enumerate()
        {
            println!(
                "  port{:<3} grants: {:<8} | acks: {:<8} | wait_cycles: {}",
                port, grants, acks, waits
            );
        }
        println!("  max_wait               {}", self.max_wait());
        println!("==========================================================");
    }
}
