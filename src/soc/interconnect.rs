//! Bus Interconnect.
//!
//! This module implements the round-robin arbiter that lets several Wishbone
//! masters share one downstream Wishbone channel. It multiplexes the granted
//! master's lines onto the shared channel and routes the slave's response
//! back to that master only.
//!
//! The grant is a single `Option<usize>`, so two masters can never own the
//! channel in the same cycle.

use crate::common::error::{SimError, SimResult};
use crate::soc::signals::{WbRequest, WbResponse};
use crate::soc::traits::Clocked;

/// Registered ownership of the shared channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ArbiterState {
    /// Nobody holds the channel; arbitration happens this cycle.
    #[default]
    Idle,
    /// Port `i` holds the channel until the slave acknowledges.
    Granted(usize),
}

/// Combinational outputs of the arbiter for one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArbiterOutputs {
    /// Port whose lines drive the shared channel this cycle.
    pub grant: Option<usize>,
    /// Lines presented on the shared channel.
    pub downstream: WbRequest,
    /// Response seen by each upstream port.
    pub upstream: Vec<WbResponse>,
}

impl ArbiterOutputs {
    /// Returns the port receiving `ack` this cycle, if any.
    pub fn acked(&self) -> Option<usize> {
        self.upstream.iter().position(|r| r.ack)
    }
}

/// Registered state latched by the [`Arbiter`] at the clock edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArbiterNext {
    state: ArbiterState,
    last_winner: Option<usize>,
}

/// Round-robin N-to-1 Wishbone arbiter.
pub struct Arbiter {
    ports: usize,
    state: ArbiterState,
    /// Most recent winner; the priority search starts just after it.
    last_winner: Option<usize>,
}

impl Arbiter {
    /// Creates an idle arbiter with `ports` upstream masters.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` when `ports` is zero.
    pub fn new(ports: usize) -> SimResult<Self> {
        if ports == 0 {
            return Err(SimError::ConfigurationError(
                "arbiter needs at least one port".to_string(),
            ));
        }
        Ok(Self {
            ports,
            state: ArbiterState::Idle,
            last_winner: None,
        })
    }

    pub fn ports(&self) -> usize {
        self.ports
    }

    pub fn state(&self) -> ArbiterState {
        self.state
    }

    /// Returns the registered grant holder.
    pub fn grant(&self) -> Option<usize> {
        match self.state {
            ArbiterState::Granted(i) => Some(i),
            ArbiterState::Idle => None,
        }
    }

    pub fn last_winner(&self) -> Option<usize> {
        self.last_winner
    }

    /// Picks the first requesting port after the most recent winner.
    ///
    /// With no previous winner the lowest requesting index wins.
    pub fn select(&self, requests: &[WbRequest]) -> Option<usize> {
        let start = self.last_winner.map_or(0, |w| (w + 1) % self.ports);
        (0..self.ports)
            .map(|k| (start + k) % self.ports)
            .find(|&i| requests[i].cyc)
    }

    /// Computes the grant, the shared channel lines, and the upstream responses.
    ///
    /// While a port holds the grant, no other port's lines are looked at. The
    /// downstream response is routed only to a port that held the grant
    /// before this cycle, since a slave cannot answer a request in the cycle
    /// it first appears.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if `requests` does not have one entry per port.
    pub fn evaluate(&self, requests: &[WbRequest], downstream: &WbResponse) -> SimResult<ArbiterOutputs> {
        if requests.len() != self.ports {
            return Err(SimError::ProtocolViolation(format!(
                "arbiter has {} ports but saw {} request channels",
                self.ports,
                requests.len()
            )));
        }

        let grant = match self.state {
            ArbiterState::Granted(i) => Some(i),
            ArbiterState::Idle => self.select(requests),
        };

        let mut upstream = vec![WbResponse::none(); self.ports];
        if let ArbiterState::Granted(i) = self.state {
            upstream[i] = *downstream;
        }

        Ok(ArbiterOutputs {
            grant,
            downstream: grant.map_or_else(WbRequest::idle, |i| requests[i]),
            upstream,
        })
    }

    /// Computes the registered state for the next cycle.
    ///
    /// A fresh grant moves to `Granted` and updates the round-robin pointer;
    /// an acknowledged grant returns to `Idle`, where the next cycle
    /// re-arbitrates among whoever is still requesting.
    pub fn next_state(&self, outputs: &ArbiterOutputs, downstream: &WbResponse) -> ArbiterNext {
        match self.state {
            ArbiterState::Idle => match outputs.grant {
                Some(i) => ArbiterNext {
                    state: ArbiterState::Granted(i),
                    last_winner: Some(i),
                },
                None => ArbiterNext {
                    state: ArbiterState::Idle,
                    last_winner: self.last_winner,
                },
            },
            ArbiterState::Granted(i) => ArbiterNext {
                state: if downstream.ack {
                    ArbiterState::Idle
                } else {
                    ArbiterState::Granted(i)
                },
                last_winner: self.last_winner,
            },
        }
    }
}

impl Clocked for Arbiter {
    type Next = ArbiterNext;

    fn commit(&mut self, next: ArbiterNext) {
        if next.state != self.state {
            match next.state {
                ArbiterState::Granted(i) => log::debug!("[Arbiter] grant -> port {}", i),
                ArbiterState::Idle => log::debug!("[Arbiter] release"),
            }
        }
        self.state = next.state;
        self.last_winner = next.last_winner;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_rotates_after_winner() {
        let mut arb = Arbiter::new(4).unwrap();
        let all = vec![WbRequest::read(0); 4];
        assert_eq!(arb.select(&all), Some(0));

        arb.last_winner = Some(0);
        assert_eq!(arb.select(&all), Some(1));

        arb.last_winner = Some(3);
        assert_eq!(arb.select(&all), Some(0));
    }

    #[test]
    fn select_skips_idle_ports() {
        let mut arb = Arbiter::new(4).unwrap();
        let mut reqs = vec![WbRequest::idle(); 4];
        reqs[2] = WbRequest::read(8);
        arb.last_winner = Some(2);
        assert_eq!(arb.select(&reqs), Some(2));
    }
}
