//! Read Latency Controller.
//!
//! This module defines the `MemoryController` trait and implementations for
//! choosing how many cycles an Avalon read takes before its `readdatavalid`
//! pulse. It supports a fixed-latency model and a seeded random model that
//! draws each latency from a closed range.

use crate::config::BusConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Trait for read latency models.
pub trait MemoryController {
    /// Returns the latency for a read at a specific address.
    ///
    /// # Arguments
    ///
    /// * `addr` - The byte address being read.
    ///
    /// # Returns
    ///
    /// The number of cycles from the read strobe to the valid pulse, at least 1.
    fn access_latency(&mut self, addr: u64) -> u64;
}

/// A controller with fixed latency.
///
/// Every read completes the same number of cycles after its strobe.
pub struct SimpleController {
    /// Fixed latency per read.
    latency: u64,
}

impl SimpleController {
    /// Creates a new SimpleController.
    ///
    /// # Arguments
    ///
    /// * `latency` - The fixed latency in cycles; clamped to at least 1.
    pub fn new(latency: u64) -> Self {
        Self {
            latency: latency.max(1),
        }
    }
}

impl MemoryController for SimpleController {
    /// Returns the fixed latency regardless of the address.
    fn access_latency(&mut self, _addr: u64) -> u64 {
        self.latency
    }
}

/// A controller with uniformly distributed latency.
///
/// Models a slave whose read completion time varies per access, between
/// `min` and `max` cycles inclusive. The generator is seeded so runs repeat.
pub struct VariableController {
    min: u64,
    max: u64,
    rng: StdRng,
}

impl VariableController {
    /// Creates a new VariableController.
    ///
    /// # Arguments
    ///
    /// * `min` - Shortest latency, clamped to at least 1.
    /// * `max` - Longest latency, raised to `min` if smaller.
    /// * `seed` - Seed for the latency sequence.
    pub fn new(min: u64, max: u64, seed: u64) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MemoryController for VariableController {
    fn access_latency(&mut self, _addr: u64) -> u64 {
        self.rng.gen_range(self.min..=self.max)
    }
}

/// Picks the latency model described by the `[bus]` section.
pub fn from_config(config: &BusConfig) -> Box<dyn MemoryController> {
    if config.read_latency_min == config.read_latency_max {
        Box::new(SimpleController::new(config.read_latency_min))
    } else {
        Box::new(VariableController::new(
            config.read_latency_min,
            config.read_latency_max,
            config.latency_seed,
        ))
    }
}
