//! Memory-Mapped I/O Subsystem Simulator Library.
//!
//! This crate implements a cycle-level model of the memory-mapped I/O fabric
//! of a small RISC-V SoC: a single-port RAM shared by several bus masters
//! through a round-robin arbiter, with a bridge between the Wishbone
//! strobe/acknowledge handshake and the Avalon-MM latched-request handshake.
//!
//! # Architecture
//!
//! * **Memory**: word-backed RAM with byte addressing and whole-word accesses.
//! * **Interconnect**: N-to-1 round-robin arbiter with exclusive grants.
//! * **Bridge**: single-outstanding Wishbone-to-Avalon adapter.
//!
//! Every component computes its next state from the present state of the
//! whole system, and all next states are committed together at each tick.
//!
//! # Modules
//!
//! * `common`: Shared types, edge detection, and error handling.
//! * `config`: Configuration loading and validation.
//! * `logger`: Log output.
//! * `sim`: Image loader and scripted requesters.
//! * `soc`: Memory, arbiter, bridge, and system wiring.
//! * `stats`: Bus statistics collection.

/// Shared types, error handling, and the valid-pulse edge detector.
pub mod common;

/// Configuration for memory geometry, bus topology, and run limits.
///
/// Loaded from TOML files with per-field defaults.
pub mod config;

/// Stderr backend for the `log` facade.
pub mod logger;

/// Simulation harness components.
///
/// Loads flat binary images and drives the bus with scripted requesters.
pub mod sim;

/// System-on-Chip components.
///
/// Implements the memory model, its Wishbone and Avalon ports, the arbiter,
/// and the protocol bridge, and wires them into a tickable system.
pub mod soc;

/// Bus statistics collection and reporting.
pub mod stats;
