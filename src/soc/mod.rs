//! System-on-Chip components: the memory model, its bus ports, the arbiter,
//! and the Wishbone-to-Avalon bridge.

/// Wishbone-to-Avalon protocol bridge.
pub mod bridge;

/// System container, topology wiring, and the tick loop.
pub mod builder;

/// Round-robin bus arbiter.
pub mod interconnect;

/// Addressable memory model and its slave ports.
pub mod memory;

/// Per-cycle channel signal snapshots.
pub mod signals;

/// Clocked component and slave port traits.
pub mod traits;

pub use builder::{build_mux, build_rom, MuxSystem, RomSystem, System};
