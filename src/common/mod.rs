//! Common utilities and types used throughout the I/O subsystem simulator.
//!
//! This module provides the access classification, error handling, and the
//! single-bit edge detector that are shared across the memory model, the
//! arbiter, and the protocol bridge.

/// Memory access type definitions.
pub mod data;

/// Valid-pulse edge detection.
pub mod edge;

/// Error types for configuration, addressing, and protocol faults.
pub mod error;

pub use data::AccessType;
pub use edge::EdgePulse;
pub use error::{SimError, SimResult};
