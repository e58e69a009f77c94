//! Simulation harness: image loading and behavioral bus requesters.

/// Flat binary image loading.
pub mod loader;

/// Queue-driven Wishbone masters.
pub mod requester;
