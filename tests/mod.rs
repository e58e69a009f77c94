//! Test module organization.
//!
//! This module organizes all integration tests for the I/O subsystem simulator.






/// Log backend installation tests.
mod logger_tests;

/// Single-port RAM model tests.
mod memory_tests;

/// Stress tests and randomized workloads.
mod stress_tests;
