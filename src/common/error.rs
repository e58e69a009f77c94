//! Simulator Error Types.
//!
//! Every fault the subsystem can raise is a variant of [`SimError`]. None of
//! them is retried internally: configuration errors abort setup, per-access
//! faults abort the running simulation with the offending address attached.

use crate::common::data::AccessType;
use thiserror::Error;

/// Errors raised by the memory model, the bus fabric, and the harness.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Word index beyond the configured depth.
    #[error("addressing fault: {op} at {address:#x} (word index {index} >= depth {depth})")]
    AddressingFault {
        /// Operation that presented the address.
        op: AccessType,
        /// Raw byte address as presented by the requester.
        address: u64,
        /// Decoded word index.
        index: u64,
        /// Configured word count.
        depth: usize,
    },

    /// Nonzero byte offset presented while strict alignment is required.
    #[error("alignment fault: {op} at {address:#x} (byte offset {offset})")]
    AlignmentFault {
        /// Operation that presented the address.
        op: AccessType,
        /// Raw byte address as presented by the requester.
        address: u64,
        /// Decoded byte-in-word offset.
        offset: u64,
    },

    /// Bus handshake rule broken by a caller.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Invalid parameter combination, raised before any access is possible.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// Host I/O failure while loading an image or writing a report.
    #[error("I/O error on '{path}': {reason}")]
    Io {
        /// File being accessed.
        path: String,
        /// Underlying OS error message.
        reason: String,
    },
}

impl SimError {
    /// Returns the faulting address for per-access faults.
    pub fn address(&self) -> Option<u64> {
        match self {
            SimError::AddressingFault { address, .. } | SimError::AlignmentFault { address, .. } => {
                Some(*address)
            }
            _ => None,
        }
    }

    /// Returns the operation that triggered a per-access fault.
    pub fn op(&self) -> Option<AccessType> {
        match self {
            SimError::AddressingFault { op, .. } | SimError::AlignmentFault { op, .. } => Some(*op),
            _ => None,
        }
    }
}

/// Convenience alias used by every fallible operation in the crate.
pub type SimResult<T> = Result<T, SimError>;
