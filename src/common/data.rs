//! Memory Access Types.
//!
//! This module defines the classification of bus accesses used throughout
//! the simulator. Faults carry the access type so that a terminated run can
//! report which operation triggered it.

use std::fmt;

/// Type of bus access operation.
///
/// A request channel carries either a read or a write in a given cycle,
/// never both, so a single enum covers every access the bus can see.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access.
    ///
    /// The response carries `read_data` alongside the acknowledgment.
    Read,

    /// Data write access.
    ///
    /// The request carries `write_data`; the response is a bare acknowledgment.
    Write,
}

impl AccessType {
    /// Maps a write-enable line onto the access type it selects.
    pub fn from_we(we: bool) -> Self {
        if we {
            AccessType::Write
        } else {
            AccessType::Read
        }
    }

    /// Returns `true` for write accesses.
    pub fn is_write(self) -> bool {
        self == AccessType::Write
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::Read => write!(f, "read"),
            AccessType::Write => write!(f, "write"),
        }
    }
}
