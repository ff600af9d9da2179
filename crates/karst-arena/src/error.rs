//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors surfaced by arena construction, growth, and reset.
///
/// Allocation itself signals failure with `None`; these errors carry the
/// reason a backing block could not be added, for the operational error
/// channel and for fallible constructors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Configuration rejected at construction time.
    InvalidConfig {
        /// Human-readable rejection reason.
        reason: String,
    },
    /// The host refused to provide a backing block of the requested size.
    HostAlloc {
        /// Size of the block that could not be allocated.
        bytes: usize,
    },
    /// The growth ceiling has been reached; no further blocks may be
    /// added until `reset`.
    ExpandLimit {
        /// Growth events performed so far.
        expansions: u32,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
            Self::HostAlloc { bytes } => {
                write!(f, "host allocation of {bytes} bytes failed")
            }
            Self::ExpandLimit { expansions } => {
                write!(f, "growth ceiling reached after {expansions} expansions")
            }
        }
    }
}

impl Error for ArenaError {}
