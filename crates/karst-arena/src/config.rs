//! Arena configuration parameters.

/// Configuration for [`OnceArena`](crate::OnceArena).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity of block 0 in bytes.
    ///
    /// Also the permanent ceiling on a single allocation (header
    /// included): growth enlarges the arena's total capacity, never the
    /// largest request it will serve. Must exceed the length header.
    pub block_size: usize,

    /// Maximum number of growth events.
    ///
    /// Each event doubles total stated capacity, so the arena tops out
    /// at `block_size * 2^max_expand` bytes. Requests that need a block
    /// beyond this ceiling fail.
    pub max_expand: u32,
}

impl ArenaConfig {
    /// Default capacity of block 0: 100 MiB.
    pub const DEFAULT_BLOCK_SIZE: usize = 100 * 1024 * 1024;

    /// Default growth ceiling: 10 doublings, bounding the arena at
    /// roughly 100 GiB from the default block size.
    pub const MAX_EXPAND_TIMES: u32 = 10;

    /// Config with the given block-0 capacity and the default ceiling.
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size,
            max_expand: Self::MAX_EXPAND_TIMES,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::with_block_size(Self::DEFAULT_BLOCK_SIZE)
    }
}
