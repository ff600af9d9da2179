//! Diagnostic memory-accounting reports.

use std::fmt;

/// Point-in-time memory accounting for an allocator instance.
///
/// `free_bytes` counts only space the allocator can still hand out —
/// for the arena that is the tail of the current block, not the stranded
/// tails of exhausted blocks. Those show up as `hole_bytes`, derived as
/// `total - used - free`.
///
/// After any arena reallocation, `used_bytes` undercounts the physically
/// occupied bytes; see `OnceArena::realloc` in `karst-arena` for the
/// documented accounting anomaly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocReport {
    /// Total capacity across all backing blocks, in bytes.
    pub total_bytes: usize,
    /// Bytes handed out, length headers included.
    pub used_bytes: usize,
    /// Bytes still available for allocation.
    pub free_bytes: usize,
    /// Permanently stranded bytes: `total - used - free`.
    pub hole_bytes: usize,
    /// Number of backing blocks currently held.
    pub block_count: usize,
}

impl fmt::Display for AllocReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total_bytes: {}", self.total_bytes)?;
        writeln!(f, "free_bytes: {}", self.free_bytes)?;
        writeln!(f, "used_bytes: {}", self.used_bytes)?;
        writeln!(f, "hole_bytes: {}", self.hole_bytes)?;
        write!(f, "block_count: {}", self.block_count)
    }
}
