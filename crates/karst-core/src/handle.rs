//! Opaque allocation handles.
//!
//! An [`AllocHandle`] stands in for the raw payload pointer of a
//! pointer-based allocator. It encodes enough for the issuing strategy to
//! resolve the payload in O(1); the meaning of its fields is private to
//! that strategy (the arena reads them as block index + byte offset, the
//! pass-through strategies as a slab key).

use std::fmt;

/// Locator for one allocation, issued and resolved by an [`Allocator`].
///
/// Handles are plain data: copying one does not duplicate the
/// allocation, and dropping one does not free it — strategies that
/// reclaim at all do so through [`Allocator::free`] or in bulk. Passing
/// a handle to an allocator that did not issue it is a contract
/// violation and panics on resolution.
///
/// [`Allocator`]: crate::Allocator
/// [`Allocator::free`]: crate::Allocator::free
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AllocHandle {
    /// Backing block (arena) or slab key (pass-through).
    block: u32,
    /// Payload byte offset within the block; 0 for slab strategies.
    offset: usize,
}

impl AllocHandle {
    /// Create a handle. Normally only called by allocator implementations.
    pub fn new(block: u32, offset: usize) -> Self {
        Self { block, offset }
    }

    /// The backing block index or slab key.
    pub fn block(&self) -> u32 {
        self.block
    }

    /// The payload byte offset within the backing block.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for AllocHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AllocHandle(block={}, offset={})", self.block, self.offset)
    }
}
