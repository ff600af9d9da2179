//! Pass-through strategy over the host's resizable byte buffers.

use indexmap::IndexMap;

use crate::alloc::{AllocKind, Allocator};
use crate::handle::AllocHandle;

/// Allocator that forwards every request to the host heap.
///
/// Each live allocation is an owned, zero-initialised byte buffer in a
/// slab keyed by handle. `realloc` resizes the buffer in place,
/// preserving the common prefix. `release` is a no-op: nothing is
/// reclaimed in bulk, and buffers not individually freed live until the
/// instance is dropped.
#[derive(Debug, Default)]
pub struct HeapAllocator {
    /// Live buffers, keyed by the handle's slab key.
    live: IndexMap<u32, Vec<u8>>,
    /// Next slab key to issue.
    next_key: u32,
}

impl HeapAllocator {
    /// Create an empty heap pass-through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (not yet freed) allocations.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// Allocate a zeroed buffer, surfacing host allocation failure as `None`.
fn zeroed_buf(len: usize) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).ok()?;
    buf.resize(len, 0);
    Some(buf)
}

impl Allocator for HeapAllocator {
    fn kind(&self) -> AllocKind {
        AllocKind::Heap
    }

    fn alloc(&mut self, size: u32) -> Option<AllocHandle> {
        let buf = zeroed_buf(size as usize)?;
        let key = self.next_key;
        self.next_key += 1;
        self.live.insert(key, buf);
        Some(AllocHandle::new(key, 0))
    }

    /// Resize `src` in place, host-`realloc` style.
    ///
    /// The common prefix is preserved; bytes gained by growing are
    /// zeroed. The returned handle is the source handle — resizing never
    /// relocates an allocation's identity.
    fn realloc(&mut self, src: Option<AllocHandle>, size: u32) -> Option<AllocHandle> {
        let src = src?;
        let buf = self.live.get_mut(&src.block())?;
        let new_len = size as usize;
        if new_len > buf.len() {
            buf.try_reserve_exact(new_len - buf.len()).ok()?;
        }
        buf.resize(new_len, 0);
        Some(src)
    }

    /// Drop one allocation. Unknown handles are ignored.
    fn free(&mut self, handle: AllocHandle) {
        self.live.swap_remove(&handle.block());
    }

    fn bytes(&self, handle: AllocHandle) -> &[u8] {
        &self.live[&handle.block()]
    }

    fn bytes_mut(&mut self, handle: AllocHandle) -> &mut [u8] {
        &mut self.live[&handle.block()]
    }
}
