//! The allocation capability trait and strategy tag.
//!
//! [`Allocator`] is the uniform surface over the closed strategy set
//! {no-op, heap pass-through, boxed pass-through, append-only arena}.
//! Callers obtain a concrete strategy, allocate through it, and tear it
//! down with [`Allocator::release`] — swapping strategies never changes
//! call sites. [`AllocKind`] lets callers branch on strategy at runtime,
//! e.g. to decide whether [`Allocator::realloc`] is safe to call.

use std::fmt;

use crate::handle::AllocHandle;
use crate::report::AllocReport;

/// Runtime tag identifying a concrete allocation strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AllocKind {
    /// No strategy: every operation is a no-op.
    Noop,
    /// Pass-through to the host's resizable byte buffers.
    Heap,
    /// Pass-through to the host's fixed-size buffers; no reallocation.
    Boxed,
    /// Append-only bump arena; allocations are reclaimed all at once.
    Once,
}

impl fmt::Display for AllocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Noop => "noop",
            Self::Heap => "heap",
            Self::Boxed => "boxed",
            Self::Once => "once",
        };
        f.write_str(name)
    }
}

/// The allocation capability every strategy implements.
///
/// Failures are signalled by `None`, never by panicking: `alloc` returns
/// `None` when the request cannot be served, and `realloc` returns `None`
/// when passed `None` or when the underlying allocation fails — in which
/// case the source allocation is left untouched and still valid.
///
/// Handles are resolved to payload bytes with [`Allocator::bytes`] /
/// [`Allocator::bytes_mut`]. A handle is only meaningful to the allocator
/// instance that issued it, and only until that instance's `release`.
///
/// The default method bodies implement the null strategy: allocation
/// always fails and teardown does nothing. Concrete strategies override
/// what they support.
pub trait Allocator {
    /// The strategy tag for this allocator.
    fn kind(&self) -> AllocKind;

    /// Allocate `size` bytes, zero-initialised.
    ///
    /// Returns `None` if the request cannot be served.
    fn alloc(&mut self, size: u32) -> Option<AllocHandle> {
        let _ = size;
        None
    }

    /// Reallocate `src` to `size` bytes, preserving the common prefix.
    ///
    /// `None` as the source always fails. On failure the source
    /// allocation is untouched and remains valid.
    fn realloc(&mut self, src: Option<AllocHandle>, size: u32) -> Option<AllocHandle> {
        let _ = (src, size);
        None
    }

    /// Free a single allocation. May be a no-op, depending on strategy.
    fn free(&mut self, handle: AllocHandle) {
        let _ = handle;
    }

    /// Reclaim everything this allocator holds in one step.
    ///
    /// Invalidates every handle the instance has issued. Strategies that
    /// retain nothing to reclaim in bulk implement this as a no-op.
    fn release(&mut self) {}

    /// Resolve a handle to its payload bytes.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not issued by this allocator or has been
    /// invalidated by `free`/`release`.
    fn bytes(&self, handle: AllocHandle) -> &[u8] {
        panic!("{} allocator cannot resolve {handle}", self.kind());
    }

    /// Resolve a handle to its payload bytes, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not issued by this allocator or has been
    /// invalidated by `free`/`release`.
    fn bytes_mut(&mut self, handle: AllocHandle) -> &mut [u8] {
        panic!("{} allocator cannot resolve {handle}", self.kind());
    }

    /// Diagnostic snapshot of the allocator's memory accounting.
    ///
    /// Strategies without bulk bookkeeping return an empty report.
    fn report(&self) -> AllocReport {
        AllocReport::default()
    }
}
