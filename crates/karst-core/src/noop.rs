//! The no-op strategy.

use crate::alloc::{AllocKind, Allocator};

/// Allocator that does nothing.
///
/// For callers that allocate and free themselves but must hand an
/// allocator to an interface that requires one. Every operation is the
/// trait's null default: `alloc`/`realloc` fail, `free`/`release` do
/// nothing, and no handle is ever issued.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAllocator;

impl Allocator for NoopAllocator {
    fn kind(&self) -> AllocKind {
        AllocKind::Noop
    }
}
