//! Karst: swappable allocation strategies behind one capability trait.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Karst sub-crates. For most users, adding `karst` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use karst::prelude::*;
//!
//! // The append-only arena: bump allocation, grow-by-doubling, and a
//! // single bulk teardown.
//! let mut arena = OnceArena::new(ArenaConfig::with_block_size(1024)).unwrap();
//! let h = arena.alloc(16).expect("a fresh arena serves small requests");
//! arena.bytes_mut(h)[0] = 7;
//! assert_eq!(arena.bytes(h)[0], 7);
//!
//! // Strategies are interchangeable behind `dyn Allocator`; the kind tag
//! // tells callers which operations are safe to rely on.
//! let mut strategies: Vec<Box<dyn Allocator>> = vec![
//!     Box::new(NoopAllocator),
//!     Box::new(HeapAllocator::new()),
//!     Box::new(BoxedAllocator::new()),
//!     Box::new(arena),
//! ];
//! for s in &mut strategies {
//!     if let Some(h) = s.alloc(8) {
//!         assert_eq!(s.bytes(h).len(), 8);
//!         if s.kind() == AllocKind::Boxed {
//!             // Fixed object allocations cannot be resized in place.
//!             assert!(s.realloc(Some(h), 16).is_none());
//!         }
//!     }
//!     s.release();
//! }
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `karst-arena` | `OnceArena`, `ArenaConfig`, `ArenaError` |
//! | [`types`] | `karst-core` | The `Allocator` trait, handles, reports, pass-through strategies |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use karst_arena as arena;
pub use karst_core as types;

/// Everything needed to allocate through any Karst strategy.
pub mod prelude {
    pub use karst_arena::{ArenaConfig, ArenaError, OnceArena, HEADER_SIZE};
    pub use karst_core::{
        AllocHandle, AllocKind, AllocReport, Allocator, BoxedAllocator, HeapAllocator,
        NoopAllocator,
    };
}
