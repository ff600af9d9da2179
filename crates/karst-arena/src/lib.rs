//! Append-only arena allocation for the Karst allocator family.
//!
//! [`OnceArena`] serves variable-size requests by advancing a bump cursor
//! through a growing sequence of backing blocks:
//!
//! ```text
//! OnceArena
//! ├── Block 0 (block_size bytes, bump-allocated Vec<u8>)
//! ├── Block 1 (capacity = total so far; added on first growth)
//! ├── Block 2 (capacity = total so far; added on second growth)
//! └── ...      up to max_expand growth events
//! ```
//!
//! Individual allocations are never reclaimed — `free` is a no-op by
//! design — and everything is returned to the host at once by `release`.
//! Each growth event doubles the arena's total stated capacity, and the
//! unused tail of the block being abandoned becomes a permanent hole.
//!
//! Every payload is preceded by a 4-byte little-endian length header in
//! the same block, which is how `realloc` and `bytes` recover the
//! originally requested size from a handle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod block;
pub mod config;
pub mod error;
pub mod once;

// Public re-exports for the primary API surface.
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use once::{OnceArena, HEADER_SIZE};
