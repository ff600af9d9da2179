//! Benchmark profiles for the Karst allocator family.
//!
//! Provides pre-built arena configurations sized so that benchmarks
//! exercise the intended code path (pure bump advance vs. repeated
//! growth) without touching the 100 MiB production default.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use karst_arena::{ArenaConfig, OnceArena};

/// Per-request payload size used by the throughput benchmarks.
pub const PAYLOAD_BYTES: u32 = 64;

/// Arena sized to absorb the whole throughput run in block 0.
///
/// 10k requests at 64+4 bytes each is well under 1 MiB, so the bump
/// path never grows.
pub fn steady_state_arena() -> OnceArena {
    OnceArena::new(ArenaConfig::with_block_size(1024 * 1024))
        .expect("1 MiB initial block allocates on any bench host")
}

/// Arena sized so the run repeatedly exhausts blocks and doubles.
///
/// Block 0 holds 4 KiB; the default growth budget of 10 doublings caps
/// the run at 4 MiB total.
pub fn growth_path_arena() -> OnceArena {
    OnceArena::new(ArenaConfig::with_block_size(4 * 1024))
        .expect("4 KiB initial block allocates on any bench host")
}
