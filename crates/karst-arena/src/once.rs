//! The append-only arena strategy.

use karst_core::{AllocHandle, AllocKind, AllocReport, Allocator};
use smallvec::SmallVec;

use crate::block::Block;
use crate::config::ArenaConfig;
use crate::error::ArenaError;

/// Size in bytes of the length header preceding every payload.
///
/// The header records the payload's requested size as a little-endian
/// `u32`, which is how the arena recovers it from a handle later.
pub const HEADER_SIZE: usize = std::mem::size_of::<u32>();

/// Bump arena that allocates forward and only ever frees in bulk.
///
/// Requests are served from the tail of the current block; when a
/// request does not fit, the arena grows by appending a new block whose
/// capacity equals the total capacity of all existing blocks, doubling
/// the arena with every growth event. The tail of the abandoned block
/// is stranded permanently — there is no compaction.
///
/// Two hard limits apply regardless of growth:
///
/// - a single allocation (header included) can never exceed
///   [`ArenaConfig::block_size`], the capacity of block 0;
/// - at most [`ArenaConfig::max_expand`] growth events are performed.
///
/// [`Allocator::free`] is a no-op by design. Reclamation is by
/// generation: [`Allocator::release`] retires the current generation,
/// returning every block to the host at once and invalidating all
/// handles issued since the last retirement; [`OnceArena::reset`] then
/// restores the fresh single-block state. Dropping the arena releases
/// its blocks as well. There is no per-allocation reclamation.
///
/// Exactly one thread of control may use an instance at a time; the
/// `&mut self` receivers make this a compile-time guarantee rather than
/// a usage precondition.
pub struct OnceArena {
    /// Backing blocks, oldest first. The last block is current; empty
    /// after `release`.
    blocks: SmallVec<[Block; 1]>,
    /// Bytes handed out, headers included. See `realloc` for the
    /// accounting anomaly.
    used_bytes: usize,
    /// Growth events since construction or the last `reset`.
    expansions: u32,
    /// Current allocation generation; bumped by each `release`.
    generation: u32,
    config: ArenaConfig,
}

impl OnceArena {
    /// Create an arena with block 0 allocated eagerly.
    ///
    /// Fails if the configuration is invalid or the host refuses the
    /// initial block.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        if config.block_size <= HEADER_SIZE {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "block_size must exceed the {HEADER_SIZE}-byte header (got {})",
                    config.block_size
                ),
            });
        }
        let mut blocks = SmallVec::new();
        blocks.push(Block::new(config.block_size)?);
        Ok(Self {
            blocks,
            used_bytes: 0,
            expansions: 0,
            generation: 0,
            config,
        })
    }

    /// Release everything, then restore the fresh single-block state.
    ///
    /// Afterwards the arena is indistinguishable from a newly
    /// constructed one: block 0 at full capacity, counters zeroed,
    /// growth budget restored.
    pub fn reset(&mut self) -> Result<(), ArenaError> {
        Allocator::release(self);
        self.blocks.push(Block::new(self.config.block_size)?);
        self.expansions = 0;
        Ok(())
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Growth events since construction or the last `reset`.
    pub fn expansions(&self) -> u32 {
        self.expansions
    }

    /// The current allocation generation.
    ///
    /// Every `release` (and therefore every `reset`) retires the
    /// generation and increments this counter. Callers that record the
    /// generation a handle was issued under can detect stale handles
    /// before resolving them.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of backing blocks currently held.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total stated capacity across all blocks, in bytes.
    pub fn total_bytes(&self) -> usize {
        self.blocks.iter().map(Block::capacity).sum()
    }

    /// Bytes still allocatable — the current block's tail only.
    ///
    /// Stranded tails of earlier blocks are holes, not free space.
    pub fn free_bytes(&self) -> usize {
        self.blocks.last().map_or(0, Block::remaining)
    }

    /// Append a block sized to the current total, doubling the arena.
    fn expand(&mut self) -> Result<(), ArenaError> {
        if self.expansions >= self.config.max_expand {
            return Err(ArenaError::ExpandLimit {
                expansions: self.expansions,
            });
        }
        let capacity = self.total_bytes();
        let block = Block::new(capacity)?;
        self.blocks.push(block);
        self.expansions += 1;
        Ok(())
    }

    /// Read the length header preceding `handle`'s payload.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not address a live allocation of this
    /// arena.
    fn payload_len(&self, handle: AllocHandle) -> usize {
        let block = &self.blocks[handle.block() as usize];
        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(block.slice(handle.offset() - HEADER_SIZE, HEADER_SIZE));
        u32::from_le_bytes(raw) as usize
    }
}

impl Allocator for OnceArena {
    fn kind(&self) -> AllocKind {
        AllocKind::Once
    }

    /// Bump-allocate `size` bytes plus the length header.
    ///
    /// Returns `None` if `size + HEADER_SIZE` exceeds the per-block
    /// ceiling (no growth is attempted — the ceiling is permanent), if
    /// growth is needed but fails, or if the arena has been released.
    ///
    /// Growing mid-block strands the remainder of the previous block as
    /// a permanent hole. That is the accepted cost of append-only
    /// allocation, not a bug.
    fn alloc(&mut self, size: u32) -> Option<AllocHandle> {
        let needed = size as usize + HEADER_SIZE;
        if needed > self.config.block_size {
            return None;
        }

        let current = self.blocks.last()?;
        if needed > current.remaining() {
            if let Err(err) = self.expand() {
                eprintln!(
                    "karst-arena: expand to block {} ({} bytes) failed: {err}",
                    self.blocks.len(),
                    self.total_bytes(),
                );
                return None;
            }
        }

        let block_index = self.blocks.len() - 1;
        let block = &mut self.blocks[block_index];
        // needed <= block_size <= any fresh block's capacity.
        let (start, region) = block
            .alloc(needed)
            .expect("a fitting or freshly grown block serves the request");
        region[..HEADER_SIZE].copy_from_slice(&size.to_le_bytes());
        self.used_bytes += needed;
        Some(AllocHandle::new(block_index as u32, start + HEADER_SIZE))
    }

    /// Allocate `size` fresh bytes and copy the source payload over.
    ///
    /// Returns `None` without touching the source when `src` is `None`
    /// or the new allocation fails; the source stays valid either way —
    /// this arena never reclaims it.
    ///
    /// Accounting anomaly, reproduced deliberately: `used_bytes` is
    /// decremented by the source allocation's header-inclusive size even
    /// though its bytes remain physically occupied. Diagnostic consumers
    /// see the stranded source as hole rather than used space. Redesigning
    /// the counter would silently change the reported numbers, so the
    /// original behavior is kept.
    fn realloc(&mut self, src: Option<AllocHandle>, size: u32) -> Option<AllocHandle> {
        let src = src?;
        let dest = self.alloc(size)?;

        let old_len = self.payload_len(src);
        let copy_len = old_len.min(size as usize);
        let src_index = src.block() as usize;
        let dest_index = dest.block() as usize;
        if src_index == dest_index {
            let block = &mut self.blocks[src_index];
            block.copy_within(src.offset(), dest.offset(), copy_len);
        } else {
            // The destination is always the newest block, so the source
            // sits strictly before it in the list.
            let (head, tail) = self.blocks.split_at_mut(dest_index);
            let from = head[src_index].slice(src.offset(), copy_len);
            let to = tail[0].slice_mut(dest.offset(), copy_len);
            to.copy_from_slice(from);
        }

        self.used_bytes = self.used_bytes.saturating_sub(old_len + HEADER_SIZE);
        Some(dest)
    }

    /// No-op: individual reclamation is unsupported by design.
    fn free(&mut self, handle: AllocHandle) {
        let _ = handle;
    }

    /// Retire the current generation: return every block to the host
    /// and invalidate all handles issued since the last retirement.
    ///
    /// The arena stays empty — `alloc` fails — until [`OnceArena::reset`].
    fn release(&mut self) {
        self.blocks.clear();
        self.used_bytes = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    fn bytes(&self, handle: AllocHandle) -> &[u8] {
        let len = self.payload_len(handle);
        self.blocks[handle.block() as usize].slice(handle.offset(), len)
    }

    fn bytes_mut(&mut self, handle: AllocHandle) -> &mut [u8] {
        let len = self.payload_len(handle);
        self.blocks[handle.block() as usize].slice_mut(handle.offset(), len)
    }

    fn report(&self) -> AllocReport {
        let total = self.total_bytes();
        let free = self.free_bytes();
        AllocReport {
            total_bytes: total,
            used_bytes: self.used_bytes,
            free_bytes: free,
            hole_bytes: total.saturating_sub(self.used_bytes + free),
            block_count: self.blocks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(block_size: usize) -> OnceArena {
        OnceArena::new(ArenaConfig::with_block_size(block_size)).unwrap()
    }

    #[test]
    fn fresh_arena_serves_any_fitting_request() {
        let mut a = arena(1024);
        let h = a.alloc(1020).unwrap(); // needed == block_size exactly
        assert_eq!(a.bytes(h).len(), 1020);
        assert_eq!(a.free_bytes(), 0);
        assert_eq!(a.block_count(), 1);
    }

    #[test]
    fn oversized_request_fails_without_attempting_growth() {
        let mut a = arena(1024);
        // 1021 + 4 = 1025 > 1024: fails immediately, no growth.
        assert!(a.alloc(1021).is_none());
        assert_eq!(a.block_count(), 1);
        assert_eq!(a.expansions(), 0);
        // Still fails after the arena has grown: the ceiling is permanent.
        a.alloc(1020).unwrap();
        a.alloc(1).unwrap();
        assert_eq!(a.block_count(), 2);
        assert!(a.alloc(1021).is_none());
    }

    #[test]
    fn payloads_are_zeroed_and_sized_by_header() {
        let mut a = arena(1024);
        let h = a.alloc(37).unwrap();
        assert_eq!(a.bytes(h).len(), 37);
        assert!(a.bytes(h).iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_size_allocation_is_valid() {
        let mut a = arena(1024);
        let h = a.alloc(0).unwrap();
        assert!(a.bytes(h).is_empty());
        assert_eq!(a.report().used_bytes, HEADER_SIZE);
    }

    #[test]
    fn successive_allocations_do_not_overlap() {
        let mut a = arena(1024);
        let h1 = a.alloc(10).unwrap();
        let h2 = a.alloc(20).unwrap();
        assert_eq!(h1.block(), h2.block());
        assert!(h1.offset() + 10 + HEADER_SIZE <= h2.offset());
        a.bytes_mut(h1).fill(0xaa);
        a.bytes_mut(h2).fill(0xbb);
        assert!(a.bytes(h1).iter().all(|&b| b == 0xaa));
        assert!(a.bytes(h2).iter().all(|&b| b == 0xbb));
    }

    #[test]
    fn growth_doubles_total_capacity_and_strands_a_hole() {
        // The worked scenario: 1024-byte blocks, 4-byte header.
        let mut a = arena(1024);
        a.alloc(1).unwrap(); // consumes 5, leaving 1019
        assert_eq!(a.free_bytes(), 1019);

        // 1020 + 4 = 1024 > 1019 remaining: grows, then fits exactly.
        let h = a.alloc(1020).unwrap();
        assert_eq!(h.block(), 1);
        assert_eq!(a.block_count(), 2);
        assert_eq!(a.total_bytes(), 2048);
        assert_eq!(a.expansions(), 1);

        let report = a.report();
        assert_eq!(report.used_bytes, 5 + 1024);
        assert_eq!(report.free_bytes, 0);
        assert_eq!(report.hole_bytes, 1019); // block 0's tail, stranded for good
    }

    #[test]
    fn expansion_follows_the_doubling_schedule() {
        let mut a = arena(16);
        let mut expected_total = 16;
        for expected in 1..=4u32 {
            // Exhaust the current block; the next request forces growth.
            while a.free_bytes() >= 16 {
                a.alloc(12).unwrap();
            }
            a.alloc(12).unwrap();
            expected_total *= 2;
            assert_eq!(a.expansions(), expected);
            assert_eq!(a.total_bytes(), expected_total);
            assert_eq!(a.block_count(), expected as usize + 1);
        }
    }

    #[test]
    fn growth_ceiling_fails_further_expansion() {
        let mut a = OnceArena::new(ArenaConfig {
            block_size: 16,
            max_expand: 1,
        })
        .unwrap();
        a.alloc(12).unwrap(); // fills block 0
        a.alloc(4).unwrap(); // grows to block 1 (16 bytes), uses 8
        assert_eq!(a.expansions(), 1);

        // Needs growth, but the ceiling is reached: fails even though the
        // request alone would fit a hypothetical new block.
        assert!(a.alloc(12).is_none());
        assert_eq!(a.block_count(), 2);

        // Requests that fit the current block's tail still succeed.
        let h = a.alloc(4).unwrap();
        assert_eq!(a.bytes(h).len(), 4);
    }

    #[test]
    fn realloc_of_none_fails() {
        let mut a = arena(1024);
        assert!(a.realloc(None, 8).is_none());
        assert_eq!(a.report().used_bytes, 0);
    }

    #[test]
    fn realloc_copies_the_payload_and_keeps_the_source() {
        let mut a = arena(1024);
        let src = a.alloc(4).unwrap();
        a.bytes_mut(src).copy_from_slice(&[1, 2, 3, 4]);

        let dest = a.realloc(Some(src), 8).unwrap();
        assert_ne!(src, dest);
        assert_eq!(&a.bytes(dest)[..4], &[1, 2, 3, 4]);
        assert_eq!(&a.bytes(dest)[4..], &[0, 0, 0, 0]);
        // The source is never reclaimed; its bytes are still readable.
        assert_eq!(a.bytes(src), &[1, 2, 3, 4]);
    }

    #[test]
    fn realloc_shrink_copies_the_prefix() {
        let mut a = arena(1024);
        let src = a.alloc(4).unwrap();
        a.bytes_mut(src).copy_from_slice(&[9, 8, 7, 6]);
        let dest = a.realloc(Some(src), 2).unwrap();
        assert_eq!(a.bytes(dest), &[9, 8]);
    }

    #[test]
    fn realloc_across_blocks_copies_the_payload() {
        let mut a = arena(16);
        let src = a.alloc(8).unwrap(); // block 0: 12 of 16 used
        a.bytes_mut(src).copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let dest = a.realloc(Some(src), 8).unwrap(); // must grow
        assert_ne!(src.block(), dest.block());
        assert_eq!(a.bytes(dest), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn failed_realloc_leaves_the_source_untouched() {
        let mut a = arena(64);
        let src = a.alloc(8).unwrap();
        a.bytes_mut(src).fill(0x5a);
        let before = a.report();

        // 100 + 4 > 64: the fresh alloc fails, so realloc fails.
        assert!(a.realloc(Some(src), 100).is_none());
        assert!(a.bytes(src).iter().all(|&b| b == 0x5a));
        assert_eq!(a.report(), before);
    }

    #[test]
    fn realloc_decrements_used_bytes_for_bytes_still_occupied() {
        // The documented accounting anomaly: the source's bytes stay in
        // the block but leave the used counter, surfacing as hole.
        let mut a = arena(1024);
        let src = a.alloc(8).unwrap();
        assert_eq!(a.report().used_bytes, 12);

        a.realloc(Some(src), 8).unwrap();
        let report = a.report();
        assert_eq!(report.used_bytes, 12); // 12 + 12 - 12
        assert_eq!(report.free_bytes, 1024 - 24); // 24 bytes physically gone
        assert_eq!(report.hole_bytes, 12); // the stranded source
    }

    #[test]
    fn free_is_a_noop() {
        let mut a = arena(1024);
        let h = a.alloc(4).unwrap();
        a.bytes_mut(h).fill(1);
        a.free(h);
        assert_eq!(a.bytes(h), &[1, 1, 1, 1]);
        assert_eq!(a.report().used_bytes, 8);
    }

    #[test]
    fn release_empties_the_arena() {
        let mut a = arena(1024);
        a.alloc(100).unwrap();
        assert_eq!(a.generation(), 0);
        a.release();
        assert_eq!(a.block_count(), 0);
        assert_eq!(a.generation(), 1);
        assert!(a.alloc(1).is_none());
        assert!(a.realloc(None, 1).is_none());
        assert_eq!(a.report(), AllocReport::default());
    }

    #[test]
    fn reset_restores_the_fresh_state() {
        let mut a = arena(1024);
        a.alloc(1).unwrap();
        a.alloc(1020).unwrap(); // forces growth
        assert_eq!(a.block_count(), 2);

        a.reset().unwrap();
        assert_eq!(a.expansions(), 0);
        let report = a.report();
        assert_eq!(report.total_bytes, 1024);
        assert_eq!(report.used_bytes, 0);
        assert_eq!(report.free_bytes, 1024);
        assert_eq!(report.hole_bytes, 0);
        assert_eq!(report.block_count, 1);

        let h = a.alloc(16).unwrap();
        assert_eq!(h.block(), 0);
        assert_eq!(h.offset(), HEADER_SIZE);
    }

    #[test]
    fn new_rejects_block_size_within_the_header() {
        for block_size in [0, 1, HEADER_SIZE] {
            let err = OnceArena::new(ArenaConfig::with_block_size(block_size))
                .err()
                .unwrap();
            assert!(matches!(err, ArenaError::InvalidConfig { .. }));
        }
        assert!(OnceArena::new(ArenaConfig::with_block_size(HEADER_SIZE + 1)).is_ok());
    }

    #[test]
    fn kind_is_once() {
        let a = arena(64);
        assert_eq!(a.kind(), AllocKind::Once);
    }

    #[test]
    fn report_display_carries_the_scenario_numbers() {
        let mut a = arena(1024);
        a.alloc(1).unwrap();
        a.alloc(1020).unwrap();
        let text = a.report().to_string();
        assert!(text.contains("total_bytes: 2048"));
        assert!(text.contains("hole_bytes: 1019"));
        assert!(text.contains("block_count: 2"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Header-inclusive extent of a handle within its block.
        fn extent(handle: AllocHandle, size: u32) -> (u32, usize, usize) {
            let start = handle.offset() - HEADER_SIZE;
            (handle.block(), start, handle.offset() + size as usize)
        }

        proptest! {
            #[test]
            fn issued_ranges_never_overlap(
                sizes in prop::collection::vec(0u32..64, 1..40),
            ) {
                let mut a = arena(256);
                let mut issued = Vec::new();
                for size in sizes {
                    if let Some(h) = a.alloc(size) {
                        issued.push(extent(h, size));
                    }
                }
                for (i, &(block_a, start_a, end_a)) in issued.iter().enumerate() {
                    for &(block_b, start_b, end_b) in &issued[i + 1..] {
                        if block_a == block_b {
                            prop_assert!(end_a <= start_b || end_b <= start_a);
                        }
                    }
                }
            }

            #[test]
            fn accounting_identity_holds_without_realloc(
                sizes in prop::collection::vec(0u32..64, 0..60),
            ) {
                let mut a = arena(256);
                for size in sizes {
                    let _ = a.alloc(size);
                }
                let report = a.report();
                prop_assert_eq!(
                    report.used_bytes + report.free_bytes + report.hole_bytes,
                    report.total_bytes
                );
            }

            #[test]
            fn header_recovers_the_requested_size(size in 0u32..=1020) {
                let mut a = arena(1024);
                let h = a.alloc(size).unwrap();
                prop_assert_eq!(a.bytes(h).len(), size as usize);
            }
        }
    }
}
