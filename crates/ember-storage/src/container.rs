//! Per-type block ownership, schema migration, and compaction.

use std::sync::Arc;

use ember_core::AttributeError;

use crate::block::ParticlesBlock;
use crate::info::AttributesInfo;

/// Owns every block of one particle type.
///
/// Blocks are stored by value; a block index is only stable until the next
/// call that releases blocks ([`release_block`](Self::release_block),
/// [`release_empty_blocks`](Self::release_empty_blocks), [`compress`](Self::compress)).
#[derive(Debug)]
pub struct ParticlesContainer {
    info: Arc<AttributesInfo>,
    block_size: usize,
    blocks: Vec<ParticlesBlock>,
}

impl ParticlesContainer {
    /// Create a container with no blocks.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is zero.
    pub fn new(info: AttributesInfo, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be at least 1");
        Self {
            info: Arc::new(info),
            block_size,
            blocks: Vec::new(),
        }
    }

    /// Current schema.
    pub fn attributes_info(&self) -> &Arc<AttributesInfo> {
        &self.info
    }

    /// Capacity of every block this container creates.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks currently held.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Every block currently held.
    pub fn active_blocks(&self) -> &[ParticlesBlock] {
        &self.blocks
    }

    /// Every block currently held, mutably.
    pub fn active_blocks_mut(&mut self) -> &mut [ParticlesBlock] {
        &mut self.blocks
    }

    /// Block at `index`.
    pub fn block(&self, index: usize) -> &ParticlesBlock {
        &self.blocks[index]
    }

    /// Block at `index`, mutably.
    pub fn block_mut(&mut self, index: usize) -> &mut ParticlesBlock {
        &mut self.blocks[index]
    }

    /// Append a fresh, empty block and return its index.
    pub fn new_block(&mut self) -> usize {
        self.blocks
            .push(ParticlesBlock::new(self.info.clone(), self.block_size));
        self.blocks.len() - 1
    }

    /// Remove the block at `index`, returning it.
    ///
    /// The last block takes over `index`.
    pub fn release_block(&mut self, index: usize) -> ParticlesBlock {
        self.blocks.swap_remove(index)
    }

    /// Drop every block with no live particles. Returns how many were released.
    pub fn release_empty_blocks(&mut self) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|block| !block.is_empty());
        before - self.blocks.len()
    }

    /// Total live particles across all blocks.
    pub fn count_active(&self) -> usize {
        self.blocks.iter().map(|b| b.active_amount()).sum()
    }

    /// Largest live count of any block.
    pub fn max_active_amount(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.active_amount())
            .max()
            .unwrap_or(0)
    }

    /// Switch to a new schema, migrating every existing block.
    ///
    /// A schema with the same layout only swaps the shared `Arc`.
    pub fn update_attributes(&mut self, info: AttributesInfo) {
        if *self.info == info {
            return;
        }
        let info = Arc::new(info);
        for block in &mut self.blocks {
            block.migrate(info.clone());
        }
        self.info = info;
    }

    /// Swap-remove killed particles in every block. Returns the number removed.
    pub fn delete_killed(&mut self) -> Result<usize, AttributeError> {
        let mut removed = 0;
        for block in &mut self.blocks {
            removed += block.delete_killed()?;
        }
        Ok(removed)
    }

    /// Consolidate particles into as few blocks as possible, then release
    /// the blocks left empty. Returns the number of released blocks.
    ///
    /// Particles move from the emptiest blocks into the fullest blocks that
    /// still have room. Particle count and attribute values are preserved;
    /// only `(block, slot)` addresses change.
    pub fn compress(&mut self) -> usize {
        if self.blocks.len() > 1 {
            let mut order: Vec<usize> = (0..self.blocks.len()).collect();
            order.sort_by(|&a, &b| {
                self.blocks[b]
                    .active_amount()
                    .cmp(&self.blocks[a].active_amount())
            });

            let mut fill = 0;
            let mut drain = order.len() - 1;
            while fill < drain {
                let (dst_index, src_index) = (order[fill], order[drain]);
                if self.blocks[dst_index].is_full() {
                    fill += 1;
                    continue;
                }
                if self.blocks[src_index].is_empty() {
                    drain -= 1;
                    continue;
                }
                let amount = self.blocks[dst_index]
                    .inactive_amount()
                    .min(self.blocks[src_index].active_amount());
                let (src, dst) = pair_mut(&mut self.blocks, src_index, dst_index);
                ParticlesBlock::move_tail(src, dst, amount);
            }
        }
        self.release_empty_blocks()
    }
}

/// Two distinct mutable elements of one slice.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "pair_mut requires distinct indices");
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::AttributesDeclaration;
    use ember_core::{Vec3, KILL_STATE, POSITION};

    fn info() -> AttributesInfo {
        let mut decl = AttributesDeclaration::new();
        decl.add_byte(KILL_STATE, 0)
            .add_float("Id", 0.0)
            .add_float3(POSITION, Vec3::ZERO);
        decl.build().unwrap()
    }

    /// Build a container whose blocks hold the given particle counts,
    /// with unique ids across all particles.
    fn container_with(counts: &[usize], block_size: usize) -> ParticlesContainer {
        let mut container = ParticlesContainer::new(info(), block_size);
        let mut next_id = 0.0;
        for &count in counts {
            let index = container.new_block();
            let block = container.block_mut(index);
            let range = block.reserve(count);
            let mut attrs = block.slice_mut(range);
            for id in attrs.get_float_mut("Id").unwrap() {
                *id = next_id;
                next_id += 1.0;
            }
        }
        container
    }

    fn sorted_ids(container: &ParticlesContainer) -> Vec<f32> {
        let mut ids: Vec<f32> = container
            .active_blocks()
            .iter()
            .flat_map(|b| b.slice_active().get_float("Id").unwrap().to_vec())
            .collect();
        ids.sort_by(|a, b| a.partial_cmp(b).unwrap());
        ids
    }

    #[test]
    fn new_block_uses_container_block_size() {
        let mut container = ParticlesContainer::new(info(), 16);
        let index = container.new_block();
        assert_eq!(container.block(index).capacity(), 16);
        assert_eq!(container.block_count(), 1);
    }

    #[test]
    fn compress_merges_sparse_blocks() {
        let mut container = container_with(&[3, 2, 4, 1], 10);
        let released = container.compress();
        assert_eq!(released, 3);
        assert_eq!(container.block_count(), 1);
        assert_eq!(container.count_active(), 10);
        assert_eq!(sorted_ids(&container), (0..10).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn compress_fills_fullest_blocks_first() {
        let mut container = container_with(&[2, 9, 5], 10);
        container.compress();
        let mut amounts: Vec<usize> = container
            .active_blocks()
            .iter()
            .map(|b| b.active_amount())
            .collect();
        amounts.sort();
        assert_eq!(amounts, vec![6, 10]);
        assert_eq!(container.count_active(), 16);
    }

    #[test]
    fn compress_releases_empty_single_block() {
        let mut container = container_with(&[0], 10);
        assert_eq!(container.compress(), 1);
        assert_eq!(container.block_count(), 0);
    }

    #[test]
    fn update_attributes_migrates_blocks() {
        let mut container = container_with(&[2], 4);
        let mut decl = AttributesDeclaration::new();
        decl.add_byte(KILL_STATE, 0)
            .add_float("Id", 0.0)
            .add_float("Age", 0.0)
            .add_float3(POSITION, Vec3::ZERO);
        container.update_attributes(decl.build().unwrap());
        let block = container.block(0);
        assert!(Arc::ptr_eq(block.info(), container.attributes_info()));
        assert_eq!(block.slice_active().get_float("Id").unwrap(), &[0.0, 1.0]);
        assert_eq!(block.slice_active().get_float("Age").unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn delete_killed_across_blocks() {
        let mut container = container_with(&[3, 3], 4);
        for block in container.active_blocks_mut() {
            block.slice_active_mut().get_byte_mut(KILL_STATE).unwrap()[0] = 1;
        }
        assert_eq!(container.delete_killed().unwrap(), 2);
        assert_eq!(container.count_active(), 4);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn compress_preserves_particles(
                counts in proptest::collection::vec(0usize..=8, 1..12),
            ) {
                let mut container = container_with(&counts, 8);
                let total: usize = counts.iter().sum();
                let before = sorted_ids(&container);

                container.compress();

                prop_assert_eq!(container.count_active(), total);
                prop_assert_eq!(sorted_ids(&container), before);
                prop_assert!(container.active_blocks().iter().all(|b| !b.is_empty()));
                // At most one block may remain partially filled.
                let partial = container
                    .active_blocks()
                    .iter()
                    .filter(|b| !b.is_full())
                    .count();
                prop_assert!(partial <= 1);
            }

            #[test]
            fn delete_then_compress_keeps_survivors(
                kills in proptest::collection::vec(any::<bool>(), 0..40),
            ) {
                let mut container = ParticlesContainer::new(info(), 6);
                let mut remaining = kills.len();
                let mut next = 0usize;
                while remaining > 0 {
                    let index = container.new_block();
                    let block = container.block_mut(index);
                    let amount = remaining.min(block.capacity());
                    let range = block.reserve(amount);
                    let mut attrs = block.slice_mut(range);
                    for i in 0..amount {
                        attrs.get_float_mut("Id").unwrap()[i] = (next + i) as f32;
                        attrs.get_byte_mut(KILL_STATE).unwrap()[i] = kills[next + i] as u8;
                    }
                    next += amount;
                    remaining -= amount;
                }

                let survivors = kills.iter().filter(|k| !**k).count();
                container.delete_killed().unwrap();
                prop_assert_eq!(container.count_active(), survivors);
                container.compress();
                prop_assert_eq!(container.count_active(), survivors);

                let expected: Vec<f32> = kills
                    .iter()
                    .enumerate()
                    .filter(|(_, k)| !**k)
                    .map(|(i, _)| i as f32)
                    .collect();
                prop_assert_eq!(sorted_ids(&container), expected);
            }
        }
    }
}
