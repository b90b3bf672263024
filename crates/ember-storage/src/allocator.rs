//! Slot allocation in front of the particle containers.
//!
//! [`BlockAllocator`] borrows the containers exclusively, so every
//! free-block search and block creation is serialized by the borrow. It
//! fills non-full blocks before creating new ones and hands back the
//! reserved `(block, range)` parts.

use std::ops::Range;

use indexmap::IndexMap;

use ember_core::ParticleTypeId;

use crate::container::ParticlesContainer;
use crate::error::StorageError;

/// A contiguous run of freshly reserved slots in one block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockRange {
    /// Index of the block within its container.
    pub block: usize,
    /// Reserved slot range within the block.
    pub range: Range<usize>,
}

impl BlockRange {
    /// Number of reserved slots.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether the range is empty.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Reserves particle slots in the containers of a particle state.
pub struct BlockAllocator<'a> {
    containers: &'a mut IndexMap<ParticleTypeId, ParticlesContainer>,
    allocated: usize,
}

impl<'a> BlockAllocator<'a> {
    pub(crate) fn new(containers: &'a mut IndexMap<ParticleTypeId, ParticlesContainer>) -> Self {
        Self {
            containers,
            allocated: 0,
        }
    }

    /// Reserve `amount` slots for `particle_type`.
    ///
    /// Reserved slots count as live immediately and start at their
    /// attribute defaults. The returned parts cover exactly `amount` slots,
    /// in allocation order.
    pub fn allocate(
        &mut self,
        particle_type: ParticleTypeId,
        amount: usize,
    ) -> Result<Vec<BlockRange>, StorageError> {
        let container = self
            .containers
            .get_mut(&particle_type)
            .ok_or(StorageError::UnknownParticleType { particle_type })?;

        let mut parts = Vec::new();
        let mut remaining = amount;

        for (index, block) in container.active_blocks_mut().iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            let take = block.inactive_amount().min(remaining);
            if take > 0 {
                parts.push(BlockRange {
                    block: index,
                    range: block.reserve(take),
                });
                remaining -= take;
            }
        }

        while remaining > 0 {
            let index = container.new_block();
            let block = container.block_mut(index);
            let take = block.capacity().min(remaining);
            parts.push(BlockRange {
                block: index,
                range: block.reserve(take),
            });
            remaining -= take;
        }

        log::trace!(
            "allocated {amount} particles of type {particle_type} across {} blocks",
            parts.len()
        );
        self.allocated += amount;
        Ok(parts)
    }

    /// Container for `particle_type`.
    pub fn container(&self, particle_type: ParticleTypeId) -> Option<&ParticlesContainer> {
        self.containers.get(&particle_type)
    }

    /// Mutable container for `particle_type`.
    pub fn container_mut(&mut self, particle_type: ParticleTypeId) -> Option<&mut ParticlesContainer> {
        self.containers.get_mut(&particle_type)
    }

    /// Total slots reserved through this allocator.
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::info::AttributesDeclaration;
    use crate::state::ParticlesState;
    use ember_core::KILL_STATE;

    const TYPE: ParticleTypeId = ParticleTypeId(0);

    fn state(block_size: usize) -> ParticlesState {
        let mut state = ParticlesState::new(StorageConfig::new(block_size)).unwrap();
        let mut decl = AttributesDeclaration::new();
        decl.add_byte(KILL_STATE, 0);
        state
            .ensure_container(TYPE)
            .update_attributes(decl.build().unwrap());
        state
    }

    #[test]
    fn allocation_spans_new_blocks() {
        let mut state = state(4);
        let parts = state.allocator().allocate(TYPE, 10).unwrap();
        assert_eq!(
            parts,
            vec![
                BlockRange { block: 0, range: 0..4 },
                BlockRange { block: 1, range: 0..4 },
                BlockRange { block: 2, range: 0..2 },
            ]
        );
        assert_eq!(state.particle_count(), 10);
    }

    #[test]
    fn allocation_reuses_free_capacity() {
        let mut state = state(4);
        state.allocator().allocate(TYPE, 3).unwrap();
        let parts = state.allocator().allocate(TYPE, 3).unwrap();
        assert_eq!(
            parts,
            vec![
                BlockRange { block: 0, range: 3..4 },
                BlockRange { block: 1, range: 0..2 },
            ]
        );
    }

    #[test]
    fn allocated_slots_are_reset() {
        let mut state = state(4);
        state.allocator().allocate(TYPE, 2).unwrap();
        {
            let block = state.container_mut(TYPE).unwrap().block_mut(0);
            block.attributes_mut().get_byte_mut(KILL_STATE).unwrap().fill(1);
            block.set_active_amount(0);
        }
        state.allocator().allocate(TYPE, 2).unwrap();
        let block = state.container(TYPE).unwrap().block(0);
        assert_eq!(block.slice_active().get_byte(KILL_STATE).unwrap(), &[0, 0]);
    }

    #[test]
    fn zero_allocation_returns_no_parts() {
        let mut state = state(4);
        let mut allocator = state.allocator();
        assert!(allocator.allocate(TYPE, 0).unwrap().is_empty());
        assert_eq!(allocator.allocated(), 0);
    }

    #[test]
    fn unknown_type_rejected() {
        let mut state = state(4);
        let result = state.allocator().allocate(ParticleTypeId(9), 1);
        assert!(matches!(
            result,
            Err(StorageError::UnknownParticleType { .. })
        ));
    }
}
