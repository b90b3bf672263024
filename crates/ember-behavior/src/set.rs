//! [`ParticleSet`]: a block plus the slot indices a behavior operates on.

use std::ops::Range;

use ember_storage::{AttributeArrays, AttributeArraysMut, ParticlesBlock};

/// Slot indices of a particle set, in set order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParticleIndices<'a> {
    /// A contiguous slot range, e.g. all active particles of a block.
    Range(Range<usize>),
    /// An explicit list of slots, e.g. the particles that hit an event.
    List(&'a [usize]),
}

impl ParticleIndices<'_> {
    /// Number of particles.
    pub fn len(&self) -> usize {
        match self {
            Self::Range(range) => range.len(),
            Self::List(list) => list.len(),
        }
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot of the `i`-th particle.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn get(&self, i: usize) -> usize {
        match self {
            Self::Range(range) => {
                assert!(i < range.len(), "particle {i} out of range {range:?}");
                range.start + i
            }
            Self::List(list) => list[i],
        }
    }

    /// Iterate over the slots in set order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Largest slot in the set, if any.
    pub fn max_slot(&self) -> Option<usize> {
        match self {
            Self::Range(range) if !range.is_empty() => Some(range.end - 1),
            Self::Range(_) => None,
            Self::List(list) => list.iter().copied().max(),
        }
    }
}

/// A transient view over selected particles of one block.
///
/// Attribute columns returned by [`attributes`](Self::attributes) cover the
/// whole block; index them with [`particle_index`](Self::particle_index)
/// (or iterate [`indices`](Self::indices)) to reach the particles in the set.
pub struct ParticleSet<'a> {
    block: &'a mut ParticlesBlock,
    indices: ParticleIndices<'a>,
}

impl<'a> ParticleSet<'a> {
    /// Create a set over `indices` of `block`.
    ///
    /// # Panics
    ///
    /// Panics if any index lies past the block capacity.
    pub fn new(block: &'a mut ParticlesBlock, indices: ParticleIndices<'a>) -> Self {
        if let Some(max) = indices.max_slot() {
            assert!(
                max < block.capacity(),
                "particle slot {max} exceeds block capacity {}",
                block.capacity()
            );
        }
        Self { block, indices }
    }

    /// A set over a contiguous slot range.
    pub fn from_range(block: &'a mut ParticlesBlock, range: Range<usize>) -> Self {
        Self::new(block, ParticleIndices::Range(range))
    }

    /// A set over an explicit slot list.
    pub fn from_list(block: &'a mut ParticlesBlock, list: &'a [usize]) -> Self {
        Self::new(block, ParticleIndices::List(list))
    }

    /// A set over every active particle of `block`.
    pub fn active(block: &'a mut ParticlesBlock) -> Self {
        let range = 0..block.active_amount();
        Self::from_range(block, range)
    }

    /// Number of particles in the set.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The slot indices.
    pub fn indices(&self) -> &ParticleIndices<'a> {
        &self.indices
    }

    /// Block slot of the `i`-th particle in the set.
    pub fn particle_index(&self, i: usize) -> usize {
        self.indices.get(i)
    }

    /// The underlying block.
    pub fn block(&self) -> &ParticlesBlock {
        self.block
    }

    /// The underlying block, mutably.
    pub fn block_mut(&mut self) -> &mut ParticlesBlock {
        &mut *self.block
    }

    /// Read-only columns of the whole block.
    pub fn attributes(&self) -> AttributeArrays<'_> {
        self.block.attributes()
    }

    /// Mutable columns of the whole block.
    pub fn attributes_mut(&mut self) -> AttributeArraysMut<'_> {
        self.block.attributes_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_test_utils::fixtures;

    #[test]
    fn range_indices_are_offset() {
        let indices = ParticleIndices::Range(3..6);
        assert_eq!(indices.len(), 3);
        assert_eq!(indices.iter().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(indices.max_slot(), Some(5));
    }

    #[test]
    fn list_indices_keep_order() {
        let list = [7, 2, 9];
        let indices = ParticleIndices::List(&list);
        assert_eq!(indices.get(1), 2);
        assert_eq!(indices.max_slot(), Some(9));
    }

    #[test]
    fn empty_range_has_no_max() {
        assert_eq!(ParticleIndices::Range(4..4).max_slot(), None);
    }

    #[test]
    fn active_set_covers_live_slots() {
        let mut block = fixtures::block_with_particles(8, 5);
        let set = ParticleSet::active(&mut block);
        assert_eq!(set.len(), 5);
        assert_eq!(set.particle_index(4), 4);
    }

    #[test]
    #[should_panic(expected = "exceeds block capacity")]
    fn out_of_bounds_list_panics() {
        let mut block = fixtures::block_with_particles(4, 4);
        let list = [0, 4];
        ParticleSet::from_list(&mut block, &list);
    }
}
