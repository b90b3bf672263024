//! Fixed-capacity particle blocks.
//!
//! A [`ParticlesBlock`] owns one column per schema attribute, each sized to
//! the block capacity, plus the `active_amount` watermark. Slots
//! `[0, active_amount)` hold live particles; the rest are free.

use std::ops::Range;
use std::sync::Arc;

use ember_core::{AttributeError, AttributeType, KILL_STATE};

use crate::arrays::{AttributeArrays, AttributeArraysMut};
use crate::column::AttributeColumn;
use crate::info::AttributesInfo;

/// A fixed-size slice of columnar attribute storage for one particle type.
#[derive(Clone, Debug)]
pub struct ParticlesBlock {
    info: Arc<AttributesInfo>,
    columns: Vec<AttributeColumn>,
    capacity: usize,
    active_amount: usize,
}

impl ParticlesBlock {
    /// Create an empty block with `capacity` slots laid out per `info`.
    ///
    /// All slots start at their attribute defaults.
    pub fn new(info: Arc<AttributesInfo>, capacity: usize) -> Self {
        let columns = info
            .iter()
            .map(|(_, default)| AttributeColumn::filled(default, capacity))
            .collect();
        Self {
            info,
            columns,
            capacity,
            active_amount: 0,
        }
    }

    /// Schema this block is laid out with.
    pub fn info(&self) -> &Arc<AttributesInfo> {
        &self.info
    }

    /// Total slot count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live particles.
    pub fn active_amount(&self) -> usize {
        self.active_amount
    }

    /// Set the live watermark.
    ///
    /// # Panics
    ///
    /// Panics if `amount` exceeds the capacity.
    pub fn set_active_amount(&mut self, amount: usize) {
        assert!(
            amount <= self.capacity,
            "active amount {amount} exceeds block capacity {}",
            self.capacity
        );
        self.active_amount = amount;
    }

    /// Number of free slots.
    pub fn inactive_amount(&self) -> usize {
        self.capacity - self.active_amount
    }

    /// Whether every slot is live.
    pub fn is_full(&self) -> bool {
        self.active_amount == self.capacity
    }

    /// Whether no slot is live.
    pub fn is_empty(&self) -> bool {
        self.active_amount == 0
    }

    /// View over every slot, live or free.
    pub fn attributes(&self) -> AttributeArrays<'_> {
        self.slice(0..self.capacity)
    }

    /// Mutable view over every slot, live or free.
    pub fn attributes_mut(&mut self) -> AttributeArraysMut<'_> {
        self.slice_mut(0..self.capacity)
    }

    /// View over the live slots.
    pub fn slice_active(&self) -> AttributeArrays<'_> {
        self.slice(0..self.active_amount)
    }

    /// Mutable view over the live slots.
    pub fn slice_active_mut(&mut self) -> AttributeArraysMut<'_> {
        self.slice_mut(0..self.active_amount)
    }

    /// View over `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` extends past the capacity.
    pub fn slice(&self, range: Range<usize>) -> AttributeArrays<'_> {
        assert!(range.end <= self.capacity, "range {range:?} exceeds block capacity");
        AttributeArrays::new(&self.info, &self.columns, range)
    }

    /// Mutable view over `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` extends past the capacity.
    pub fn slice_mut(&mut self, range: Range<usize>) -> AttributeArraysMut<'_> {
        assert!(range.end <= self.capacity, "range {range:?} exceeds block capacity");
        AttributeArraysMut::new(&self.info, &mut self.columns, range)
    }

    /// Claim `amount` free slots, reset them to defaults, and return their range.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `amount` slots are free.
    pub fn reserve(&mut self, amount: usize) -> Range<usize> {
        assert!(
            amount <= self.inactive_amount(),
            "cannot reserve {amount} slots, only {} free",
            self.inactive_amount()
        );
        let range = self.active_amount..self.active_amount + amount;
        self.reset_range(range.clone());
        self.active_amount += amount;
        range
    }

    /// Overwrite `range` with attribute defaults.
    pub fn reset_range(&mut self, range: Range<usize>) {
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.fill_range(range.clone(), self.info.default_value(index));
        }
    }

    /// Copy every attribute of slot `from` into slot `to`.
    pub fn move_particle(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        for column in &mut self.columns {
            column.copy_within(from, to);
        }
    }

    /// Move the last `amount` live particles of `src` into the free slots of `dst`.
    ///
    /// Both blocks must share a column layout.
    ///
    /// # Panics
    ///
    /// Panics if the layouts differ, `src` holds fewer than `amount`
    /// particles, or `dst` has fewer than `amount` free slots.
    pub fn move_tail(src: &mut ParticlesBlock, dst: &mut ParticlesBlock, amount: usize) {
        assert!(
            Arc::ptr_eq(&src.info, &dst.info) || src.info.same_layout(&dst.info),
            "cannot move particles between blocks with different layouts"
        );
        assert!(amount <= src.active_amount, "source block holds too few particles");
        assert!(amount <= dst.inactive_amount(), "destination block has too few free slots");

        let src_start = src.active_amount - amount;
        let dst_start = dst.active_amount;
        for (dst_column, src_column) in dst.columns.iter_mut().zip(&src.columns) {
            for offset in 0..amount {
                dst_column.copy_from(dst_start + offset, src_column, src_start + offset);
            }
        }
        src.active_amount -= amount;
        dst.active_amount += amount;
    }

    /// Swap-remove every live particle whose kill state is non-zero.
    ///
    /// Single pass; order within the block is not preserved. Returns the
    /// number of removed particles.
    pub fn delete_killed(&mut self) -> Result<usize, AttributeError> {
        let kill_index = self.info.index_of(KILL_STATE, AttributeType::Byte)?;
        let before = self.active_amount;
        let mut index = 0;
        while index < self.active_amount {
            if self.kill_state_at(kill_index, index) != 0 {
                self.move_particle(self.active_amount - 1, index);
                self.active_amount -= 1;
            } else {
                index += 1;
            }
        }
        Ok(before - self.active_amount)
    }

    fn kill_state_at(&self, kill_index: usize, slot: usize) -> u8 {
        match &self.columns[kill_index] {
            AttributeColumn::Byte(data) => data[slot],
            _ => unreachable!("kill state column is resolved by type"),
        }
    }

    /// Relayout the block for `info`.
    ///
    /// Attributes present in both schemas with the same type keep their
    /// values for the live slots; new attributes start at their defaults.
    pub fn migrate(&mut self, info: Arc<AttributesInfo>) {
        if self.info.same_layout(&info) {
            self.info = info;
            return;
        }
        let mut columns: Vec<AttributeColumn> = info
            .iter()
            .map(|(_, default)| AttributeColumn::filled(default, self.capacity))
            .collect();
        for (new_index, (name, default)) in info.iter().enumerate() {
            if let Ok(old_index) = self.info.index_of(name, default.attribute_type()) {
                columns[new_index].copy_prefix_from(&self.columns[old_index], self.active_amount);
            }
        }
        self.columns = columns;
        self.info = info;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::AttributesDeclaration;
    use ember_core::{Vec3, POSITION};

    fn info() -> Arc<AttributesInfo> {
        let mut decl = AttributesDeclaration::new();
        decl.add_byte(KILL_STATE, 0)
            .add_float("Id", -1.0)
            .add_float3(POSITION, Vec3::ZERO);
        Arc::new(decl.build().unwrap())
    }

    fn block_with_ids(capacity: usize, count: usize) -> ParticlesBlock {
        let mut block = ParticlesBlock::new(info(), capacity);
        let range = block.reserve(count);
        let mut attrs = block.slice_mut(range);
        for (i, id) in attrs.get_float_mut("Id").unwrap().iter_mut().enumerate() {
            *id = i as f32;
        }
        block
    }

    #[test]
    fn new_block_is_empty_with_defaults() {
        let block = ParticlesBlock::new(info(), 8);
        assert!(block.is_empty());
        assert_eq!(block.inactive_amount(), 8);
        assert!(block.attributes().get_float("Id").unwrap().iter().all(|&v| v == -1.0));
    }

    #[test]
    fn reserve_raises_watermark_and_resets_slots() {
        let mut block = ParticlesBlock::new(info(), 4);
        block.attributes_mut().get_float_mut("Id").unwrap()[0] = 99.0;
        let range = block.reserve(3);
        assert_eq!(range, 0..3);
        assert_eq!(block.active_amount(), 3);
        assert_eq!(block.slice_active().get_float("Id").unwrap(), &[-1.0, -1.0, -1.0]);
    }

    #[test]
    #[should_panic(expected = "cannot reserve")]
    fn reserve_past_capacity_panics() {
        let mut block = ParticlesBlock::new(info(), 2);
        block.reserve(3);
    }

    #[test]
    fn delete_killed_swap_removes() {
        let mut block = block_with_ids(10, 10);
        {
            let mut attrs = block.slice_active_mut();
            let kill = attrs.get_byte_mut(KILL_STATE).unwrap();
            kill[1] = 1;
            kill[4] = 1;
            kill[9] = 1;
        }
        let removed = block.delete_killed().unwrap();
        assert_eq!(removed, 3);
        assert_eq!(block.active_amount(), 7);

        let mut ids: Vec<f32> = block.slice_active().get_float("Id").unwrap().to_vec();
        ids.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(ids, vec![0.0, 2.0, 3.0, 5.0, 6.0, 7.0, 8.0]);
        assert!(block.slice_active().get_byte(KILL_STATE).unwrap().iter().all(|&k| k == 0));
    }

    #[test]
    fn delete_killed_handles_all_killed() {
        let mut block = block_with_ids(5, 5);
        block.slice_active_mut().get_byte_mut(KILL_STATE).unwrap().fill(1);
        assert_eq!(block.delete_killed().unwrap(), 5);
        assert!(block.is_empty());
    }

    #[test]
    fn move_tail_transfers_particles() {
        let mut src = block_with_ids(4, 4);
        let mut dst = ParticlesBlock::new(src.info().clone(), 4);
        dst.reserve(1);
        ParticlesBlock::move_tail(&mut src, &mut dst, 2);
        assert_eq!(src.active_amount(), 2);
        assert_eq!(dst.active_amount(), 3);
        assert_eq!(dst.slice_active().get_float("Id").unwrap(), &[-1.0, 2.0, 3.0]);
    }

    #[test]
    fn migrate_keeps_shared_attributes() {
        let mut block = block_with_ids(4, 2);
        let mut decl = AttributesDeclaration::new();
        decl.add_byte(KILL_STATE, 0)
            .add_float("Id", -1.0)
            .add_float("Size", 0.5)
            .add_float3(POSITION, Vec3::ZERO);
        block.migrate(Arc::new(decl.build().unwrap()));

        let attrs = block.slice_active();
        assert_eq!(attrs.get_float("Id").unwrap(), &[0.0, 1.0]);
        assert_eq!(attrs.get_float("Size").unwrap(), &[0.5, 0.5]);
    }

    #[test]
    fn migrate_drops_removed_attributes() {
        let mut block = block_with_ids(4, 2);
        let mut decl = AttributesDeclaration::new();
        decl.add_byte(KILL_STATE, 0);
        block.migrate(Arc::new(decl.build().unwrap()));
        assert!(block.attributes().get_float("Id").is_err());
        assert_eq!(block.active_amount(), 2);
    }
}
