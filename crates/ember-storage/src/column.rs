//! Typed attribute columns backing a block.
//!
//! An [`AttributeColumn`] is one pre-allocated `Vec` sized to the block
//! capacity. Columns are never resized after creation; slots beyond the
//! block's active amount hold stale data until they are reset.

use std::ops::Range;

use ember_core::{AttributeType, AttributeValue, Vec3};

/// One attribute's storage for every slot of a block.
#[derive(Clone, Debug)]
pub(crate) enum AttributeColumn {
    Byte(Vec<u8>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Float3(Vec<Vec3>),
}

impl AttributeColumn {
    /// Allocate a column of `capacity` slots, each set to `value`.
    pub(crate) fn filled(value: AttributeValue, capacity: usize) -> Self {
        match value {
            AttributeValue::Byte(v) => Self::Byte(vec![v; capacity]),
            AttributeValue::Int(v) => Self::Int(vec![v; capacity]),
            AttributeValue::Float(v) => Self::Float(vec![v; capacity]),
            AttributeValue::Float3(v) => Self::Float3(vec![v; capacity]),
        }
    }

    pub(crate) fn attribute_type(&self) -> AttributeType {
        match self {
            Self::Byte(_) => AttributeType::Byte,
            Self::Int(_) => AttributeType::Int,
            Self::Float(_) => AttributeType::Float,
            Self::Float3(_) => AttributeType::Float3,
        }
    }

    /// Overwrite `range` with `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` has a different type than the column.
    pub(crate) fn fill_range(&mut self, range: Range<usize>, value: AttributeValue) {
        match (self, value) {
            (Self::Byte(data), AttributeValue::Byte(v)) => data[range].fill(v),
            (Self::Int(data), AttributeValue::Int(v)) => data[range].fill(v),
            (Self::Float(data), AttributeValue::Float(v)) => data[range].fill(v),
            (Self::Float3(data), AttributeValue::Float3(v)) => data[range].fill(v),
            (column, value) => panic!(
                "cannot fill {} column with {} value",
                column.attribute_type(),
                value.attribute_type()
            ),
        }
    }

    /// Copy slot `from` to slot `to` within this column.
    pub(crate) fn copy_within(&mut self, from: usize, to: usize) {
        match self {
            Self::Byte(data) => data[to] = data[from],
            Self::Int(data) => data[to] = data[from],
            Self::Float(data) => data[to] = data[from],
            Self::Float3(data) => data[to] = data[from],
        }
    }

    /// Copy slot `from` of `src` into slot `to` of this column.
    ///
    /// # Panics
    ///
    /// Panics if the two columns have different types.
    pub(crate) fn copy_from(&mut self, to: usize, src: &AttributeColumn, from: usize) {
        match (self, src) {
            (Self::Byte(dst), Self::Byte(src)) => dst[to] = src[from],
            (Self::Int(dst), Self::Int(src)) => dst[to] = src[from],
            (Self::Float(dst), Self::Float(src)) => dst[to] = src[from],
            (Self::Float3(dst), Self::Float3(src)) => dst[to] = src[from],
            (dst, src) => panic!(
                "cannot copy {} column into {} column",
                src.attribute_type(),
                dst.attribute_type()
            ),
        }
    }

    /// Copy the first `len` slots of `src` into this column.
    pub(crate) fn copy_prefix_from(&mut self, src: &AttributeColumn, len: usize) {
        match (self, src) {
            (Self::Byte(dst), Self::Byte(src)) => dst[..len].copy_from_slice(&src[..len]),
            (Self::Int(dst), Self::Int(src)) => dst[..len].copy_from_slice(&src[..len]),
            (Self::Float(dst), Self::Float(src)) => dst[..len].copy_from_slice(&src[..len]),
            (Self::Float3(dst), Self::Float3(src)) => dst[..len].copy_from_slice(&src[..len]),
            (dst, src) => panic!(
                "cannot copy {} column into {} column",
                src.attribute_type(),
                dst.attribute_type()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_column_has_capacity_slots() {
        let column = AttributeColumn::filled(AttributeValue::Float(2.5), 4);
        match column {
            AttributeColumn::Float(data) => assert_eq!(data, vec![2.5; 4]),
            _ => panic!("wrong column type"),
        }
    }

    #[test]
    fn copy_within_moves_single_slot() {
        let mut column = AttributeColumn::Int(vec![1, 2, 3]);
        column.copy_within(2, 0);
        match column {
            AttributeColumn::Int(data) => assert_eq!(data, vec![3, 2, 3]),
            _ => panic!("wrong column type"),
        }
    }

    #[test]
    #[should_panic(expected = "cannot copy")]
    fn copy_between_types_panics() {
        let mut dst = AttributeColumn::Byte(vec![0; 2]);
        let src = AttributeColumn::Float(vec![1.0; 2]);
        dst.copy_from(0, &src, 0);
    }
}
