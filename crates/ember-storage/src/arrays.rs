//! Typed, named views over a range of block slots.
//!
//! [`AttributeArrays`] and [`AttributeArraysMut`] bind an [`AttributesInfo`]
//! to the columns of one block and a slot range within it. Index `0` of
//! every returned slice is the first slot of the range.

use std::ops::Range;

use ember_core::{AttributeError, AttributeType, Vec3};

use crate::column::AttributeColumn;
use crate::info::AttributesInfo;

/// Read-only view over a contiguous slot range of one block.
#[derive(Clone, Copy)]
pub struct AttributeArrays<'a> {
    info: &'a AttributesInfo,
    columns: &'a [AttributeColumn],
    start: usize,
    len: usize,
}

impl<'a> AttributeArrays<'a> {
    pub(crate) fn new(
        info: &'a AttributesInfo,
        columns: &'a [AttributeColumn],
        range: Range<usize>,
    ) -> Self {
        Self {
            info,
            columns,
            start: range.start,
            len: range.len(),
        }
    }

    /// The schema of the underlying block.
    pub fn info(&self) -> &'a AttributesInfo {
        self.info
    }

    /// Number of slots in the view.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view covers no slots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Narrow the view to `range`, relative to this view.
    ///
    /// # Panics
    ///
    /// Panics if `range` extends past the end of the view.
    pub fn slice(&self, range: Range<usize>) -> AttributeArrays<'a> {
        assert!(range.end <= self.len, "slice {range:?} exceeds view of {}", self.len);
        Self {
            info: self.info,
            columns: self.columns,
            start: self.start + range.start,
            len: range.len(),
        }
    }

    fn column(&self, name: &str, attribute_type: AttributeType) -> Result<&'a AttributeColumn, AttributeError> {
        let index = self.info.index_of(name, attribute_type)?;
        let columns: &'a [AttributeColumn] = self.columns;
        Ok(&columns[index])
    }

    fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Byte column `name`.
    pub fn get_byte(&self, name: &str) -> Result<&'a [u8], AttributeError> {
        match self.column(name, AttributeType::Byte)? {
            AttributeColumn::Byte(data) => Ok(&data[self.range()]),
            _ => Err(AttributeError::not_found(name, AttributeType::Byte)),
        }
    }

    /// Int column `name`.
    pub fn get_int(&self, name: &str) -> Result<&'a [i32], AttributeError> {
        match self.column(name, AttributeType::Int)? {
            AttributeColumn::Int(data) => Ok(&data[self.range()]),
            _ => Err(AttributeError::not_found(name, AttributeType::Int)),
        }
    }

    /// Float column `name`.
    pub fn get_float(&self, name: &str) -> Result<&'a [f32], AttributeError> {
        match self.column(name, AttributeType::Float)? {
            AttributeColumn::Float(data) => Ok(&data[self.range()]),
            _ => Err(AttributeError::not_found(name, AttributeType::Float)),
        }
    }

    /// Float3 column `name`.
    pub fn get_float3(&self, name: &str) -> Result<&'a [Vec3], AttributeError> {
        match self.column(name, AttributeType::Float3)? {
            AttributeColumn::Float3(data) => Ok(&data[self.range()]),
            _ => Err(AttributeError::not_found(name, AttributeType::Float3)),
        }
    }
}

/// Mutable view over a contiguous slot range of one block.
pub struct AttributeArraysMut<'a> {
    info: &'a AttributesInfo,
    columns: &'a mut [AttributeColumn],
    start: usize,
    len: usize,
}

impl<'a> AttributeArraysMut<'a> {
    pub(crate) fn new(
        info: &'a AttributesInfo,
        columns: &'a mut [AttributeColumn],
        range: Range<usize>,
    ) -> Self {
        Self {
            info,
            columns,
            start: range.start,
            len: range.len(),
        }
    }

    /// The schema of the underlying block.
    pub fn info(&self) -> &AttributesInfo {
        self.info
    }

    /// Number of slots in the view.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view covers no slots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> AttributeArrays<'_> {
        AttributeArrays::new(self.info, self.columns, self.range())
    }

    /// Narrow the view to `range`, relative to this view.
    ///
    /// # Panics
    ///
    /// Panics if `range` extends past the end of the view.
    pub fn slice_mut(&mut self, range: Range<usize>) -> AttributeArraysMut<'_> {
        assert!(range.end <= self.len, "slice {range:?} exceeds view of {}", self.len);
        AttributeArraysMut {
            info: self.info,
            columns: &mut *self.columns,
            start: self.start + range.start,
            len: range.len(),
        }
    }

    fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    fn column_mut(
        &mut self,
        name: &str,
        attribute_type: AttributeType,
    ) -> Result<&mut AttributeColumn, AttributeError> {
        let index = self.info.index_of(name, attribute_type)?;
        Ok(&mut self.columns[index])
    }

    /// Byte column `name`.
    pub fn get_byte(&self, name: &str) -> Result<&[u8], AttributeError> {
        self.as_view().get_byte(name)
    }

    /// Int column `name`.
    pub fn get_int(&self, name: &str) -> Result<&[i32], AttributeError> {
        self.as_view().get_int(name)
    }

    /// Float column `name`.
    pub fn get_float(&self, name: &str) -> Result<&[f32], AttributeError> {
        self.as_view().get_float(name)
    }

    /// Float3 column `name`.
    pub fn get_float3(&self, name: &str) -> Result<&[Vec3], AttributeError> {
        self.as_view().get_float3(name)
    }

    /// Mutable byte column `name`.
    pub fn get_byte_mut(&mut self, name: &str) -> Result<&mut [u8], AttributeError> {
        let range = self.range();
        match self.column_mut(name, AttributeType::Byte)? {
            AttributeColumn::Byte(data) => Ok(&mut data[range]),
            _ => Err(AttributeError::not_found(name, AttributeType::Byte)),
        }
    }

    /// Mutable int column `name`.
    pub fn get_int_mut(&mut self, name: &str) -> Result<&mut [i32], AttributeError> {
        let range = self.range();
        match self.column_mut(name, AttributeType::Int)? {
            AttributeColumn::Int(data) => Ok(&mut data[range]),
            _ => Err(AttributeError::not_found(name, AttributeType::Int)),
        }
    }

    /// Mutable float column `name`.
    pub fn get_float_mut(&mut self, name: &str) -> Result<&mut [f32], AttributeError> {
        let range = self.range();
        match self.column_mut(name, AttributeType::Float)? {
            AttributeColumn::Float(data) => Ok(&mut data[range]),
            _ => Err(AttributeError::not_found(name, AttributeType::Float)),
        }
    }

    /// Mutable float3 column `name`.
    pub fn get_float3_mut(&mut self, name: &str) -> Result<&mut [Vec3], AttributeError> {
        let range = self.range();
        match self.column_mut(name, AttributeType::Float3)? {
            AttributeColumn::Float3(data) => Ok(&mut data[range]),
            _ => Err(AttributeError::not_found(name, AttributeType::Float3)),
        }
    }
}
