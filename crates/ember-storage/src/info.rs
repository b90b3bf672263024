//! Attribute schemas: [`AttributesInfo`] and the [`AttributesDeclaration`] that builds it.
//!
//! A schema is an ordered set of named, typed attributes, each with the
//! default value written into freshly allocated slots. Column `i` of every
//! block built from a schema holds the attribute at position `i`.

use indexmap::IndexMap;

use ember_core::{AttributeError, AttributeType, AttributeValue, Vec3};

/// Immutable, ordered attribute schema shared by all blocks of a container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributesInfo {
    attributes: IndexMap<String, AttributeValue>,
}

impl AttributesInfo {
    /// A schema with no attributes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of attributes in the schema.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the schema has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Column index of the attribute `name` with type `attribute_type`.
    ///
    /// Fails with [`AttributeError::NotFound`] if the name is missing or
    /// registered under a different type.
    pub fn index_of(&self, name: &str, attribute_type: AttributeType) -> Result<usize, AttributeError> {
        match self.attributes.get_full(name) {
            Some((index, _, default)) if default.attribute_type() == attribute_type => Ok(index),
            _ => Err(AttributeError::not_found(name, attribute_type)),
        }
    }

    /// Whether an attribute with this name and type exists.
    pub fn contains(&self, name: &str, attribute_type: AttributeType) -> bool {
        self.index_of(name, attribute_type).is_ok()
    }

    /// Name of the attribute at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn name(&self, index: usize) -> &str {
        self.attributes
            .get_index(index)
            .map(|(name, _)| name.as_str())
            .expect("attribute index out of bounds")
    }

    /// Type of the attribute at `index`.
    pub fn attribute_type(&self, index: usize) -> AttributeType {
        self.default_value(index).attribute_type()
    }

    /// Default value of the attribute at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn default_value(&self, index: usize) -> AttributeValue {
        *self
            .attributes
            .get_index(index)
            .map(|(_, value)| value)
            .expect("attribute index out of bounds")
    }

    /// Iterate over `(name, default)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, AttributeValue)> + '_ {
        self.attributes.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Whether both schemas hold the same names with the same types,
    /// ignoring order and default values.
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(name, value)| other.contains(name, value.attribute_type()))
    }

    /// Whether both schemas produce identical column layouts: same names,
    /// types, and order.
    pub fn same_layout(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .attributes
                .iter()
                .zip(other.attributes.iter())
                .all(|((a, va), (b, vb))| a == b && va.attribute_type() == vb.attribute_type())
    }
}

/// Mutable collection of attribute requirements.
///
/// Behaviors add the attributes they need; the engine merges all
/// declarations for a particle type and builds one [`AttributesInfo`].
/// Redeclaring an attribute with the same type keeps the first default.
/// Redeclaring it with a different type is recorded and reported by
/// [`build`](AttributesDeclaration::build).
#[derive(Clone, Debug, Default)]
pub struct AttributesDeclaration {
    attributes: IndexMap<String, AttributeValue>,
    conflict: Option<AttributeError>,
}

impl AttributesDeclaration {
    /// An empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an attribute with an explicit default value.
    pub fn add(&mut self, name: &str, default: AttributeValue) -> &mut Self {
        match self.attributes.get(name) {
            Some(existing) if existing.attribute_type() != default.attribute_type() => {
                if self.conflict.is_none() {
                    self.conflict = Some(AttributeError::TypeConflict {
                        name: name.to_string(),
                        existing: existing.attribute_type(),
                        requested: default.attribute_type(),
                    });
                }
            }
            Some(_) => {}
            None => {
                self.attributes.insert(name.to_string(), default);
            }
        }
        self
    }

    /// Declare a byte attribute.
    pub fn add_byte(&mut self, name: &str, default: u8) -> &mut Self {
        self.add(name, AttributeValue::Byte(default))
    }

    /// Declare an int attribute.
    pub fn add_int(&mut self, name: &str, default: i32) -> &mut Self {
        self.add(name, AttributeValue::Int(default))
    }

    /// Declare a float attribute.
    pub fn add_float(&mut self, name: &str, default: f32) -> &mut Self {
        self.add(name, AttributeValue::Float(default))
    }

    /// Declare a float3 attribute.
    pub fn add_float3(&mut self, name: &str, default: Vec3) -> &mut Self {
        self.add(name, AttributeValue::Float3(default))
    }

    /// Merge every attribute of `other` into this declaration.
    pub fn join(&mut self, other: &AttributesDeclaration) -> &mut Self {
        if let Some(conflict) = &other.conflict {
            if self.conflict.is_none() {
                self.conflict = Some(conflict.clone());
            }
        }
        for (name, default) in &other.attributes {
            self.add(name, *default);
        }
        self
    }

    /// Build the schema.
    ///
    /// Attributes are ordered by type (byte, int, float, float3) and then
    /// by declaration order, so equal declarations always yield the same
    /// column layout.
    pub fn build(&self) -> Result<AttributesInfo, AttributeError> {
        if let Some(conflict) = &self.conflict {
            return Err(conflict.clone());
        }
        let mut attributes = self.attributes.clone();
        attributes.sort_by(|_, a, _, b| a.attribute_type().cmp(&b.attribute_type()));
        Ok(AttributesInfo { attributes })
    }
}
