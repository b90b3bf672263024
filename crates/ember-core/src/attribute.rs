//! Attribute kinds, typed default values, and well-known attribute names.

use std::fmt;

use glam::Vec3;

/// Per-particle byte flag; non-zero marks the particle for deletion.
pub const KILL_STATE: &str = "Kill State";
/// Absolute simulation time at which the particle was emitted.
pub const BIRTH_TIME: &str = "Birth Time";
/// Particle position.
pub const POSITION: &str = "Position";
/// Particle velocity.
pub const VELOCITY: &str = "Velocity";

/// Storage type of a particle attribute column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeType {
    /// One `u8` per particle.
    Byte,
    /// One `i32` per particle.
    Int,
    /// One `f32` per particle.
    Float,
    /// One [`Vec3`] per particle.
    Float3,
}

impl AttributeType {
    /// Size of a single element of this type in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Int => 4,
            Self::Float => 4,
            Self::Float3 => 12,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => write!(f, "byte"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Float3 => write!(f, "float3"),
        }
    }
}

/// A typed attribute value, used as the default for freshly allocated slots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttributeValue {
    /// Byte value.
    Byte(u8),
    /// Integer value.
    Int(i32),
    /// Float value.
    Float(f32),
    /// Vector value.
    Float3(Vec3),
}

impl AttributeValue {
    /// The all-zero value of the given type.
    pub fn zeroed(attribute_type: AttributeType) -> Self {
        match attribute_type {
            AttributeType::Byte => Self::Byte(0),
            AttributeType::Int => Self::Int(0),
            AttributeType::Float => Self::Float(0.0),
            AttributeType::Float3 => Self::Float3(Vec3::ZERO),
        }
    }

    /// The storage type this value belongs to.
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Self::Byte(_) => AttributeType::Byte,
            Self::Int(_) => AttributeType::Int,
            Self::Float(_) => AttributeType::Float,
            Self::Float3(_) => AttributeType::Float3,
        }
    }
}
