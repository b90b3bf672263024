//! Error types shared across the Ember workspace.
//!
//! Attribute lookups fail with [`AttributeError`]; user behaviors (forces,
//! events, actions, emitters) fail with [`BehaviorError`], which the engine
//! wraps together with the failing behavior's name.

use std::error::Error;
use std::fmt;

use crate::attribute::AttributeType;

/// Errors from looking up or declaring particle attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeError {
    /// No attribute with this name and type exists in the schema.
    NotFound {
        /// Requested attribute name.
        name: String,
        /// Requested attribute type.
        expected: AttributeType,
    },
    /// An attribute was declared twice with different types.
    TypeConflict {
        /// The contested attribute name.
        name: String,
        /// Type of the earlier declaration.
        existing: AttributeType,
        /// Type of the conflicting declaration.
        requested: AttributeType,
    },
}

impl AttributeError {
    /// Shorthand for [`AttributeError::NotFound`].
    pub fn not_found(name: &str, expected: AttributeType) -> Self {
        Self::NotFound {
            name: name.to_string(),
            expected,
        }
    }
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name, expected } => {
                write!(f, "attribute '{name}' of type {expected} not found")
            }
            Self::TypeConflict {
                name,
                existing,
                requested,
            } => {
                write!(
                    f,
                    "attribute '{name}' declared as {existing} and as {requested}"
                )
            }
        }
    }
}

impl Error for AttributeError {}

/// Errors from force, event, action, or emitter execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BehaviorError {
    /// The behavior failed for a reason of its own.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The behavior requested an attribute the particle schema lacks.
    Attribute(AttributeError),
}

impl fmt::Display for BehaviorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::Attribute(e) => write!(f, "{e}"),
        }
    }
}

impl Error for BehaviorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Attribute(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AttributeError> for BehaviorError {
    fn from(e: AttributeError) -> Self {
        Self::Attribute(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_attribute_and_type() {
        let err = AttributeError::not_found("Size", AttributeType::Float);
        assert_eq!(err.to_string(), "attribute 'Size' of type float not found");
    }

    #[test]
    fn behavior_error_wraps_attribute_error() {
        let err: BehaviorError = AttributeError::not_found("Color", AttributeType::Float3).into();
        assert!(matches!(err, BehaviorError::Attribute(_)));
        assert!(err.source().is_some());
    }
}
