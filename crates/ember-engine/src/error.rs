//! Errors raised while advancing a simulation step.

use std::error::Error;
use std::fmt;

use ember_core::{AttributeError, BehaviorError, ParticleTypeId};
use ember_storage::StorageError;

/// A step failed part-way.
///
/// No rollback happens: particles already advanced stay advanced, and the
/// state's current time has moved to the end of the failed tick.
#[derive(Debug, Clone, PartialEq)]
pub enum StepError {
    /// A force, event, action, or emitter returned an error.
    Behavior {
        /// Name of the failing behavior.
        name: String,
        /// What it reported.
        error: BehaviorError,
    },
    /// Storage rejected an operation, usually a missing attribute.
    Storage(StorageError),
    /// An emitter created particles of a type the description lacks.
    UnknownParticleType {
        /// The undescribed type.
        particle_type: ParticleTypeId,
    },
}

impl StepError {
    pub(crate) fn behavior(name: &str, error: BehaviorError) -> Self {
        Self::Behavior {
            name: name.to_string(),
            error,
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Behavior { name, error } => write!(f, "behavior '{name}' failed: {error}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::UnknownParticleType { particle_type } => {
                write!(f, "particle type {particle_type} is not part of the step description")
            }
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Behavior { error, .. } => Some(error),
            Self::Storage(e) => Some(e),
            Self::UnknownParticleType { .. } => None,
        }
    }
}

impl From<StorageError> for StepError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<AttributeError> for StepError {
    fn from(e: AttributeError) -> Self {
        Self::Storage(StorageError::Attribute(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::AttributeType;

    #[test]
    fn behavior_error_names_the_behavior() {
        let err = StepError::behavior(
            "gravity",
            BehaviorError::ExecutionFailed {
                reason: "boom".to_string(),
            },
        );
        assert!(err.to_string().starts_with("behavior 'gravity' failed"));
        assert!(err.source().is_some());
    }

    #[test]
    fn attribute_error_becomes_storage_error() {
        let err: StepError = AttributeError::not_found("Mass", AttributeType::Float).into();
        assert!(matches!(err, StepError::Storage(StorageError::Attribute(_))));
    }
}
