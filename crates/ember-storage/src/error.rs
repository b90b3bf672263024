//! Storage-specific error types.

use std::error::Error;
use std::fmt;

use ember_core::{AttributeError, ParticleTypeId};

/// Errors that can occur during storage operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// No container exists for the requested particle type.
    UnknownParticleType {
        /// The unrecognised type.
        particle_type: ParticleTypeId,
    },
    /// An attribute lookup or declaration failed.
    Attribute(AttributeError),
    /// The storage configuration violates an invariant.
    InvalidConfig {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParticleType { particle_type } => {
                write!(f, "unknown particle type: {particle_type}")
            }
            Self::Attribute(e) => write!(f, "{e}"),
            Self::InvalidConfig { reason } => write!(f, "invalid storage config: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Attribute(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AttributeError> for StorageError {
    fn from(e: AttributeError) -> Self {
        Self::Attribute(e)
    }
}
