//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a particle type within a simulation.
///
/// Every particle type owns exactly one container in the particle state.
/// IDs are chosen by whoever builds the step description; the engine
/// only requires them to be unique within one description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleTypeId(pub u32);

impl fmt::Display for ParticleTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ParticleTypeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
