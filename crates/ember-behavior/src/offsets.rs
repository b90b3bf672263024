//! Per-particle motion assuming no event interrupts the interval.

use ember_core::Vec3;

/// Position and velocity deltas over each particle's full remaining duration.
///
/// Index `i` belongs to the `i`-th particle of the set the offsets were
/// computed for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdealOffsets {
    /// Position change if the particle travels uninterrupted.
    pub position_offsets: Vec<Vec3>,
    /// Velocity change if the particle travels uninterrupted.
    pub velocity_offsets: Vec<Vec3>,
}

impl IdealOffsets {
    /// Zeroed offsets for `len` particles.
    pub fn zeroed(len: usize) -> Self {
        Self {
            position_offsets: vec![Vec3::ZERO; len],
            velocity_offsets: vec![Vec3::ZERO; len],
        }
    }

    /// Number of particles covered.
    pub fn len(&self) -> usize {
        self.position_offsets.len()
    }

    /// Whether no particle is covered.
    pub fn is_empty(&self) -> bool {
        self.position_offsets.is_empty()
    }
}
