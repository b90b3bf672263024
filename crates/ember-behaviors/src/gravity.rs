//! Constant force.

use ember_behavior::{Force, ParticleSet};
use ember_core::{BehaviorError, Vec3};

/// Adds the same force to every particle.
///
/// With the default unit mass this is a uniform gravitational
/// acceleration of `strength`.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityForce {
    strength: Vec3,
}

impl GravityForce {
    /// Create a gravity force.
    pub fn new(strength: Vec3) -> Self {
        Self { strength }
    }

    /// The force vector.
    pub fn strength(&self) -> Vec3 {
        self.strength
    }
}

impl Default for GravityForce {
    /// Earth gravity along -Z.
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -9.81))
    }
}

impl Force for GravityForce {
    fn name(&self) -> &str {
        "GravityForce"
    }

    fn add_force(&self, _particles: &ParticleSet<'_>, forces: &mut [Vec3]) -> Result<(), BehaviorError> {
        for force in forces.iter_mut() {
            *force += self.strength;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_test_utils::fixtures;

    #[test]
    fn adds_to_existing_forces() {
        let mut block = fixtures::block_with_particles(4, 2);
        let particles = ParticleSet::active(&mut block);
        let mut forces = vec![Vec3::X; 2];
        GravityForce::new(Vec3::new(0.0, -10.0, 0.0))
            .add_force(&particles, &mut forces)
            .unwrap();
        assert_eq!(forces, vec![Vec3::new(1.0, -10.0, 0.0); 2]);
    }

    #[test]
    fn default_points_down() {
        assert_eq!(GravityForce::default().strength().z, -9.81);
    }
}
