//! Linear velocity drag.

use ember_behavior::{Force, ParticleSet};
use ember_core::{BehaviorError, Vec3, VELOCITY};

/// Force opposing motion: `F = -coefficient * v`.
#[derive(Clone, Debug, PartialEq)]
pub struct DragForce {
    coefficient: f32,
}

impl DragForce {
    /// Create a drag force.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `coefficient` is negative or not finite.
    pub fn new(coefficient: f32) -> Result<Self, String> {
        if !coefficient.is_finite() || coefficient < 0.0 {
            return Err(format!(
                "drag coefficient must be finite and >= 0, got {coefficient}"
            ));
        }
        Ok(Self { coefficient })
    }

    /// The drag coefficient.
    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }
}

impl Force for DragForce {
    fn name(&self) -> &str {
        "DragForce"
    }

    fn add_force(&self, particles: &ParticleSet<'_>, forces: &mut [Vec3]) -> Result<(), BehaviorError> {
        let attributes = particles.attributes();
        let velocities = attributes.get_float3(VELOCITY)?;
        for (force, slot) in forces.iter_mut().zip(particles.indices().iter()) {
            *force -= self.coefficient * velocities[slot];
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_test_utils::fixtures;

    #[test]
    fn opposes_velocity() {
        let mut block = fixtures::block_with_particles(4, 3);
        block.attributes_mut().get_float3_mut(VELOCITY).unwrap()[..3]
            .copy_from_slice(&[Vec3::X, Vec3::Y, Vec3::ZERO]);
        let list = [2, 0];
        let particles = ParticleSet::from_list(&mut block, &list);
        let mut forces = vec![Vec3::ZERO; 2];
        DragForce::new(0.5).unwrap().add_force(&particles, &mut forces).unwrap();
        assert_eq!(forces, vec![Vec3::ZERO, Vec3::new(-0.5, 0.0, 0.0)]);
    }

    #[test]
    fn negative_coefficient_rejected() {
        assert!(DragForce::new(-1.0).is_err());
        assert!(DragForce::new(f32::NAN).is_err());
    }
}
