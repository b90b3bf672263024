//! Reference actions.
//!
//! - [`KillAction`] marks every particle it receives as dead.
//! - [`BounceAction`] reflects velocity off a plane.
//! - [`NoneAction`] leaves particles untouched, so the event only stops and
//!   restarts their integration.

use ember_behavior::{Action, ActionInterface};
use ember_core::{BehaviorError, Vec3, VELOCITY};

/// Kills every particle the event fired on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KillAction;

impl Action for KillAction {
    fn name(&self) -> &str {
        "KillAction"
    }

    fn execute(&self, interface: &mut ActionInterface<'_>) -> Result<(), BehaviorError> {
        interface.kill_all()
    }
}

/// Does nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoneAction;

impl Action for NoneAction {
    fn name(&self) -> &str {
        "NoneAction"
    }

    fn execute(&self, _interface: &mut ActionInterface<'_>) -> Result<(), BehaviorError> {
        Ok(())
    }
}

/// Reflects the normal component of velocity and scales it by
/// `1 - damping`. The tangential component is kept.
#[derive(Clone, Debug, PartialEq)]
pub struct BounceAction {
    normal: Vec3,
    damping: f32,
}

impl BounceAction {
    /// Create a bounce off the plane with the given `normal`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `normal` is zero or `damping` is outside `[0, 1]`.
    pub fn new(normal: Vec3, damping: f32) -> Result<Self, String> {
        let normal = normal
            .try_normalize()
            .ok_or_else(|| format!("bounce normal must be non-zero and finite, got {normal}"))?;
        if !(0.0..=1.0).contains(&damping) {
            return Err(format!("damping must be in [0, 1], got {damping}"));
        }
        Ok(Self { normal, damping })
    }

    /// Unit normal of the bounce plane.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Fraction of normal speed lost per bounce.
    pub fn damping(&self) -> f32 {
        self.damping
    }

    fn reflect(&self, velocity: Vec3) -> Vec3 {
        let normal_part = velocity.dot(self.normal) * self.normal;
        let tangent_part = velocity - normal_part;
        tangent_part - normal_part * (1.0 - self.damping)
    }
}

impl Action for BounceAction {
    fn name(&self) -> &str {
        "BounceAction"
    }

    fn execute(&self, interface: &mut ActionInterface<'_>) -> Result<(), BehaviorError> {
        let particles = interface.particles_mut();
        let slots: Vec<usize> = particles.indices().iter().collect();
        let mut attributes = particles.attributes_mut();
        let velocities = attributes.get_float3_mut(VELOCITY)?;
        for slot in slots {
            velocities[slot] = self.reflect(velocities[slot]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_behavior::ParticleSet;
    use ember_core::KILL_STATE;
    use ember_test_utils::fixtures;

    fn run(action: &dyn Action, block: &mut ember_storage::ParticlesBlock, list: &[usize]) {
        let times = vec![0.5; list.len()];
        let remaining = vec![0.5; list.len()];
        let particles = ParticleSet::from_list(block, list);
        let mut interface = ActionInterface::new(particles, &times, &remaining, 1.0);
        action.execute(&mut interface).unwrap();
    }

    #[test]
    fn kill_marks_only_listed_particles() {
        let mut block = fixtures::block_with_particles(4, 4);
        run(&KillAction, &mut block, &[1, 3]);
        let kill_states = block.attributes().get_byte(KILL_STATE).unwrap().to_vec();
        assert_eq!(kill_states, vec![0, 1, 0, 1]);
    }

    #[test]
    fn bounce_flips_normal_component() {
        let mut block = fixtures::block_with_particles(2, 2);
        block.attributes_mut().get_float3_mut(VELOCITY).unwrap()[..2]
            .copy_from_slice(&[Vec3::new(1.0, 0.0, -4.0), Vec3::new(0.0, 0.0, -4.0)]);
        run(&BounceAction::new(Vec3::Z, 0.5).unwrap(), &mut block, &[0]);
        let velocities = block.attributes().get_float3(VELOCITY).unwrap().to_vec();
        assert_eq!(velocities[0], Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(velocities[1], Vec3::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn none_changes_nothing() {
        let mut block = fixtures::block_with_particles(2, 2);
        let before = block.attributes().get_float3(VELOCITY).unwrap().to_vec();
        run(&NoneAction, &mut block, &[0, 1]);
        assert_eq!(block.attributes().get_float3(VELOCITY).unwrap(), &before[..]);
    }

    #[test]
    fn bounce_validates_parameters() {
        assert!(BounceAction::new(Vec3::ZERO, 0.5).is_err());
        assert!(BounceAction::new(Vec3::Z, 1.5).is_err());
    }
}
