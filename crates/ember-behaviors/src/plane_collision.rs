//! Event fired when a particle passes through a plane.

use ember_behavior::{Event, EventInterface};
use ember_core::{BehaviorError, Vec3, POSITION};

/// Fires when a particle moves from the front side of a plane (the side
/// the normal points to) onto or behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneCollisionEvent {
    point: Vec3,
    normal: Vec3,
}

impl PlaneCollisionEvent {
    /// Create the event for the plane through `point` facing `normal`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `normal` has zero or non-finite length.
    pub fn new(point: Vec3, normal: Vec3) -> Result<Self, String> {
        let normal = normal.try_normalize().ok_or_else(|| {
            format!("plane normal must be non-zero and finite, got {normal}")
        })?;
        Ok(Self { point, normal })
    }

    /// A point on the plane.
    pub fn point(&self) -> Vec3 {
        self.point
    }

    /// Unit normal of the plane.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    fn signed_distance(&self, position: Vec3) -> f32 {
        (position - self.point).dot(self.normal)
    }
}

impl Event for PlaneCollisionEvent {
    fn name(&self) -> &str {
        "PlaneCollisionEvent"
    }

    fn filter(&self, interface: &mut EventInterface<'_, '_>) -> Result<(), BehaviorError> {
        let particles = interface.particles();
        let offsets = interface.offsets();
        let positions = particles.attributes().get_float3(POSITION)?;

        let mut triggered = Vec::new();
        for (i, slot) in particles.indices().iter().enumerate() {
            let start = positions[slot];
            let before = self.signed_distance(start);
            let after = self.signed_distance(start + offsets.position_offsets[i]);
            if before > 0.0 && after <= 0.0 {
                triggered.push((i, before / (before - after)));
            }
        }
        for (i, factor) in triggered {
            interface.trigger(i, factor);
        }
        Ok(())
    }
}
