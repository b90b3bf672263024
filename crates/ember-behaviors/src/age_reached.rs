//! Event fired when a particle reaches a fixed age.

use ember_behavior::{Event, EventInterface};
use ember_core::{BehaviorError, BIRTH_TIME};

/// Fires once, at the moment `birth time + lifetime` falls inside a
/// particle's remaining interval.
///
/// Particles that were already older than `lifetime` when their interval
/// started are not reported again.
#[derive(Clone, Debug, PartialEq)]
pub struct AgeReachedEvent {
    lifetime: f32,
}

impl AgeReachedEvent {
    /// Create the event.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `lifetime` is negative or not finite.
    pub fn new(lifetime: f32) -> Result<Self, String> {
        if !lifetime.is_finite() || lifetime < 0.0 {
            return Err(format!("lifetime must be finite and >= 0, got {lifetime}"));
        }
        Ok(Self { lifetime })
    }

    /// Age at which the event fires.
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }
}

impl Event for AgeReachedEvent {
    fn name(&self) -> &str {
        "AgeReachedEvent"
    }

    fn filter(&self, interface: &mut EventInterface<'_, '_>) -> Result<(), BehaviorError> {
        let particles = interface.particles();
        let birth_times = particles.attributes().get_float(BIRTH_TIME)?;

        let mut triggered = Vec::new();
        for (i, slot) in particles.indices().iter().enumerate() {
            let span = interface.time_span(i);
            let death_time = birth_times[slot] + self.lifetime;
            if span.start() <= death_time && death_time < span.end() {
                let factor = span.inverse_interpolate(death_time).clamp(0.0, 1.0);
                triggered.push((i, factor));
            }
        }
        for (i, factor) in triggered {
            interface.trigger(i, factor);
        }
        Ok(())
    }
}
