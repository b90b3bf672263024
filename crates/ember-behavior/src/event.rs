//! The [`Event`] trait and the [`EventInterface`] it fills.

use ember_core::{BehaviorError, TimeSpan};
use ember_storage::AttributesDeclaration;

use crate::offsets::IdealOffsets;
use crate::set::ParticleSet;

/// A particle that an event fires on, with the fraction of its remaining
/// duration that elapses before the event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trigger {
    /// Set-local index of the particle.
    pub index: usize,
    /// Fraction of the remaining duration in `[0, 1]`.
    pub time_factor: f32,
}

/// Everything an [`Event`] may inspect while deciding which particles
/// it fires on.
///
/// `offsets` and `durations` are set-local: entry `i` belongs to the
/// `i`-th particle of the set.
pub struct EventInterface<'a, 's> {
    particles: &'a ParticleSet<'s>,
    offsets: &'a IdealOffsets,
    durations: &'a [f32],
    end_time: f32,
    triggered: Vec<Trigger>,
}

impl<'a, 's> EventInterface<'a, 's> {
    /// Create an interface for one event over `particles`.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` or `durations` do not cover the set.
    pub fn new(
        particles: &'a ParticleSet<'s>,
        offsets: &'a IdealOffsets,
        durations: &'a [f32],
        end_time: f32,
    ) -> Self {
        assert_eq!(offsets.len(), particles.len(), "offsets must cover the particle set");
        assert_eq!(durations.len(), particles.len(), "durations must cover the particle set");
        Self {
            particles,
            offsets,
            durations,
            end_time,
            triggered: Vec::new(),
        }
    }

    /// Particles under consideration.
    pub fn particles(&self) -> &'a ParticleSet<'s> {
        self.particles
    }

    /// Motion each particle would make over its remaining duration.
    pub fn offsets(&self) -> &'a IdealOffsets {
        self.offsets
    }

    /// Remaining durations, one per particle.
    pub fn durations(&self) -> &'a [f32] {
        self.durations
    }

    /// Time at which every particle's interval ends.
    pub fn end_time(&self) -> f32 {
        self.end_time
    }

    /// The interval still ahead of the `i`-th particle.
    pub fn time_span(&self, i: usize) -> TimeSpan {
        let duration = self.durations[i];
        TimeSpan::new(self.end_time - duration, duration)
    }

    /// Report that the `i`-th particle hits this event after `time_factor`
    /// of its remaining duration.
    ///
    /// # Panics
    ///
    /// Panics if `i` is outside the set. Debug builds also reject factors
    /// outside `[0, 1]`.
    pub fn trigger(&mut self, i: usize, time_factor: f32) {
        assert!(i < self.particles.len(), "trigger index {i} outside particle set");
        debug_assert!(
            (0.0..=1.0).contains(&time_factor),
            "time factor {time_factor} outside [0, 1]"
        );
        self.triggered.push(Trigger {
            index: i,
            time_factor,
        });
    }

    /// Triggers reported so far, in report order.
    pub fn triggered(&self) -> &[Trigger] {
        &self.triggered
    }

    /// Consume the interface, returning the reported triggers.
    pub fn into_triggered(self) -> Vec<Trigger> {
        self.triggered
    }
}

/// A condition that interrupts a particle's motion within a tick.
///
/// # Contract
///
/// - `filter()` reports at most one trigger per particle per call; it
///   must not modify particle state.
/// - Time factors are fractions of each particle's remaining duration.
/// - `&self`: events are shared read-only across worker threads.
pub trait Event: Send + Sync {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Attributes this event reads.
    fn declare_attributes(&self, _attributes: &mut AttributesDeclaration) {}

    /// Report which particles hit this event before their interval ends.
    fn filter(&self, interface: &mut EventInterface<'_, '_>) -> Result<(), BehaviorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_test_utils::fixtures;

    #[test]
    fn time_span_ends_at_end_time() {
        let mut block = fixtures::block_with_particles(4, 2);
        let set = ParticleSet::active(&mut block);
        let offsets = IdealOffsets::zeroed(2);
        let durations = [1.0, 0.25];
        let interface = EventInterface::new(&set, &offsets, &durations, 3.0);
        let span = interface.time_span(1);
        assert_eq!(span.start(), 2.75);
        assert_eq!(span.end(), 3.0);
    }

    #[test]
    fn triggers_keep_report_order() {
        let mut block = fixtures::block_with_particles(4, 3);
        let set = ParticleSet::active(&mut block);
        let offsets = IdealOffsets::zeroed(3);
        let durations = [1.0; 3];
        let mut interface = EventInterface::new(&set, &offsets, &durations, 1.0);
        interface.trigger(2, 0.5);
        interface.trigger(0, 0.1);
        let triggered = interface.into_triggered();
        assert_eq!(triggered[0].index, 2);
        assert_eq!(triggered[1].time_factor, 0.1);
    }

    #[test]
    #[should_panic(expected = "outside particle set")]
    fn trigger_outside_set_panics() {
        let mut block = fixtures::block_with_particles(4, 1);
        let set = ParticleSet::active(&mut block);
        let offsets = IdealOffsets::zeroed(1);
        let durations = [1.0];
        let mut interface = EventInterface::new(&set, &offsets, &durations, 1.0);
        interface.trigger(1, 0.5);
    }
}
