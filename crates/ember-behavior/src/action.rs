//! The [`Action`] trait and the [`ActionInterface`] it receives.

use ember_core::{BehaviorError, ParticleTypeId, KILL_STATE};
use ember_storage::AttributesDeclaration;

use crate::set::ParticleSet;
use crate::spawn::{SpawnRequest, SpawnWriter};

/// The particles an event fired on, positioned at the moment of the event.
///
/// `current_times` and `remaining_durations` are set-local. New particles
/// requested through [`request`](Self::request) are buffered here and
/// allocated by the engine after the block phase.
pub struct ActionInterface<'a> {
    particles: ParticleSet<'a>,
    current_times: &'a [f32],
    remaining_durations: &'a [f32],
    end_time: f32,
    spawns: Vec<SpawnRequest>,
}

impl<'a> ActionInterface<'a> {
    /// Create an interface over `particles`.
    ///
    /// # Panics
    ///
    /// Panics if the time slices do not cover the set.
    pub fn new(
        particles: ParticleSet<'a>,
        current_times: &'a [f32],
        remaining_durations: &'a [f32],
        end_time: f32,
    ) -> Self {
        assert_eq!(current_times.len(), particles.len(), "current times must cover the particle set");
        assert_eq!(
            remaining_durations.len(),
            particles.len(),
            "remaining durations must cover the particle set"
        );
        Self {
            particles,
            current_times,
            remaining_durations,
            end_time,
            spawns: Vec::new(),
        }
    }

    /// The particles to act on.
    pub fn particles(&self) -> &ParticleSet<'a> {
        &self.particles
    }

    /// The particles to act on, mutably.
    pub fn particles_mut(&mut self) -> &mut ParticleSet<'a> {
        &mut self.particles
    }

    /// Time at which the `i`-th particle hit the event.
    pub fn current_time(&self, i: usize) -> f32 {
        self.current_times[i]
    }

    /// Event times, one per particle.
    pub fn current_times(&self) -> &[f32] {
        self.current_times
    }

    /// Duration left between the event and the end of the interval.
    pub fn remaining_duration(&self, i: usize) -> f32 {
        self.remaining_durations[i]
    }

    /// Remaining durations, one per particle.
    pub fn remaining_durations(&self) -> &[f32] {
        self.remaining_durations
    }

    /// Time at which the interval ends.
    pub fn end_time(&self) -> f32 {
        self.end_time
    }

    /// Mark the `i`-th particle as killed.
    pub fn kill(&mut self, i: usize) -> Result<(), BehaviorError> {
        let slot = self.particles.particle_index(i);
        let mut attributes = self.particles.attributes_mut();
        attributes.get_byte_mut(KILL_STATE)?[slot] = 1;
        Ok(())
    }

    /// Mark every particle in the set as killed.
    pub fn kill_all(&mut self) -> Result<(), BehaviorError> {
        let slots: Vec<usize> = self.particles.indices().iter().collect();
        let mut attributes = self.particles.attributes_mut();
        let kill_states = attributes.get_byte_mut(KILL_STATE)?;
        for slot in slots {
            kill_states[slot] = 1;
        }
        Ok(())
    }

    /// Queue `amount` new particles of `particle_type`.
    ///
    /// The particles are born at [`end_time`](Self::end_time) unless the
    /// writer sets earlier birth times, and move for the rest of the
    /// interval once allocated. Attributes the writer leaves unset take
    /// their declared defaults.
    pub fn request(&mut self, particle_type: ParticleTypeId, amount: usize) -> SpawnWriter<'_> {
        let index = self.spawns.len();
        self.spawns
            .push(SpawnRequest::new(particle_type, amount, self.end_time));
        self.spawns[index].writer()
    }

    /// Requests queued so far, in request order.
    pub fn spawns(&self) -> &[SpawnRequest] {
        &self.spawns
    }

    /// Release the particle set and hand back the queued requests.
    pub fn into_spawns(self) -> Vec<SpawnRequest> {
        self.spawns
    }
}

/// The response to an [`Event`](crate::Event).
///
/// Actions may modify any attribute of the particles they receive,
/// including setting the kill state, and may request new particles of any
/// described type. Particles an action leaves alive continue moving for
/// their remaining duration.
///
/// # Contract
///
/// - `execute()` touches only the particles in the interface's set.
/// - `&self`: actions are shared read-only across worker threads.
pub trait Action: Send + Sync {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Attributes this action reads or writes.
    fn declare_attributes(&self, _attributes: &mut AttributesDeclaration) {}

    /// Apply the action to every particle in `interface`.
    fn execute(&self, interface: &mut ActionInterface<'_>) -> Result<(), BehaviorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_test_utils::fixtures;

    #[test]
    fn kill_marks_only_listed_slots() {
        let mut block = fixtures::block_with_particles(8, 6);
        let list = [1, 4];
        let set = ParticleSet::from_list(&mut block, &list);
        let times = [0.5, 0.5];
        let remaining = [0.5, 0.5];
        let mut interface = ActionInterface::new(set, &times, &remaining, 1.0);
        interface.kill_all().unwrap();
        drop(interface);

        let kill = block.attributes().get_byte(KILL_STATE).unwrap();
        assert_eq!(&kill[..6], &[0, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn kill_single_particle() {
        let mut block = fixtures::block_with_particles(4, 3);
        let set = ParticleSet::active(&mut block);
        let times = [0.0; 3];
        let mut interface = ActionInterface::new(set, &times, &times, 1.0);
        interface.kill(2).unwrap();
        drop(interface);
        assert_eq!(block.attributes().get_byte(KILL_STATE).unwrap()[2], 1);
    }

    #[test]
    fn requests_are_buffered_at_hit_times() {
        let mut block = fixtures::block_with_particles(4, 2);
        let set = ParticleSet::active(&mut block);
        let times = [0.25, 0.5];
        let remaining = [0.75, 0.5];
        let mut interface = ActionInterface::new(set, &times, &remaining, 1.0);
        {
            let mut writer = interface.request(ParticleTypeId(3), 2);
            writer.set_birth_times(&[0.25, 0.5]);
            writer.fill_float3(ember_core::POSITION, ember_core::Vec3::Z);
        }
        interface.request(ParticleTypeId(4), 1);
        assert_eq!(interface.spawns().len(), 2);

        let spawns = interface.into_spawns();
        assert_eq!(spawns[0].particle_type(), ParticleTypeId(3));
        assert_eq!(spawns[0].birth_times(), &[0.25, 0.5]);
        assert_eq!(spawns[1].birth_times(), &[1.0]);
        // Requesting never touches the block.
        assert_eq!(block.active_amount(), 2);
    }
}
