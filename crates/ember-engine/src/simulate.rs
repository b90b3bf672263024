//! The event/action loop for the particles of one block.
//!
//! Each pass computes where every particle would end up without
//! interruption, asks every event for the earliest crossing, moves each
//! particle up to its crossing (or all the way), runs the actions, and
//! repeats for the particles that survived an event. Passes are bounded by
//! [`EngineConfig::max_events_per_tick`]; anything still unfinished after
//! the last pass is integrated without events. Particles requested by
//! actions are collected in a caller-owned buffer, never allocated here.

use smallvec::SmallVec;

use ember_behavior::{
    ActionInterface, EventInterface, IdealOffsets, MassSource, ParticleIndices, ParticleSet,
    ParticleType, SpawnRequest,
};
use ember_core::{Vec3, KILL_STATE, POSITION, VELOCITY};
use ember_storage::ParticlesBlock;

use crate::config::EngineConfig;
use crate::error::StepError;

/// Counters gathered while stepping particle sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Action invocations.
    pub actions_executed: usize,
    /// Sets whose events were cut off by the event cap.
    pub event_cap_hits: usize,
}

impl LoopStats {
    /// Sum two sets of counters.
    pub fn merge(self, other: Self) -> Self {
        Self {
            actions_executed: self.actions_executed + other.actions_executed,
            event_cap_hits: self.event_cap_hits + other.event_cap_hits,
        }
    }
}

/// The earliest accepted event of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
struct NextEvent {
    event: usize,
    time_factor: f32,
}

/// Particles that hit an event, stayed alive, and still have time left.
struct Unfinished {
    slots: Vec<usize>,
    remaining: Vec<f32>,
    last_event_times: Vec<f32>,
}

impl Unfinished {
    fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Compute the uninterrupted motion of every particle in `particles`.
///
/// Forces are summed into a zeroed buffer, then
/// `dv = duration * force / mass` and `dx = duration * (v + dv / 2)`.
pub fn ideal_offsets(
    particles: &ParticleSet<'_>,
    durations: &[f32],
    particle_type: &ParticleType,
) -> Result<IdealOffsets, StepError> {
    let len = particles.len();
    assert_eq!(durations.len(), len, "durations must cover the particle set");

    let mut forces = vec![Vec3::ZERO; len];
    for force in particle_type.forces() {
        force
            .add_force(particles, &mut forces)
            .map_err(|e| StepError::behavior(force.name(), e))?;
    }

    let attributes = particles.attributes();
    let velocities = attributes.get_float3(VELOCITY)?;
    let (constant_mass, masses) = match particle_type.mass() {
        MassSource::Constant(mass) => (*mass, None),
        MassSource::Attribute(name) => (1.0, Some(attributes.get_float(name)?)),
    };

    let mut offsets = IdealOffsets::zeroed(len);
    for (i, slot) in particles.indices().iter().enumerate() {
        let mass = masses.map_or(constant_mass, |masses| masses[slot]);
        let duration = durations[i];
        let velocity_offset = duration * forces[i] / mass;
        offsets.velocity_offsets[i] = velocity_offset;
        offsets.position_offsets[i] = duration * (velocities[slot] + velocity_offset * 0.5);
    }
    Ok(offsets)
}

/// Ask every event of `particle_type` for crossings and keep the earliest
/// per particle.
///
/// A later event replaces an earlier one only with a strictly smaller time
/// factor. When `last_event_times` is given, candidates that would fire
/// within `retrigger_epsilon` of the particle's previous event are ignored.
fn find_next_events(
    particles: &ParticleSet<'_>,
    offsets: &IdealOffsets,
    durations: &[f32],
    end_time: f32,
    particle_type: &ParticleType,
    last_event_times: Option<&[f32]>,
    retrigger_epsilon: f32,
) -> Result<Vec<Option<NextEvent>>, StepError> {
    let mut next_events: Vec<Option<NextEvent>> = vec![None; particles.len()];

    for (event_index, binding) in particle_type.events().iter().enumerate() {
        let event = binding.event();
        let mut interface = EventInterface::new(particles, offsets, durations, end_time);
        event
            .filter(&mut interface)
            .map_err(|e| StepError::behavior(event.name(), e))?;

        for trigger in interface.into_triggered() {
            let index = trigger.index;
            if let Some(last) = last_event_times {
                let trigger_time = end_time - durations[index] * (1.0 - trigger.time_factor);
                if trigger_time - last[index] < retrigger_epsilon {
                    continue;
                }
            }
            let earlier = match next_events[index] {
                Some(current) => trigger.time_factor < current.time_factor,
                None => true,
            };
            if earlier {
                next_events[index] = Some(NextEvent {
                    event: event_index,
                    time_factor: trigger.time_factor,
                });
            }
        }
    }
    Ok(next_events)
}

/// Move every particle by the fraction of its ideal offsets that elapses
/// before its next event, or all of them if it has none.
fn forward_to_next_event(
    particles: &mut ParticleSet<'_>,
    offsets: &IdealOffsets,
    next_events: &[Option<NextEvent>],
) -> Result<(), StepError> {
    let slots: Vec<usize> = particles.indices().iter().collect();
    let factor = |i: usize| next_events[i].map_or(1.0, |next| next.time_factor);

    let mut attributes = particles.attributes_mut();
    let positions = attributes.get_float3_mut(POSITION)?;
    for (i, &slot) in slots.iter().enumerate() {
        positions[slot] += factor(i) * offsets.position_offsets[i];
    }
    let velocities = attributes.get_float3_mut(VELOCITY)?;
    for (i, &slot) in slots.iter().enumerate() {
        velocities[slot] += factor(i) * offsets.velocity_offsets[i];
    }
    Ok(())
}

/// One pass of the event loop over `indices` of `block`.
#[allow(clippy::too_many_arguments)]
fn simulate_to_next_event(
    block: &mut ParticlesBlock,
    indices: ParticleIndices<'_>,
    durations: &[f32],
    end_time: f32,
    particle_type: &ParticleType,
    last_event_times: Option<&[f32]>,
    config: &EngineConfig,
    stats: &mut LoopStats,
    spawns: &mut Vec<SpawnRequest>,
) -> Result<Unfinished, StepError> {
    let mut particles = ParticleSet::new(block, indices);
    let offsets = ideal_offsets(&particles, durations, particle_type)?;
    let next_events = find_next_events(
        &particles,
        &offsets,
        durations,
        end_time,
        particle_type,
        last_event_times,
        config.retrigger_epsilon,
    )?;
    forward_to_next_event(&mut particles, &offsets, &next_events)?;

    // Set-local indices grouped by the event they hit.
    let mut per_event: SmallVec<[Vec<usize>; 4]> =
        (0..particle_type.events().len()).map(|_| Vec::new()).collect();
    for (i, next) in next_events.iter().enumerate() {
        if let Some(next) = next {
            per_event[next.event].push(i);
        }
    }

    for (binding, group) in particle_type.events().iter().zip(&per_event) {
        if group.is_empty() {
            continue;
        }
        let slots: Vec<usize> = group.iter().map(|&i| particles.particle_index(i)).collect();
        let remaining: Vec<f32> = group
            .iter()
            .map(|&i| remaining_duration(durations[i], next_events[i]))
            .collect();
        let current_times: Vec<f32> = remaining.iter().map(|r| end_time - r).collect();

        let action = binding.action();
        let hit = ParticleSet::from_list(particles.block_mut(), &slots);
        let mut interface = ActionInterface::new(hit, &current_times, &remaining, end_time);
        action
            .execute(&mut interface)
            .map_err(|e| StepError::behavior(action.name(), e))?;
        spawns.extend(
            interface
                .into_spawns()
                .into_iter()
                .map(|request| request.attributed_to(action.name())),
        );
        stats.actions_executed += 1;
    }

    let kill_states = particles.attributes().get_byte(KILL_STATE)?;
    let mut unfinished = Unfinished {
        slots: Vec::new(),
        remaining: Vec::new(),
        last_event_times: Vec::new(),
    };
    for (i, next) in next_events.iter().enumerate() {
        let slot = particles.particle_index(i);
        if next.is_some() && kill_states[slot] == 0 {
            let remaining = remaining_duration(durations[i], *next);
            unfinished.slots.push(slot);
            unfinished.remaining.push(remaining);
            unfinished.last_event_times.push(end_time - remaining);
        }
    }
    Ok(unfinished)
}

fn remaining_duration(duration: f32, next: Option<NextEvent>) -> f32 {
    next.map_or(0.0, |next| duration * (1.0 - next.time_factor))
}

/// Advance `indices` of `block` by their full `durations`, ignoring events.
pub fn simulate_ignoring_events(
    block: &mut ParticlesBlock,
    indices: ParticleIndices<'_>,
    durations: &[f32],
    particle_type: &ParticleType,
) -> Result<(), StepError> {
    let mut particles = ParticleSet::new(block, indices);
    let offsets = ideal_offsets(&particles, durations, particle_type)?;
    let slots: Vec<usize> = particles.indices().iter().collect();

    let mut attributes = particles.attributes_mut();
    let positions = attributes.get_float3_mut(POSITION)?;
    for (i, &slot) in slots.iter().enumerate() {
        positions[slot] += offsets.position_offsets[i];
    }
    let velocities = attributes.get_float3_mut(VELOCITY)?;
    for (i, &slot) in slots.iter().enumerate() {
        velocities[slot] += offsets.velocity_offsets[i];
    }
    Ok(())
}

/// Advance `indices` of `block` so that every particle reaches `end_time`.
///
/// `durations[i]` is the time left for the `i`-th particle. Particles an
/// action kills stop at their event. Particles that still hit events after
/// `config.max_events_per_tick` passes finish their interval without
/// further events. Spawn requests made by actions are appended to
/// `spawns` in the order the actions ran.
pub fn simulate_particles(
    block: &mut ParticlesBlock,
    indices: ParticleIndices<'_>,
    durations: &[f32],
    end_time: f32,
    particle_type: &ParticleType,
    config: &EngineConfig,
    spawns: &mut Vec<SpawnRequest>,
) -> Result<LoopStats, StepError> {
    assert_eq!(durations.len(), indices.len(), "durations must cover the particle set");
    let mut stats = LoopStats::default();

    if particle_type.events().is_empty() {
        simulate_ignoring_events(block, indices, durations, particle_type)?;
        return Ok(stats);
    }

    let mut unfinished = simulate_to_next_event(
        block,
        indices,
        durations,
        end_time,
        particle_type,
        None,
        config,
        &mut stats,
        spawns,
    )?;
    let mut passes = 1;

    while !unfinished.is_empty() && passes < config.max_events_per_tick {
        let next = simulate_to_next_event(
            block,
            ParticleIndices::List(&unfinished.slots),
            &unfinished.remaining,
            end_time,
            particle_type,
            Some(&unfinished.last_event_times),
            config,
            &mut stats,
            spawns,
        )?;
        unfinished = next;
        passes += 1;
        log::trace!(
            "event pass {passes}: {} particles still unfinished",
            unfinished.slots.len()
        );
    }

    if !unfinished.is_empty() {
        log::warn!(
            "event cap of {} reached with {} particles unfinished; integrating without events",
            config.max_events_per_tick,
            unfinished.slots.len()
        );
        stats.event_cap_hits += 1;
        simulate_ignoring_events(
            block,
            ParticleIndices::List(&unfinished.slots),
            &unfinished.remaining,
            particle_type,
        )?;
    }
    Ok(stats)
}
