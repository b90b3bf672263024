//! Running emitters and moving their new particles to the end of the tick.

use ember_behavior::{EmitTarget, EmitterInterface, ParticleIndices, SpawnRequest, StepDescription};
use ember_core::{TimeSpan, BIRTH_TIME};
use ember_storage::ParticlesState;

use crate::config::EngineConfig;
use crate::error::StepError;
use crate::simulate::{simulate_particles, LoopStats};

/// Counters for one emission phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmissionStats {
    /// Particles created.
    pub particles_emitted: usize,
    /// Counters from moving the new particles.
    pub loop_stats: LoopStats,
}

/// Run every emitter of `description` in order.
///
/// After each emitter, its new particles get a birth time inside
/// `time_span` and are moved from that time to the end of the span,
/// events included. Requests from actions fired on the new particles are
/// appended to `spawns`.
pub fn emit_particles(
    state: &mut ParticlesState,
    description: &StepDescription,
    time_span: TimeSpan,
    config: &EngineConfig,
    spawns: &mut Vec<SpawnRequest>,
) -> Result<EmissionStats, StepError> {
    let mut stats = EmissionStats::default();
    for emitter in description.emitters() {
        let mut interface = EmitterInterface::new(state.allocator(), time_span);
        emitter
            .emit(&mut interface)
            .map_err(|e| StepError::behavior(emitter.name(), e))?;
        let targets = interface.into_targets();

        for target in &targets {
            stats.particles_emitted += target.size();
            let loop_stats = simulate_target(state, description, target, time_span, config, spawns)?;
            stats.loop_stats = stats.loop_stats.merge(loop_stats);
        }
    }
    Ok(stats)
}

fn simulate_target(
    state: &mut ParticlesState,
    description: &StepDescription,
    target: &EmitTarget,
    time_span: TimeSpan,
    config: &EngineConfig,
    spawns: &mut Vec<SpawnRequest>,
) -> Result<LoopStats, StepError> {
    let particle_type = description
        .particle_type(target.particle_type())
        .ok_or(StepError::UnknownParticleType {
            particle_type: target.particle_type(),
        })?
        .particle_type();
    let container = state.try_container_mut(target.particle_type())?;
    let end_time = time_span.end();

    let mut stats = LoopStats::default();
    let mut offset = 0;
    for part in target.parts() {
        let len = part.len();
        let moments = &target.birth_moments()[offset..offset + len];
        offset += len;

        let birth_times: Vec<f32> = moments.iter().map(|&m| time_span.interpolate(m)).collect();
        let durations: Vec<f32> = birth_times.iter().map(|&t| end_time - t).collect();

        let block = container.block_mut(part.block);
        block.attributes_mut().get_float_mut(BIRTH_TIME)?[part.range.clone()]
            .copy_from_slice(&birth_times);

        let part_stats = simulate_particles(
            block,
            ParticleIndices::Range(part.range.clone()),
            &durations,
            end_time,
            particle_type,
            config,
            spawns,
        )?;
        stats = stats.merge(part_stats);
    }
    Ok(stats)
}
