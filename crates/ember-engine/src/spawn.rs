//! Allocating the particles actions requested and moving them to the end
//! of the tick.

use ember_behavior::{ParticleIndices, SpawnRequest, StepDescription};
use ember_core::{BehaviorError, BIRTH_TIME};
use ember_storage::ParticlesState;

use crate::config::EngineConfig;
use crate::error::StepError;
use crate::simulate::{simulate_ignoring_events, simulate_particles, LoopStats};

/// Counters for one spawn phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnStats {
    /// Particles allocated for spawn requests.
    pub particles_spawned: usize,
    /// Rounds of requests committed. Requests made while stepping one
    /// round's particles form the next round.
    pub generations: usize,
    /// Counters from moving the new particles.
    pub loop_stats: LoopStats,
}

/// Allocate every request in order and move each new particle from its
/// birth time to `end_time`.
///
/// Runs sequentially, after the parallel block phase. Actions fired on the
/// new particles may request more; those are committed as the next
/// generation. Generations past `config.max_spawn_generations` are still
/// allocated but move without events.
pub fn commit_spawns(
    state: &mut ParticlesState,
    description: &StepDescription,
    requests: Vec<SpawnRequest>,
    end_time: f32,
    config: &EngineConfig,
) -> Result<SpawnStats, StepError> {
    let mut stats = SpawnStats::default();
    let mut pending = requests;

    while !pending.is_empty() {
        stats.generations += 1;
        let with_events = stats.generations <= config.max_spawn_generations;
        if !with_events {
            log::warn!(
                "spawn generation limit of {} reached; {} requests move without events",
                config.max_spawn_generations,
                pending.len()
            );
        }

        let mut next = Vec::new();
        for request in &pending {
            stats.particles_spawned += request.size();
            let loop_stats =
                commit_request(state, description, request, end_time, with_events, config, &mut next)?;
            stats.loop_stats = stats.loop_stats.merge(loop_stats);
        }
        log::trace!(
            "spawn generation {}: {} requests committed, {} new",
            stats.generations,
            pending.len(),
            next.len()
        );
        pending = next;
    }
    Ok(stats)
}

fn commit_request(
    state: &mut ParticlesState,
    description: &StepDescription,
    request: &SpawnRequest,
    end_time: f32,
    with_events: bool,
    config: &EngineConfig,
    spawns: &mut Vec<SpawnRequest>,
) -> Result<LoopStats, StepError> {
    let particle_type = description
        .particle_type(request.particle_type())
        .ok_or(StepError::UnknownParticleType {
            particle_type: request.particle_type(),
        })?
        .particle_type();
    let parts = state
        .allocator()
        .allocate(request.particle_type(), request.size())?;
    let container = state.try_container_mut(request.particle_type())?;

    let mut stats = LoopStats::default();
    let mut offset = 0;
    for part in &parts {
        let src = offset..offset + part.len();
        offset += part.len();
        let birth_times = &request.birth_times()[src.clone()];
        let durations: Vec<f32> = birth_times.iter().map(|&t| (end_time - t).max(0.0)).collect();

        let block = container.block_mut(part.block);
        {
            let mut attributes = block.attributes_mut();
            request
                .write_into(&mut attributes, part.range.clone(), src)
                .map_err(|e| StepError::behavior(request.source(), BehaviorError::from(e)))?;
            attributes.get_float_mut(BIRTH_TIME)?[part.range.clone()].copy_from_slice(birth_times);
        }

        let indices = ParticleIndices::Range(part.range.clone());
        if with_events {
            let part_stats =
                simulate_particles(block, indices, &durations, end_time, particle_type, config, spawns)?;
            stats = stats.merge(part_stats);
        } else {
            simulate_ignoring_events(block, indices, &durations, particle_type)?;
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_behavior::ParticleType;
    use ember_core::{ParticleTypeId, Vec3, VELOCITY};
    use ember_test_utils::{fixtures, ScriptedEvent, SpawningAction};

    const TYPE: ParticleTypeId = ParticleTypeId(0);

    fn request(amount: usize, birth_time: f32, velocity: Vec3) -> SpawnRequest {
        let mut request = SpawnRequest::new(TYPE, amount, birth_time).attributed_to("test");
        request.writer().fill_float3(VELOCITY, velocity);
        request
    }

    fn plain_description() -> StepDescription {
        StepDescription::builder(1.0)
            .particle_type(TYPE, ParticleType::builder().build())
            .build()
            .unwrap()
    }

    #[test]
    fn requests_move_from_birth_to_end() {
        let mut state = fixtures::state_with_type(TYPE, 2);
        let stats = commit_spawns(
            &mut state,
            &plain_description(),
            vec![request(3, 0.5, Vec3::X), request(1, 1.0, Vec3::X)],
            1.0,
            &EngineConfig::default(),
        )
        .unwrap();

        assert_eq!(stats.particles_spawned, 4);
        assert_eq!(stats.generations, 1);
        assert_eq!(state.container(TYPE).unwrap().block_count(), 2);
        assert_eq!(fixtures::float_values(&state, TYPE, BIRTH_TIME), vec![0.5, 0.5, 0.5, 1.0]);
        assert_eq!(
            fixtures::positions(&state, TYPE),
            vec![
                Vec3::new(0.5, 0.0, 0.0),
                Vec3::new(0.5, 0.0, 0.0),
                Vec3::new(0.5, 0.0, 0.0),
                Vec3::ZERO
            ]
        );
    }

    #[test]
    fn undescribed_type_fails() {
        let mut state = fixtures::state_with_type(TYPE, 4);
        let stray = SpawnRequest::new(ParticleTypeId(8), 1, 0.0);
        let err = commit_spawns(&mut state, &plain_description(), vec![stray], 1.0, &EngineConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            StepError::UnknownParticleType {
                particle_type: ParticleTypeId(8)
            }
        );
    }

    #[test]
    fn undeclared_attribute_names_the_requester() {
        let mut state = fixtures::state_with_type(TYPE, 4);
        let mut bad = SpawnRequest::new(TYPE, 1, 0.0).attributed_to("splitter");
        bad.writer().fill_float("Heat", 1.0);
        let err = commit_spawns(&mut state, &plain_description(), vec![bad], 1.0, &EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, StepError::Behavior { ref name, .. } if name == "splitter"));
    }

    #[test]
    fn generation_limit_stops_chain_reactions() {
        let mut state = fixtures::state_with_type(TYPE, 16);
        // Every particle splits into one child at its own position, forever.
        let description = StepDescription::builder(1.0)
            .particle_type(
                TYPE,
                ParticleType::builder()
                    .event(
                        ScriptedEvent::new(0.5),
                        SpawningAction::new(TYPE, vec![Vec3::ZERO]).killing_parent(),
                    )
                    .build(),
            )
            .build()
            .unwrap();
        let config = EngineConfig {
            max_spawn_generations: 2,
            ..EngineConfig::default()
        };
        let stats = commit_spawns(&mut state, &description, vec![request(1, 0.0, Vec3::X)], 1.0, &config)
            .unwrap();

        // Two generations split, the third moves freely.
        assert_eq!(stats.generations, 3);
        assert_eq!(stats.particles_spawned, 3);
        assert_eq!(stats.loop_stats.actions_executed, 2);
        assert_eq!(state.container(TYPE).unwrap().count_active(), 3);
        assert_eq!(fixtures::float_values(&state, TYPE, BIRTH_TIME), vec![0.0, 0.5, 0.75]);
        assert_eq!(fixtures::positions(&state, TYPE), vec![Vec3::new(0.5, 0.0, 0.0); 3]);
    }
}
