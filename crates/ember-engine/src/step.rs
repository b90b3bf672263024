//! The per-tick orchestrator and the [`Simulation`] host wrapper.

use std::time::Instant;

use rayon::ThreadPool;

use ember_behavior::StepDescription;
use ember_core::TimeSpan;
use ember_storage::ParticlesState;

use crate::config::{ConfigError, EngineConfig};
use crate::dispatch::step_blocks;
use crate::emission::emit_particles;
use crate::error::StepError;
use crate::metrics::StepMetrics;
use crate::spawn::commit_spawns;

// ── simulate_step ──────────────────────────────────────────────────

/// Advance `state` by one tick of `description` with default settings.
pub fn simulate_step(
    state: &mut ParticlesState,
    description: &StepDescription,
) -> Result<StepMetrics, StepError> {
    simulate_step_with_config(state, description, &EngineConfig::default())
}

/// Advance `state` by one tick of `description`.
///
/// Order of work:
///
/// 1. Move the current time to the end of the tick.
/// 2. Create missing containers and bring every container's schema up to
///    date with its particle type.
/// 3. Step existing particles of each type, blocks in parallel.
/// 4. Run emitters in order and step their new particles.
/// 5. Allocate the particles actions requested during 3 and 4, and step
///    them from their birth times.
/// 6. Delete killed particles and compact blocks.
///
/// On error the state is left as far as the tick got.
pub fn simulate_step_with_config(
    state: &mut ParticlesState,
    description: &StepDescription,
    config: &EngineConfig,
) -> Result<StepMetrics, StepError> {
    run_step(state, description, config, None)
}

fn run_step(
    state: &mut ParticlesState,
    description: &StepDescription,
    config: &EngineConfig,
    pool: Option<&ThreadPool>,
) -> Result<StepMetrics, StepError> {
    let tick_start = Instant::now();
    let mut metrics = StepMetrics::default();

    let time_span = TimeSpan::new(state.current_time(), description.duration());
    state.set_current_time(time_span.end());

    for (id, type_description) in description.types() {
        state
            .ensure_container(id)
            .update_attributes(type_description.attributes().clone());
    }

    let mut spawns = Vec::new();
    for (id, type_description) in description.types() {
        let step_start = Instant::now();
        let container = state.try_container_mut(id)?;
        metrics.particles_stepped += container.count_active();
        let (stats, requested) = step_blocks(
            container,
            type_description.particle_type(),
            time_span.duration(),
            time_span.end(),
            config,
            pool,
        )?;
        spawns.extend(requested);
        metrics.actions_executed += stats.actions_executed;
        metrics.event_cap_hits += stats.event_cap_hits;
        metrics
            .step_us
            .insert(id, step_start.elapsed().as_micros() as u64);
    }

    let emission_start = Instant::now();
    let emission = emit_particles(state, description, time_span, config, &mut spawns)?;
    metrics.particles_emitted = emission.particles_emitted;
    metrics.actions_executed += emission.loop_stats.actions_executed;
    metrics.event_cap_hits += emission.loop_stats.event_cap_hits;
    metrics.emission_us = emission_start.elapsed().as_micros() as u64;

    let spawn_start = Instant::now();
    let spawned = commit_spawns(state, description, spawns, time_span.end(), config)?;
    metrics.particles_spawned = spawned.particles_spawned;
    metrics.actions_executed += spawned.loop_stats.actions_executed;
    metrics.event_cap_hits += spawned.loop_stats.event_cap_hits;
    metrics.spawn_us = spawn_start.elapsed().as_micros() as u64;

    let compaction_start = Instant::now();
    for (id, _) in description.types() {
        let container = state.try_container_mut(id)?;
        metrics.particles_killed += container.delete_killed()?;
    }
    for (id, _) in description.types() {
        metrics.blocks_released += state.try_container_mut(id)?.compress();
    }
    metrics.compaction_us = compaction_start.elapsed().as_micros() as u64;

    metrics.active_particles = state.particle_count();
    metrics.total_us = tick_start.elapsed().as_micros() as u64;

    log::debug!(
        "tick to t={}: stepped {}, emitted {}, spawned {}, killed {}, released {} blocks, {} active",
        time_span.end(),
        metrics.particles_stepped,
        metrics.particles_emitted,
        metrics.particles_spawned,
        metrics.particles_killed,
        metrics.blocks_released,
        metrics.active_particles
    );
    Ok(metrics)
}

// ── Simulation ─────────────────────────────────────────────────────

/// Owns a particle state and steps it with a fixed configuration.
///
/// Builds a dedicated worker pool when
/// [`EngineConfig::worker_threads`] is set; otherwise blocks are stepped
/// on rayon's global pool.
pub struct Simulation {
    state: ParticlesState,
    config: EngineConfig,
    pool: Option<ThreadPool>,
    tick_count: u64,
    last_metrics: StepMetrics,
}

impl Simulation {
    /// Validate `config` and create an empty simulation at time 0.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = ParticlesState::new(config.storage.clone())?;
        let pool = match config.worker_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("ember-worker-{i}"))
                    .build()
                    .map_err(|e| ConfigError::ThreadPoolFailed {
                        reason: e.to_string(),
                    })?,
            ),
            None => None,
        };
        log::debug!(
            "simulation created: block size {}, event cap {}, workers {:?}",
            config.storage.block_size,
            config.max_events_per_tick,
            config.worker_threads
        );
        Ok(Self {
            state,
            config,
            pool,
            tick_count: 0,
            last_metrics: StepMetrics::default(),
        })
    }

    /// Advance one tick.
    pub fn step(&mut self, description: &StepDescription) -> Result<&StepMetrics, StepError> {
        let metrics = run_step(&mut self.state, description, &self.config, self.pool.as_ref())?;
        self.tick_count += 1;
        self.last_metrics = metrics;
        Ok(&self.last_metrics)
    }

    /// The particle state.
    pub fn state(&self) -> &ParticlesState {
        &self.state
    }

    /// The particle state, mutably.
    pub fn state_mut(&mut self) -> &mut ParticlesState {
        &mut self.state
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Simulation time reached by the last tick.
    pub fn current_time(&self) -> f32 {
        self.state.current_time()
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Metrics of the most recent successful tick.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Live particles across all types.
    pub fn particle_count(&self) -> usize {
        self.state.particle_count()
    }

    /// Drop every particle and rewind to time 0.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.state = ParticlesState::new(self.config.storage.clone())?;
        self.tick_count = 0;
        self.last_metrics = StepMetrics::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_behavior::ParticleType;
    use ember_core::{ParticleTypeId, Vec3};
    use ember_storage::StorageConfig;
    use ember_test_utils::{fixtures, FixedEmitter, RecordingAction, ScriptedEvent};

    const TYPE: ParticleTypeId = ParticleTypeId(0);

    fn emitting_description(count: usize) -> StepDescription {
        StepDescription::builder(0.5)
            .particle_type(TYPE, ParticleType::builder().build())
            .emitter(FixedEmitter::new(TYPE, vec![Vec3::ZERO; count]))
            .build()
            .unwrap()
    }

    #[test]
    fn step_advances_time_and_creates_container() {
        let mut state = ParticlesState::new(StorageConfig::new(4)).unwrap();
        let description = emitting_description(3);
        let metrics = simulate_step(&mut state, &description).unwrap();
        assert_eq!(state.current_time(), 0.5);
        assert_eq!(metrics.particles_emitted, 3);
        assert_eq!(metrics.active_particles, 3);
        assert!(metrics.step_us.contains_key(&TYPE));
        assert!(state.container(TYPE).is_some());
    }

    #[test]
    fn killed_particles_are_removed_and_blocks_released() {
        let mut state = fixtures::state_with_type(TYPE, 2);
        fixtures::spawn(&mut state, TYPE, &[Vec3::ZERO; 6], &[Vec3::ZERO; 6]);
        let description = StepDescription::builder(1.0)
            .particle_type(
                TYPE,
                ParticleType::builder()
                    .event(ScriptedEvent::new(0.5).only_below_x(0.5), RecordingAction::killing())
                    .build(),
            )
            .build()
            .unwrap();
        let metrics = simulate_step(&mut state, &description).unwrap();
        assert_eq!(metrics.particles_stepped, 6);
        assert_eq!(metrics.particles_killed, 6);
        assert_eq!(metrics.blocks_released, 3);
        assert_eq!(state.particle_count(), 0);
    }

    #[test]
    fn simulation_counts_ticks() {
        let mut sim = Simulation::new(EngineConfig {
            storage: StorageConfig::new(8),
            worker_threads: Some(2),
            ..EngineConfig::default()
        })
        .unwrap();
        let description = emitting_description(2);
        sim.step(&description).unwrap();
        let metrics = sim.step(&description).unwrap();
        assert_eq!(metrics.particles_stepped, 2);
        assert_eq!(sim.tick_count(), 2);
        assert_eq!(sim.particle_count(), 4);
        assert_eq!(sim.current_time(), 1.0);

        sim.reset().unwrap();
        assert_eq!(sim.particle_count(), 0);
        assert_eq!(sim.current_time(), 0.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Simulation::new(EngineConfig {
            max_events_per_tick: 0,
            ..EngineConfig::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidEventCap)));
    }
}
