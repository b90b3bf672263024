//! Per-tick metrics for the simulation engine.
//!
//! [`StepMetrics`] captures timing and particle counts for a single tick.

use indexmap::IndexMap;

use ember_core::ParticleTypeId;

/// Timing and population metrics collected during a single tick.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire tick.
    pub total_us: u64,
    /// Time spent moving existing particles, per particle type.
    pub step_us: IndexMap<ParticleTypeId, u64>,
    /// Time spent running emitters and moving the new particles.
    pub emission_us: u64,
    /// Time spent allocating and moving action-spawned particles.
    pub spawn_us: u64,
    /// Time spent deleting killed particles and compacting blocks.
    pub compaction_us: u64,
    /// Existing particles advanced this tick.
    pub particles_stepped: usize,
    /// Particles created by emitters this tick.
    pub particles_emitted: usize,
    /// Particles requested by actions this tick.
    pub particles_spawned: usize,
    /// Particles removed because their kill state was set.
    pub particles_killed: usize,
    /// Blocks released by compaction.
    pub blocks_released: usize,
    /// Action invocations across all particle sets.
    pub actions_executed: usize,
    /// Particle sets whose events were cut off by the event cap.
    pub event_cap_hits: usize,
    /// Live particles after the tick.
    pub active_particles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert!(m.step_us.is_empty());
        assert_eq!(m.emission_us, 0);
        assert_eq!(m.spawn_us, 0);
        assert_eq!(m.compaction_us, 0);
        assert_eq!(m.particles_stepped, 0);
        assert_eq!(m.particles_emitted, 0);
        assert_eq!(m.particles_spawned, 0);
        assert_eq!(m.particles_killed, 0);
        assert_eq!(m.blocks_released, 0);
        assert_eq!(m.actions_executed, 0);
        assert_eq!(m.event_cap_hits, 0);
        assert_eq!(m.active_particles, 0);
    }
}
