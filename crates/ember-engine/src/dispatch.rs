//! Parallel stepping of every block of one particle type.

use rayon::prelude::*;
use rayon::ThreadPool;

use ember_behavior::{ParticleIndices, ParticleType, SpawnRequest};
use ember_storage::ParticlesContainer;

use crate::config::EngineConfig;
use crate::error::StepError;
use crate::simulate::{simulate_particles, LoopStats};

/// Advance every live particle of `container` by `duration`, ending at
/// `end_time`.
///
/// Blocks are independent: each worker gets one block exclusively. One
/// duration buffer sized to the fullest block is shared read-only and
/// sliced per block. Each block collects its own spawn requests; they are
/// returned concatenated in block order. The first behavior error aborts
/// the remaining work.
pub fn step_blocks(
    container: &mut ParticlesContainer,
    particle_type: &ParticleType,
    duration: f32,
    end_time: f32,
    config: &EngineConfig,
    pool: Option<&ThreadPool>,
) -> Result<(LoopStats, Vec<SpawnRequest>), StepError> {
    let durations = vec![duration; container.max_active_amount()];
    let blocks = container.active_blocks_mut();
    log::trace!("stepping {} blocks", blocks.len());

    let mut run = move || {
        blocks
            .into_par_iter()
            .filter(|block| !block.is_empty())
            .map(|block| {
                let active = block.active_amount();
                let mut spawns = Vec::new();
                let stats = simulate_particles(
                    block,
                    ParticleIndices::Range(0..active),
                    &durations[..active],
                    end_time,
                    particle_type,
                    config,
                    &mut spawns,
                )?;
                Ok::<_, StepError>((stats, spawns))
            })
            .try_reduce(
                || (LoopStats::default(), Vec::new()),
                |(a, mut spawns), (b, more)| {
                    spawns.extend(more);
                    Ok((a.merge(b), spawns))
                },
            )
    };

    match pool {
        Some(pool) => pool.install(run),
        None => run(),
    }
}
