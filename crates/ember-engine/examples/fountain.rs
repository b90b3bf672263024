//! A bouncing fountain: sparks launched upward fall under gravity, bounce
//! off the ground plane, and die after two seconds.
//!
//! Run with `RUST_LOG=debug` to see per-tick summaries.

use std::error::Error;

use ember_behavior::{ParticleType, StepDescription};
use ember_behaviors::{
    AgeReachedEvent, BounceAction, DragForce, GravityForce, KillAction, PlaneCollisionEvent,
    PointEmitter,
};
use ember_core::{ParticleTypeId, Vec3};
use ember_engine::{EngineConfig, Simulation};
use ember_storage::StorageConfig;

const SPARK: ParticleTypeId = ParticleTypeId(0);

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let spark = ParticleType::builder()
        .force(GravityForce::default())
        .force(DragForce::new(0.1)?)
        .event(
            PlaneCollisionEvent::new(Vec3::ZERO, Vec3::Z)?,
            BounceAction::new(Vec3::Z, 0.4)?,
        )
        .event(AgeReachedEvent::new(2.0)?, KillAction)
        .build();
    let description = StepDescription::builder(1.0 / 60.0)
        .particle_type(SPARK, spark)
        .emitter(
            PointEmitter::builder()
                .particle_type(SPARK)
                .position(Vec3::new(0.0, 0.0, 0.5))
                .velocity(Vec3::new(0.0, 0.0, 6.0))
                .rate(600.0)
                .spread(1.5)
                .seed(42)
                .build()?,
        )
        .build()?;

    let mut sim = Simulation::new(EngineConfig {
        storage: StorageConfig::new(256),
        ..EngineConfig::default()
    })?;

    for _ in 0..300 {
        let metrics = sim.step(&description)?.clone();
        if sim.tick_count() % 60 == 0 {
            log::info!(
                "t={:.2}s: {} sparks in {} blocks, {} actions, tick took {}us",
                sim.current_time(),
                metrics.active_particles,
                sim.state().container(SPARK).map_or(0, |c| c.block_count()),
                metrics.actions_executed,
                metrics.total_us
            );
        }
    }
    Ok(())
}
