//! Benchmark profiles and utilities for the Ember particle engine.
//!
//! Provides pre-built [`StepDescription`] profiles and deterministic
//! populations for benchmarking:
//!
//! - [`ballistic_profile`]: gravity and drag, no events
//! - [`reference_profile`]: a fountain with bounce and lifetime events
//! - [`populate`]: seeded random particles for a fresh state

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ember_behavior::{ParticleType, StepDescription};
use ember_behaviors::{
    AgeReachedEvent, BounceAction, DragForce, GravityForce, KillAction, PlaneCollisionEvent,
    PointEmitter,
};
use ember_core::{ParticleTypeId, Vec3, POSITION, VELOCITY};
use ember_storage::{ParticlesState, StorageConfig, StorageError};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// The single particle type every profile uses.
pub const SPARK: ParticleTypeId = ParticleTypeId(0);

/// Tick duration shared by the profiles (60 Hz).
pub const TICK: f32 = 1.0 / 60.0;

/// Gravity and drag only: every tick is pure integration.
pub fn ballistic_profile() -> StepDescription {
    StepDescription::builder(TICK)
        .particle_type(
            SPARK,
            ParticleType::builder()
                .force(GravityForce::default())
                .force(DragForce::new(0.05).unwrap())
                .build(),
        )
        .build()
        .unwrap()
}

/// A fountain emitting `rate` particles per second that bounce off the
/// ground and die after four seconds.
pub fn reference_profile(rate: f32, seed: u64) -> StepDescription {
    StepDescription::builder(TICK)
        .particle_type(
            SPARK,
            ParticleType::builder()
                .force(GravityForce::default())
                .force(DragForce::new(0.05).unwrap())
                .event(
                    PlaneCollisionEvent::new(Vec3::ZERO, Vec3::Z).unwrap(),
                    BounceAction::new(Vec3::Z, 0.3).unwrap(),
                )
                .event(AgeReachedEvent::new(4.0).unwrap(), KillAction)
                .build(),
        )
        .emitter(
            PointEmitter::builder()
                .particle_type(SPARK)
                .position(Vec3::new(0.0, 0.0, 0.5))
                .velocity(Vec3::new(0.0, 0.0, 8.0))
                .rate(rate)
                .spread(2.0)
                .seed(seed)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

/// A state holding `count` particles of [`SPARK`] above the ground plane
/// with random velocities, laid out in blocks of `block_size`.
///
/// The same `seed` always yields the same population.
pub fn populate(
    description: &StepDescription,
    count: usize,
    block_size: usize,
    seed: u64,
) -> Result<ParticlesState, StorageError> {
    let mut state = ParticlesState::new(StorageConfig::new(block_size))?;
    if let Some(spark) = description.particle_type(SPARK) {
        state
            .ensure_container(SPARK)
            .update_attributes(spark.attributes().clone());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let parts = state.allocator().allocate(SPARK, count)?;
    let container = state.try_container_mut(SPARK)?;
    for part in parts {
        let mut attributes = container.block_mut(part.block).attributes_mut();
        for slot in part.range.clone() {
            attributes.get_float3_mut(POSITION)?[slot] = Vec3::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(0.1..20.0),
            );
        }
        for slot in part.range {
            attributes.get_float3_mut(VELOCITY)?[slot] = Vec3::new(
                rng.random_range(-3.0..3.0),
                rng.random_range(-3.0..3.0),
                rng.random_range(-5.0..5.0),
            );
        }
    }
    Ok(state)
}
