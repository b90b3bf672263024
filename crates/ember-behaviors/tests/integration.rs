//! Reference behaviors driven through the full stepping engine.

use ember_behavior::{ParticleType, StepDescription};
use ember_behaviors::{
    AgeReachedEvent, BehaviorParams, BehaviorRegistry, BounceAction, GravityForce, KillAction,
    PlaneCollisionEvent, PointEmitter,
};
use ember_core::{ParticleTypeId, Vec3, VELOCITY};
use ember_engine::{simulate_step, EngineConfig, Simulation};
use ember_storage::{ParticlesState, StorageConfig};
use ember_test_utils::fixtures;

const SPARK: ParticleTypeId = ParticleTypeId(0);

#[test]
fn bounce_reflects_mid_tick() {
    let mut state = fixtures::state_with_type(SPARK, 8);
    fixtures::spawn(
        &mut state,
        SPARK,
        &[Vec3::new(0.0, 0.0, 1.0)],
        &[Vec3::new(0.0, 0.0, -4.0)],
    );
    let description = StepDescription::builder(1.0)
        .particle_type(
            SPARK,
            ParticleType::builder()
                .event(
                    PlaneCollisionEvent::new(Vec3::ZERO, Vec3::Z).unwrap(),
                    BounceAction::new(Vec3::Z, 0.0).unwrap(),
                )
                .build(),
        )
        .build()
        .unwrap();

    let metrics = simulate_step(&mut state, &description).unwrap();

    assert_eq!(metrics.actions_executed, 1);
    assert_eq!(fixtures::positions(&state, SPARK), vec![Vec3::new(0.0, 0.0, 3.0)]);
    assert_eq!(
        fixtures::float3_values(&state, SPARK, VELOCITY),
        vec![Vec3::new(0.0, 0.0, 4.0)]
    );
}

fn fountain(seed: u64) -> StepDescription {
    StepDescription::builder(0.1)
        .particle_type(
            SPARK,
            ParticleType::builder()
                .force(GravityForce::new(Vec3::new(0.0, 0.0, -10.0)))
                .event(AgeReachedEvent::new(0.5).unwrap(), KillAction)
                .build(),
        )
        .emitter(
            PointEmitter::builder()
                .particle_type(SPARK)
                .velocity(Vec3::new(0.0, 0.0, 5.0))
                .rate(10.0)
                .spread(0.5)
                .seed(seed)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[test]
fn fountain_reaches_steady_population() {
    let mut state = ParticlesState::new(StorageConfig::new(4)).unwrap();
    let description = fountain(1);
    let mut emitted = 0;
    let mut killed = 0;
    for _ in 0..20 {
        let metrics = simulate_step(&mut state, &description).unwrap();
        emitted += metrics.particles_emitted;
        killed += metrics.particles_killed;
    }
    // One birth per tick; each particle dies five ticks after its birth.
    assert_eq!(emitted, 20);
    assert_eq!(killed, 15);
    assert_eq!(state.particle_count(), 5);
}

#[test]
fn fountain_is_deterministic() {
    let run = |seed: u64| {
        let mut sim = Simulation::new(EngineConfig {
            storage: StorageConfig::new(4),
            worker_threads: Some(2),
            ..EngineConfig::default()
        })
        .unwrap();
        let description = fountain(seed);
        for _ in 0..12 {
            sim.step(&description).unwrap();
        }
        fixtures::positions(sim.state(), SPARK)
    };
    assert_eq!(run(9), run(9));
    assert_ne!(run(9), run(10));
}

#[test]
fn registry_builds_a_working_particle_type() {
    let registry = BehaviorRegistry::with_defaults();
    let particle_type = ParticleType::builder()
        .boxed_force(
            registry
                .build_force("gravity", &BehaviorParams::new().with("strength", Vec3::new(0.0, -2.0, 0.0)))
                .unwrap(),
        )
        .boxed_event(
            registry
                .build_event(
                    "plane_collision",
                    &BehaviorParams::new().with("normal", Vec3::Y).with("point", Vec3::new(0.0, -100.0, 0.0)),
                )
                .unwrap(),
            registry.build_action("kill", &BehaviorParams::new()).unwrap(),
        )
        .build();
    let description = StepDescription::builder(1.0)
        .particle_type(SPARK, particle_type)
        .boxed_emitter(
            registry
                .build_emitter(
                    "point",
                    &BehaviorParams::new().with("particle_type", 0i64).with("rate", 3.0f32),
                )
                .unwrap(),
        )
        .build()
        .unwrap();

    let mut state = ParticlesState::new(StorageConfig::new(16)).unwrap();
    simulate_step(&mut state, &description).unwrap();
    let metrics = simulate_step(&mut state, &description).unwrap();

    assert_eq!(metrics.particles_emitted, 3);
    assert_eq!(metrics.particles_killed, 0);
    assert_eq!(state.particle_count(), 6);
    // Everything is falling but nothing has reached the kill plane yet.
    let positions = fixtures::positions(&state, SPARK);
    assert!(positions.iter().all(|p| p.y < 0.0 && p.y > -100.0));
}
