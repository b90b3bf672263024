//! Property tests over randomly shaped particle populations.

use ember_behavior::{ParticleType, StepDescription};
use ember_core::{ParticleTypeId, Vec3, VELOCITY};
use ember_engine::{simulate_step, simulate_step_with_config, EngineConfig};
use ember_storage::ParticlesState;
use ember_test_utils::{fixtures, ConstantForce, RecordingAction, ScriptedEvent};
use proptest::prelude::*;

const MOTE: ParticleTypeId = ParticleTypeId(3);

fn spawn_rows(state: &mut ParticlesState, xs: &[f32]) {
    let positions: Vec<Vec3> = xs.iter().map(|&x| Vec3::new(x, 0.0, 0.0)).collect();
    fixtures::spawn(state, MOTE, &positions, &vec![Vec3::ZERO; xs.len()]);
}

fn sorted(mut values: Vec<f32>) -> Vec<f32> {
    values.sort_by(f32::total_cmp);
    values
}

proptest! {
    #[test]
    fn compaction_keeps_exactly_the_survivors(
        xs in prop::collection::vec(0.0f32..1.0, 0..200),
        threshold in 0.0f32..1.0,
        block_size in 1usize..17,
    ) {
        let mut state = fixtures::state_with_type(MOTE, block_size);
        spawn_rows(&mut state, &xs);
        let description = StepDescription::builder(1.0)
            .particle_type(
                MOTE,
                ParticleType::builder()
                    .event(ScriptedEvent::new(0.25).only_below_x(threshold), RecordingAction::killing())
                    .build(),
            )
            .build()
            .unwrap();

        let metrics = simulate_step(&mut state, &description).unwrap();

        let expected: Vec<f32> = xs.iter().copied().filter(|&x| x >= threshold).collect();
        prop_assert_eq!(metrics.particles_stepped, xs.len());
        prop_assert_eq!(metrics.particles_killed, xs.len() - expected.len());
        prop_assert_eq!(state.particle_count(), expected.len());

        let container = state.container(MOTE).unwrap();
        prop_assert!(container.active_blocks().iter().all(|b| !b.is_empty()));
        prop_assert_eq!(container.block_count(), expected.len().div_ceil(block_size));

        let survivors: Vec<f32> = fixtures::positions(&state, MOTE).iter().map(|p| p.x).collect();
        prop_assert_eq!(sorted(survivors), sorted(expected));
    }

    #[test]
    fn survivors_cover_the_whole_tick(
        count in 1usize..40,
        velocity in -5.0f32..5.0,
        time_factor in 0.0f32..1.0,
        duration in 0.01f32..2.0,
        cap in 1usize..12,
    ) {
        let config = EngineConfig { max_events_per_tick: cap, ..EngineConfig::default() };
        let mut state = fixtures::state_with_type(MOTE, 8);
        let positions = vec![Vec3::ZERO; count];
        fixtures::spawn(&mut state, MOTE, &positions, &vec![Vec3::new(velocity, 0.0, 0.0); count]);
        let description = StepDescription::builder(duration)
            .particle_type(
                MOTE,
                ParticleType::builder()
                    .event(ScriptedEvent::new(time_factor), RecordingAction::new())
                    .build(),
            )
            .build()
            .unwrap();

        simulate_step_with_config(&mut state, &description, &config).unwrap();

        let expected = velocity * duration;
        for p in fixtures::positions(&state, MOTE) {
            prop_assert!((p.x - expected).abs() <= 1e-4 * (1.0 + expected.abs()), "{} vs {}", p.x, expected);
        }
    }

    #[test]
    fn one_tick_is_reproducible(
        xs in prop::collection::vec(-10.0f32..10.0, 1..64),
        force in prop::array::uniform3(-20.0f32..20.0),
        block_size in 1usize..9,
    ) {
        let description = StepDescription::builder(0.3)
            .particle_type(
                MOTE,
                ParticleType::builder()
                    .force(ConstantForce::new(Vec3::from_array(force)))
                    .event(ScriptedEvent::new(0.4).only_below_x(0.0), RecordingAction::reversing())
                    .build(),
            )
            .build()
            .unwrap();
        let run = || {
            let mut state = fixtures::state_with_type(MOTE, block_size);
            spawn_rows(&mut state, &xs);
            simulate_step(&mut state, &description).unwrap();
            (
                fixtures::positions(&state, MOTE),
                fixtures::float3_values(&state, MOTE, VELOCITY),
            )
        };
        prop_assert_eq!(run(), run());
    }
}
