//! Criterion benchmarks for whole-tick stepping.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ember_bench::{ballistic_profile, populate, reference_profile};
use ember_engine::{simulate_step, EngineConfig, Simulation};
use ember_storage::StorageConfig;

fn bench_ballistic(c: &mut Criterion) {
    let description = ballistic_profile();
    let mut group = c.benchmark_group("ballistic_tick");
    for count in [10_000usize, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut state = populate(&description, count, 1000, 42).unwrap();
            b.iter(|| {
                let metrics = simulate_step(&mut state, &description).unwrap();
                black_box(metrics);
            });
        });
    }
    group.finish();
}

fn bench_events(c: &mut Criterion) {
    let description = reference_profile(0.0, 42);
    c.bench_function("event_tick_10k", |b| {
        let mut state = populate(&description, 10_000, 1000, 42).unwrap();
        b.iter(|| {
            let metrics = simulate_step(&mut state, &description).unwrap();
            black_box(metrics);
        });
    });
}

fn bench_fountain_workers(c: &mut Criterion) {
    let description = reference_profile(6_000.0, 42);
    let mut group = c.benchmark_group("fountain_240_ticks");
    group.sample_size(10);
    for threads in [1usize, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let mut sim = Simulation::new(EngineConfig {
                    storage: StorageConfig::new(1000),
                    worker_threads: Some(threads),
                    ..EngineConfig::default()
                })
                .unwrap();
                for _ in 0..240 {
                    sim.step(&description).unwrap();
                }
                black_box(sim.particle_count());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ballistic, bench_events, bench_fountain_workers);
criterion_main!(benches);
