//! Criterion micro-benchmarks for allocation, deletion and compaction.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use ember_bench::{ballistic_profile, populate, SPARK};
use ember_core::KILL_STATE;

fn bench_allocate(c: &mut Criterion) {
    let description = ballistic_profile();
    c.bench_function("allocate_10k", |b| {
        b.iter_batched(
            || populate(&description, 0, 1000, 1).unwrap(),
            |mut state| {
                let parts = state.allocator().allocate(SPARK, 10_000).unwrap();
                black_box(parts);
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_delete_and_compress(c: &mut Criterion) {
    let description = ballistic_profile();
    c.bench_function("delete_half_compress_10k", |b| {
        b.iter_batched(
            || {
                let mut state = populate(&description, 10_000, 1000, 1).unwrap();
                let container = state.container_mut(SPARK).unwrap();
                for (index, block) in container.active_blocks_mut().iter_mut().enumerate() {
                    let mut attributes = block.attributes_mut();
                    let kill_states = attributes.get_byte_mut(KILL_STATE).unwrap();
                    // Uneven kills so compaction has blocks to merge.
                    let stride = 2 + index % 3;
                    for slot in (0..kill_states.len()).step_by(stride) {
                        kill_states[slot] = 1;
                    }
                }
                state
            },
            |mut state| {
                let container = state.container_mut(SPARK).unwrap();
                let killed = container.delete_killed().unwrap();
                let released = container.compress();
                black_box((killed, released));
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_allocate, bench_delete_and_compress);
criterion_main!(benches);
