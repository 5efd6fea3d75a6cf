//! Benchmark: OrderedSteps insertion and traversal.
//!
//! Run with: `cargo bench -p tourguide-core --bench ordered_steps_bench`
//!
//! Tours are small, but hosts may register tips in reverse or shuffled
//! order; this measures insertion cost against those patterns.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tourguide_core::{OrderedSteps, Step, TourEngine};

fn shuffled(n: i64) -> Vec<i64> {
    // Deterministic permutation: stride coprime with n.
    let stride = 7;
    (0..n).map(|i| (i * stride) % n).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_steps_insert");
    for n in [16_i64, 256] {
        let keys = shuffled(n);
        group.bench_function(format!("shuffled_{n}"), |b| {
            b.iter(|| {
                let mut steps = OrderedSteps::new();
                for &key in &keys {
                    steps.set(key, key);
                }
                black_box(steps.len())
            });
        });
        group.bench_function(format!("reverse_{n}"), |b| {
            b.iter(|| {
                let mut steps = OrderedSteps::new();
                for key in (0..n).rev() {
                    steps.set(key, key);
                }
                black_box(steps.len())
            });
        });
    }
    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut engine = TourEngine::new();
    for key in shuffled(64) {
        engine.add_step(Step::with_index(key));
    }
    c.bench_function("engine_select_cycle_64", |b| {
        b.iter(|| {
            for key in 0..65 {
                engine.select(black_box(key));
            }
        });
    });
}

criterion_group!(benches, bench_insert, bench_select);
criterion_main!(benches);
