//! Criterion benchmarks for step decomposition and move planning.
//!
//! A full-screen absolute move decomposes into thousands of unit records,
//! so planning cost scales with the move distance rather than the datagram
//! size.
//!
//! Run with:
//! ```bash
//! cargo bench --package mousewire-core --bench motion_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mousewire_core::{domain::motion::decompose, PositionTracker, ScreenBounds};

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    for delta in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(delta), &delta, |b, &delta| {
            b.iter(|| decompose(black_box(0), black_box(delta), black_box(1)));
        });
    }
    group.finish();
}

fn bench_plan_move(c: &mut Criterion) {
    let tracker = PositionTracker::new(
        ScreenBounds {
            max_x: 1920,
            max_y: 1080,
        },
        1,
    );

    c.bench_function("plan_move_full_screen", |b| {
        b.iter(|| tracker.plan_move(black_box(1920), black_box(1080), black_box(0)))
    });
}

criterion_group!(benches, bench_decompose, bench_plan_move);
criterion_main!(benches);
