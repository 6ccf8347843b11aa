//! Benchmarks for puzzle generation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use polypack::generator::{generate_simple, generate_stress};
use polypack::grid::Grid;
use polypack::shapes::ALL;

const POOL: &[char] = &['A', 'C', 'D', 'F', 'I', 'J', 'K', 'L', 'M', 'N'];

/// Benchmark a full-size stress puzzle.
fn bench_generate_stress(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    c.bench_function("generate_stress_20x20", |b| {
        b.iter(|| generate_stress(20, 20, black_box(POOL), 0.5, &mut rng))
    });
}

/// Benchmark the first-fit scan used by simple puzzles.
fn bench_generate_simple(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    c.bench_function("generate_simple_8x8", |b| {
        b.iter(|| generate_simple(8, 8, black_box(POOL), &mut rng))
    });
}

/// Benchmark legality checks for every shape at every anchor.
fn bench_can_place(c: &mut Criterion) {
    let mut grid = Grid::new(20, 20);
    grid.place('N', 4, 4);
    grid.place('K', 10, 12);

    c.bench_function("can_place_all_anchors", |b| {
        b.iter(|| {
            let mut legal = 0;
            for shape in ALL {
                for row in 0..20 {
                    for col in 0..20 {
                        if black_box(&grid).can_place(shape.id, row, col) {
                            legal += 1;
                        }
                    }
                }
            }
            legal
        })
    });
}

criterion_group!(
    benches,
    bench_generate_stress,
    bench_generate_simple,
    bench_can_place
);
criterion_main!(benches);
