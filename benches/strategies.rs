//! Strategy benchmarks on a fixed two-stone level, plus the hot
//! per-node routines (successor generation and the A* estimate).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weighted_sokoban::{heuristic, movement, solve, Algorithm, Puzzle, SearchParams};

fn level() -> Puzzle {
    Puzzle::new(
        &[4, 9],
        &[
            "#########",
            "#       #",
            "# $  .  #",
            "#  @    #",
            "#   $ . #",
            "#       #",
            "#########",
        ],
    )
    .unwrap()
}

fn bench_strategies(c: &mut Criterion) {
    let puzzle = level();
    let params = SearchParams::default();
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    for algorithm in Algorithm::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(algorithm.name()),
            &algorithm,
            |b, &algorithm| b.iter(|| black_box(solve(&puzzle, algorithm, &params, None))),
        );
    }
    group.finish();
}

fn bench_node_work(c: &mut Criterion) {
    let puzzle = level();
    c.bench_function("movement.successors", |b| {
        b.iter(|| black_box(movement::successors(puzzle.grid(), black_box(puzzle.start()))))
    });
    c.bench_function("heuristic.estimate", |b| {
        b.iter(|| black_box(heuristic::estimate(puzzle.grid(), black_box(puzzle.start()))))
    });
}

criterion_group!(benches, bench_strategies, bench_node_work);
criterion_main!(benches);
