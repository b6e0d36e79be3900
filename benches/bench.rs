use criterion::{Criterion, criterion_group, criterion_main};
use sat_reducer::sat::literal::{PackedLiteral, Variable};
use sat_reducer::sat::reduction::{RawLiteral, Reducer};
use smallvec::SmallVec;
use std::hint::black_box;
use std::time::Duration;

type BenchReducer = Reducer<PackedLiteral, SmallVec<[PackedLiteral; 3]>>;

/// Generates a random SAT instance with clause arities drawn from `1..=max_k`.
fn random_instance(
    num_vars: u32,
    num_clauses: usize,
    max_k: usize,
    seed: u64,
) -> (Vec<Variable>, Vec<Vec<RawLiteral>>) {
    let mut rng = fastrand::Rng::with_seed(seed);

    let variables: Vec<Variable> = (1..=num_vars).collect();
    let clauses = (0..num_clauses)
        .map(|_| {
            let k = rng.usize(1..=max_k);
            (0..k)
                .map(|_| RawLiteral::from((rng.u32(1..=num_vars), rng.bool())))
                .collect()
        })
        .collect();

    (variables, clauses)
}

fn bench_clause_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce/clauses");
    group.measurement_time(Duration::from_secs(5));

    for num_clauses in [100, 1_000, 10_000] {
        let (variables, clauses) = random_instance(50, num_clauses, 6, 42);

        group.bench_function(format!("{num_clauses}"), |b| {
            let mut reducer = BenchReducer::new();
            b.iter(|| {
                let reduction = reducer
                    .reduce(black_box(&variables), black_box(&clauses))
                    .unwrap();
                black_box(reduction.stats.output_clauses)
            });
        });
    }

    group.finish();
}

fn bench_wide_clauses(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce/arity");

    for k in [4, 16, 64, 256] {
        let variables: Vec<Variable> = (1..=k).collect();
        let clauses: Vec<Vec<RawLiteral>> = (0..100)
            .map(|_| (1..=k as i32).map(RawLiteral::from).collect())
            .collect();

        group.bench_function(format!("k={k}"), |b| {
            let mut reducer = BenchReducer::new();
            b.iter(|| {
                let reduction = reducer
                    .reduce(black_box(&variables), black_box(&clauses))
                    .unwrap();
                black_box(reduction.cnf.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_clause_counts, bench_wide_clauses);
criterion_main!(benches);
