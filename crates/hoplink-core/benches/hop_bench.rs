//! Benchmarks for per-hop operations
//!
//! Run with: cargo bench -p hoplink-core --bench hop_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hoplink_core::{compute_frequency, CoefficientSchedule, FhssAlgorithm, HopState, LinkParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_schedule_derivation(c: &mut Criterion) {
    let params = LinkParams::default();
    c.bench_function("schedule_from_key", |b| {
        b.iter(|| CoefficientSchedule::from_key(black_box(12345), &params))
    });
}

fn bench_frequency(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_frequency");
    let params = LinkParams::default();
    let schedule = CoefficientSchedule::from_key(12345, &params).unwrap();

    // In band on the first pair vs a full pass ending in fallback
    for (label, amplitude, energy) in [("first_pair", 3.0, 18.0), ("exhausted", 10.0, 200.0)] {
        group.bench_with_input(BenchmarkId::new("case", label), &(amplitude, energy), |b, &(a, e)| {
            b.iter(|| compute_frequency(&schedule, &params, black_box(0), a, black_box(2.0), e))
        });
    }

    group.finish();
}

fn bench_full_hop(c: &mut Criterion) {
    let algorithm = FhssAlgorithm::with_key(12345).unwrap();
    let mut rng = StdRng::seed_from_u64(12345);
    let mut state = HopState::new();

    c.bench_function("sender_hop", |b| {
        b.iter(|| {
            let signal = algorithm.generate_signal_parameters(&mut rng);
            let result = algorithm.frequency_for(&mut state, &signal);
            let sync = algorithm.sync_check(&state);
            algorithm.next_hop(&mut state);
            black_box((result, sync))
        })
    });
}

criterion_group!(benches, bench_schedule_derivation, bench_frequency, bench_full_hop);
criterion_main!(benches);
