use climate_sim::{sweep, Challenge, PolicyStrength, SimulationEngine, SweepRequest};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_sweep(c: &mut Criterion) {
    let engine = SimulationEngine::builtin();
    let mut group = c.benchmark_group("sweep");

    for step in [20u32, 10, 5, 1] {
        let request = SweepRequest::new(Challenge::ReduceEmissions, PolicyStrength::High, step);
        group.bench_with_input(BenchmarkId::new("step", step), &request, |b, request| {
            b.iter(|| sweep(&engine, request).expect("valid step"))
        });
    }

    group.finish();
}

criterion_group!(sweep_benches, bench_sweep);
criterion_main!(sweep_benches);
