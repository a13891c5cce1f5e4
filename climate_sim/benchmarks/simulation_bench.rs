use climate_sim::{Challenge, PolicyStrength, SimulationEngine, SimulationParameters};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_run(c: &mut Criterion) {
    let engine = SimulationEngine::builtin();
    let mut group = c.benchmark_group("simulation");

    for challenge in Challenge::ALL {
        let params = SimulationParameters::new(65.0, 45.0, PolicyStrength::Moderate);
        group.bench_with_input(
            BenchmarkId::new("run", challenge.as_str()),
            &params,
            |b, params| b.iter(|| engine.run_challenge(challenge, black_box(params))),
        );
        group.bench_with_input(
            BenchmarkId::new("explain", challenge.as_str()),
            &params,
            |b, params| b.iter(|| engine.explain(challenge, black_box(params))),
        );
    }

    group.finish();
}

criterion_group!(simulation_benches, bench_run);
criterion_main!(simulation_benches);
