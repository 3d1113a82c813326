use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use score_core::{perturb, ScoreEngine, SimulationState};

fn bench_perturb(c: &mut Criterion) {
    let mut group = c.benchmark_group("perturb");

    group.bench_function("chacha8", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut state = SimulationState::initial();
        b.iter(|| {
            state = perturb(black_box(state), &mut rng);
        })
    });

    group.bench_function("small_rng", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = SimulationState::initial();
        b.iter(|| {
            state = perturb(black_box(state), &mut rng);
        })
    });

    for steps in [10u32, 100, 1_000] {
        group.bench_with_input(BenchmarkId::new("engine_steps", steps), &steps, |b, &steps| {
            b.iter(|| {
                let mut rng = ChaCha8Rng::seed_from_u64(7);
                let mut engine = ScoreEngine::new();
                for _ in 0..steps {
                    engine.step(&mut rng);
                }
                engine.snapshot()
            })
        });
    }

    group.finish();
}

criterion_group!(perturb_benches, bench_perturb);
criterion_main!(perturb_benches);
