//! Search benchmarks for performance profiling.
//!
//! Run with: `cargo bench`
//!
//! Measures full decisions at varying playout counts and the cost of one
//! playout's building blocks on the miniature arena model.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pommer::core::{Action, AgentRng, Seat};
use pommer::game::mini::MiniArena;
use pommer::mcts::{BudgetRule, SearchConfig, TreeSearch};
use pommer::opponent::OpponentModel;

fn bench_search_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_iterations");

    for iters in [50u32, 200, 800] {
        group.throughput(Throughput::Elements(iters as u64));
        group.bench_with_input(BenchmarkId::new("mini_arena", iters), &iters, |b, &iters| {
            let arena = MiniArena::new(6, 6, 60);
            let config = SearchConfig::default()
                .with_budget(BudgetRule::Iterations { count: iters })
                .with_search_depth(4)
                .with_rollout_depth(8);
            let opponents = OpponentModel::new();

            b.iter(|| {
                let state = arena.initial_state(Seat::new(0));
                let mut rng = AgentRng::new(config.seed);
                let mut search = TreeSearch::new(&arena, &config, state, &opponents, &mut rng);
                black_box(search.run().unwrap())
            });
        });
    }

    group.finish();
}

fn bench_search_with_learned_opponents(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_opponents");
    let iters = 200u32;

    // Flat tables: every simulated opponent step is a uniform draw.
    group.bench_function("uniform", |b| {
        let arena = MiniArena::new(6, 6, 60);
        let config = SearchConfig::default()
            .with_budget(BudgetRule::Iterations { count: iters })
            .with_search_depth(4)
            .with_rollout_depth(8);
        let opponents = OpponentModel::new();

        b.iter(|| {
            let state = arena.initial_state(Seat::new(0));
            let mut rng = AgentRng::new(config.seed);
            let mut search = TreeSearch::new(&arena, &config, state, &opponents, &mut rng);
            black_box(search.run().unwrap())
        });
    });

    // Learned tables: every simulated opponent step is an argmax lookup.
    group.bench_function("learned", |b| {
        let arena = MiniArena::new(6, 6, 60);
        let config = SearchConfig::default()
            .with_budget(BudgetRule::Iterations { count: iters })
            .with_search_depth(4)
            .with_rollout_depth(8);
        let mut opponents = OpponentModel::new();
        for seat in 1..4 {
            opponents.record(Seat::new(seat), Action::Stop);
        }

        b.iter(|| {
            let state = arena.initial_state(Seat::new(0));
            let mut rng = AgentRng::new(config.seed);
            let mut search = TreeSearch::new(&arena, &config, state, &opponents, &mut rng);
            black_box(search.run().unwrap())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_search_iterations,
    bench_search_with_learned_opponents,
);

criterion_main!(benches);
