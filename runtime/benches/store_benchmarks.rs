//! Store runtime benchmarks
//!
//! Measures the action → mutate → fold → delivery round-trip:
//! - Fold step overhead (pure reduce through the engine)
//! - Throughput of batched sends through one store
//!
//! Run with: `cargo bench`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used, clippy::unwrap_used)] // Benchmarks can use expect for setup

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use reactor_rust_core::{MutationContext, MutationStream, Reactor, mutation};
use reactor_rust_runtime::Store;

// Test state
#[derive(Clone, Debug, Default)]
struct BenchState {
    counter: i64,
}

// Test actions
#[derive(Clone, Debug)]
enum BenchAction {
    Increment,
}

struct BenchReactor;

impl Reactor for BenchReactor {
    type Action = BenchAction;
    type Mutation = BenchAction;
    type State = BenchState;

    fn initial_state(&self) -> BenchState {
        BenchState::default()
    }

    fn mutate(
        &self,
        action: BenchAction,
        _ctx: &MutationContext<BenchAction, BenchState>,
    ) -> MutationStream<BenchAction> {
        mutation::just(action)
    }

    fn reduce(&self, state: BenchState, _mutation: BenchAction) -> BenchState {
        BenchState { counter: state.counter + 1 }
    }
}

fn bench_single_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");

    c.bench_function("send_and_observe_one_fold", |b| {
        b.to_async(&runtime).iter(|| async {
            let store = Store::new(BenchReactor);
            let mut states = store.state();
            store.send(BenchAction::Increment);

            while let Some(state) = states.recv().await {
                if state.counter == 1 {
                    break;
                }
            }
        });
    });
}

fn bench_batched_sends(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    const BATCH: u64 = 1_000;

    let mut group = c.benchmark_group("batched_sends");
    group.throughput(Throughput::Elements(BATCH));
    group.bench_function("fold_1000_actions", |b| {
        b.to_async(&runtime).iter(|| async {
            let store = Store::new(BenchReactor);
            let mut states = store.state();

            for _ in 0..BATCH {
                store.send(BenchAction::Increment);
            }

            while let Some(state) = states.recv().await {
                if state.counter == i64::try_from(BATCH).expect("fits") {
                    break;
                }
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_single_round_trip, bench_batched_sends);
criterion_main!(benches);
