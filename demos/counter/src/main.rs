//! Counter demo binary
//!
//! Demonstrates the Reactor Rust architecture with a counter whose steps
//! are applied asynchronously.

use counter_demo::{CounterAction, CounterReactor};
use reactor_rust_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter_demo=debug,reactor_rust_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    reactor_rust_runtime::metrics::describe_metrics();

    println!("=== Counter Demo: Reactor Rust Architecture ===\n");

    let store = Store::new(CounterReactor::new());
    let mut states = store.state();
    tracing::debug!("store created, state stream connected");

    println!(">>> Sending: Increase, Increase, Decrease");
    store.send(CounterAction::Increase);
    store.send(CounterAction::Increase);
    store.send(CounterAction::Decrease);

    // One initial emission plus three mutations per action.
    for _ in 0..10 {
        if let Some(state) = states.recv().await {
            println!("value: {:>2}   loading: {}", state.value, state.is_loading);
        }
    }

    println!("\nFinal count: {}", store.current_state().value);
    println!("\nKey concepts demonstrated:");
    println!("  • Action: user intent (Increase / Decrease)");
    println!("  • Mutation: discrete state change, produced asynchronously");
    println!("  • Reducer: pure fold (state, mutation) → state");
    println!("  • Store: wires the pipeline and replays the latest state");
}
