//! Integration tests for stub-backed stores
//!
//! A stubbed store bypasses `mutate`/`reduce` entirely: tests drive state
//! directly and assert on the recorded action log.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use reactor_rust_core::{MutationContext, MutationStream, Reactor, mutation};
use reactor_rust_runtime::{Store, StoreError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum CounterAction {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CounterState {
    value: i64,
}

/// Counts pipeline invocations to prove the stub bypasses them.
struct CountingReactor {
    mutate_calls: Arc<AtomicUsize>,
    reduce_calls: Arc<AtomicUsize>,
}

impl CountingReactor {
    fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let mutate_calls = Arc::new(AtomicUsize::new(0));
        let reduce_calls = Arc::new(AtomicUsize::new(0));
        let reactor = Self {
            mutate_calls: Arc::clone(&mutate_calls),
            reduce_calls: Arc::clone(&reduce_calls),
        };
        (reactor, mutate_calls, reduce_calls)
    }
}

impl Reactor for CountingReactor {
    type Action = CounterAction;
    type Mutation = CounterAction;
    type State = CounterState;

    fn initial_state(&self) -> CounterState {
        CounterState::default()
    }

    fn mutate(
        &self,
        action: CounterAction,
        _ctx: &MutationContext<CounterAction, CounterState>,
    ) -> MutationStream<CounterAction> {
        self.mutate_calls.fetch_add(1, Ordering::SeqCst);
        mutation::just(action)
    }

    fn reduce(&self, state: CounterState, mutation: CounterAction) -> CounterState {
        self.reduce_calls.fetch_add(1, Ordering::SeqCst);
        match mutation {
            CounterAction::Increase => CounterState { value: state.value + 1 },
            CounterAction::Decrease => CounterState { value: state.value - 1 },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

/// Sent actions are recorded in order (duplicates included) and never
/// reach `mutate` or `reduce`.
#[tokio::test]
async fn stub_records_actions_without_running_the_pipeline() {
    let (reactor, mutate_calls, reduce_calls) = CountingReactor::new();
    let store = Store::stubbed(reactor);

    store.send(CounterAction::Increase);
    store.send(CounterAction::Increase);
    store.send(CounterAction::Decrease);

    let stub = store.stub().unwrap();
    assert_eq!(
        stub.actions(),
        vec![
            CounterAction::Increase,
            CounterAction::Increase,
            CounterAction::Decrease,
        ]
    );
    assert_eq!(mutate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(reduce_calls.load(Ordering::SeqCst), 0);

    // The state never moved on its own.
    assert_eq!(store.current_state(), CounterState { value: 0 });
}

/// The stub's state cell starts at the initial state and is directly
/// settable; sets reach current-state reads and subscribers alike.
#[tokio::test]
async fn stub_state_is_settable_and_observable() {
    let (reactor, _, _) = CountingReactor::new();
    let store = Store::stubbed(reactor);

    let mut states = store.state();
    assert_eq!(states.recv().await, Some(CounterState { value: 0 }));

    store.stub().unwrap().set_state(CounterState { value: 42 });

    assert_eq!(states.recv().await, Some(CounterState { value: 42 }));
    assert_eq!(store.current_state(), CounterState { value: 42 });
    assert_eq!(store.stub().unwrap().state(), CounterState { value: 42 });
}

/// Actions sent to a stubbed store are still multicast on its action
/// channel, so bindings under test observe them.
#[tokio::test]
async fn stub_actions_are_multicast_to_observers() {
    let (reactor, _, _) = CountingReactor::new();
    let store = Store::stubbed(reactor);
    let mut actions = store.actions();

    store.send(CounterAction::Increase);

    assert_eq!(actions.recv().await, Some(CounterAction::Increase));
}

/// Stub access on a live store is a misuse error, not a panic.
#[tokio::test]
async fn stub_access_on_live_store_is_an_error() {
    let (reactor, _, _) = CountingReactor::new();
    let store = Store::new(reactor);

    assert!(!store.is_stub_enabled());
    assert_eq!(store.stub().err(), Some(StoreError::StubDisabled));
}

#[tokio::test]
async fn stubbed_store_reports_stub_enabled() {
    let (reactor, _, _) = CountingReactor::new();
    let store = Store::stubbed(reactor);

    assert!(store.is_stub_enabled());
    assert!(store.stub().is_ok());
}
