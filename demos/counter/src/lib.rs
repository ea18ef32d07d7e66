//! # Counter Demo
//!
//! A counter with a loading flag, demonstrating the Reactor Rust
//! architecture end to end:
//!
//! - Actions (`Increase`/`Decrease`) from the "view"
//! - Asynchronous mutations: each step flips the loading flag on, applies
//!   the value change after a delay, then flips the flag off
//! - A pure reducer folding mutations into state snapshots
//!
//! ## Example
//!
//! ```no_run
//! use counter_demo::{CounterAction, CounterReactor};
//! use reactor_rust_runtime::Store;
//!
//! # async fn example() {
//! let store = Store::new(CounterReactor::new());
//! let mut states = store.state();
//!
//! store.send(CounterAction::Increase);
//!
//! while let Some(state) = states.recv().await {
//!     if state.value == 1 && !state.is_loading {
//!         break;
//!     }
//! }
//! # }
//! ```

use reactor_rust_core::{MutationContext, MutationStream, Reactor, mutation};
use std::time::Duration;

/// Counter state: the value plus a flag for the in-flight step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CounterState {
    /// Current count value
    pub value: i64,
    /// Whether a step is currently being applied
    pub is_loading: bool,
}

/// User intents from the view.
#[derive(Debug, Clone)]
pub enum CounterAction {
    /// Increase the counter by 1 (after the step delay)
    Increase,
    /// Decrease the counter by 1 (after the step delay)
    Decrease,
}

/// State-change instructions produced by the effects.
#[derive(Debug, Clone)]
pub enum CounterMutation {
    /// Apply +1 to the value
    IncreaseValue,
    /// Apply -1 to the value
    DecreaseValue,
    /// Flip the loading flag
    SetLoading(bool),
}

/// The counter's reactor.
///
/// Each action becomes three mutations: loading on, the (delayed) value
/// change, loading off. The delay is configurable so tests can run it at
/// zero.
#[derive(Debug, Clone)]
pub struct CounterReactor {
    step_delay: Duration,
}

impl CounterReactor {
    /// Create a reactor with the default step delay (300 ms).
    #[must_use]
    pub const fn new() -> Self {
        Self { step_delay: Duration::from_millis(300) }
    }

    /// Create a reactor with a custom step delay.
    #[must_use]
    pub const fn with_step_delay(step_delay: Duration) -> Self {
        Self { step_delay }
    }
}

impl Default for CounterReactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Reactor for CounterReactor {
    type Action = CounterAction;
    type Mutation = CounterMutation;
    type State = CounterState;

    fn initial_state(&self) -> CounterState {
        CounterState::default()
    }

    fn mutate(
        &self,
        action: CounterAction,
        _ctx: &MutationContext<CounterAction, CounterState>,
    ) -> MutationStream<CounterMutation> {
        let step = match action {
            CounterAction::Increase => CounterMutation::IncreaseValue,
            CounterAction::Decrease => CounterMutation::DecreaseValue,
        };
        let delay = self.step_delay;

        mutation::concat(vec![
            mutation::just(CounterMutation::SetLoading(true)),
            mutation::from_future(async move {
                tokio::time::sleep(delay).await;
                Ok(step)
            }),
            mutation::just(CounterMutation::SetLoading(false)),
        ])
    }

    fn reduce(&self, state: CounterState, mutation: CounterMutation) -> CounterState {
        match mutation {
            CounterMutation::IncreaseValue => CounterState { value: state.value + 1, ..state },
            CounterMutation::DecreaseValue => CounterState { value: state.value - 1, ..state },
            CounterMutation::SetLoading(is_loading) => CounterState { is_loading, ..state },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_applies_value_changes() {
        let reactor = CounterReactor::new();
        let state = reactor.reduce(CounterState::default(), CounterMutation::IncreaseValue);
        assert_eq!(state.value, 1);

        let state = reactor.reduce(state, CounterMutation::DecreaseValue);
        assert_eq!(state.value, 0);
    }

    #[test]
    fn reduce_flips_loading_without_touching_value() {
        let reactor = CounterReactor::new();
        let state = reactor.reduce(
            CounterState { value: 3, is_loading: false },
            CounterMutation::SetLoading(true),
        );
        assert_eq!(state, CounterState { value: 3, is_loading: true });
    }
}
