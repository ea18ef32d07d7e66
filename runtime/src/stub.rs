//! The stub backing: recorded actions and a directly driven state cell.

use reactor_rust_core::{Reactor, StateRelay};
use std::sync::Mutex;

/// Test-side access to a stubbed store.
///
/// Obtained from [`Store::stub`](crate::Store::stub) on a store created
/// with [`Store::stubbed`](crate::Store::stubbed). While stubbed, the
/// store's `mutate` and `reduce` are never invoked: sent actions land in
/// the recorded log, and state moves only when a test sets it here.
///
/// # Example
///
/// ```ignore
/// let store = Store::stubbed(CounterReactor);
/// store.send(CounterAction::Increase);
///
/// let stub = store.stub()?;
/// assert_eq!(stub.actions(), vec![CounterAction::Increase]);
///
/// stub.set_state(CounterState { value: 42, ..Default::default() });
/// assert_eq!(store.current_state().value, 42);
/// ```
pub struct Stub<'a, R: Reactor> {
    relay: &'a StateRelay<R::State>,
    log: &'a Mutex<Vec<R::Action>>,
}

impl<R: Reactor> std::fmt::Debug for Stub<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stub").finish_non_exhaustive()
    }
}

impl<'a, R: Reactor> Stub<'a, R> {
    pub(crate) const fn new(
        relay: &'a StateRelay<R::State>,
        log: &'a Mutex<Vec<R::Action>>,
    ) -> Self {
        Self { relay, log }
    }

    /// Every action sent to the store so far, in send order, duplicates
    /// included.
    #[must_use]
    pub fn actions(&self) -> Vec<R::Action> {
        match self.log.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Set the store's state directly.
    ///
    /// The value becomes the store's current state and is delivered to
    /// every state subscription, exactly as a folded state would be.
    pub fn set_state(&self, state: R::State) {
        self.relay.accept(state);
    }

    /// Snapshot the stub's state cell (same value as
    /// [`Store::current_state`](crate::Store::current_state)).
    #[must_use]
    pub fn state(&self) -> R::State {
        self.relay.value()
    }
}
