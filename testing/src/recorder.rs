//! State recording for integration tests.

use reactor_rust_core::Reactor;
use reactor_rust_runtime::Store;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Records every state a store delivers, for later assertion.
///
/// Attaching subscribes to the store's state stream (forcing construction)
/// and collects deliveries on a background task. Attach *before* sending
/// actions to capture the full sequence, starting with the seeded current
/// state.
///
/// # Example
///
/// ```ignore
/// let store = Store::new(CounterReactor);
/// let recorder = StateRecorder::attach(&store);
///
/// store.send(CounterAction::Increase);
/// recorder.wait_for(2).await; // initial + folded
///
/// let values: Vec<i64> = recorder.recorded().iter().map(|s| s.value).collect();
/// assert_eq!(values, vec![0, 1]);
/// ```
pub struct StateRecorder<S> {
    states: Arc<Mutex<Vec<S>>>,
    notify: Arc<Notify>,
    task: JoinHandle<()>,
}

impl<S: Clone + Send + 'static> StateRecorder<S> {
    /// Subscribe to `store` and start recording.
    #[must_use]
    pub fn attach<R>(store: &Store<R>) -> Self
    where
        R: Reactor<State = S>,
    {
        let mut subscription = store.state();
        let states = Arc::new(Mutex::new(Vec::new()));
        let notify = Arc::new(Notify::new());

        let task = {
            let states = Arc::clone(&states);
            let notify = Arc::clone(&notify);
            tokio::spawn(async move {
                while let Some(state) = subscription.recv().await {
                    match states.lock() {
                        Ok(mut states) => states.push(state),
                        Err(poisoned) => poisoned.into_inner().push(state),
                    }
                    notify.notify_waiters();
                }
                // Store dropped; wake anyone still waiting so they can
                // observe the final count instead of hanging.
                notify.notify_waiters();
            })
        };

        Self { states, notify, task }
    }

    /// Snapshot the recorded states, in delivery order.
    #[must_use]
    pub fn recorded(&self) -> Vec<S> {
        match self.states.lock() {
            Ok(states) => states.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of states recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.states.lock() {
            Ok(states) => states.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait until at least `count` states have been recorded.
    pub async fn wait_for(&self, count: usize) {
        loop {
            // Register interest before checking, so a delivery between the
            // check and the await still wakes us.
            let mut notified = std::pin::pin!(self.notify.notified());
            notified.as_mut().enable();
            if self.len() >= count {
                return;
            }
            notified.await;
        }
    }

    /// Wait until at least `count` states have been recorded, with a
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires first.
    pub async fn wait_for_with_timeout(&self, count: usize, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait_for(count))
            .await
            .map_err(|_| ())
    }
}

impl<S> Drop for StateRecorder<S> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<S> std::fmt::Debug for StateRecorder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = match self.states.lock() {
            Ok(states) => states.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        };
        f.debug_struct("StateRecorder")
            .field("recorded", &len)
            .finish_non_exhaustive()
    }
}
