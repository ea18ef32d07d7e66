//! The state relay: a current-value cell fused with a replay-1 multicast.

use crate::streams::Subscription;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

struct RelayInner<S> {
    value: S,
    /// Whether replay has begun. Until the first accept of a deferred
    /// relay, subscribers are not seeded; they receive the first accepted
    /// value live instead.
    replaying: bool,
    listeners: Vec<mpsc::UnboundedSender<S>>,
}

/// A current-value cell whose updates are multicast to listeners.
///
/// The relay always holds exactly one value, readable synchronously via
/// [`value`](Self::value). [`accept`](Self::accept) replaces it and
/// delivers the new value to every attached listener;
/// [`subscribe`](Self::subscribe) seeds the new listener with the latest
/// replayed value (replay depth 1 — never older history) and then delivers
/// every subsequent value live.
///
/// [`new`](Self::new) starts replaying immediately: the construction value
/// is seeded to subscribers. [`deferred`](Self::deferred) holds the value
/// for synchronous reads but begins replaying only at the first accept —
/// for pipelines that push their (possibly transformed) initial value
/// through the stream itself and must not deliver it twice.
///
/// Cell and registry share one lock, which makes two invariants
/// linearizable without further coordination:
///
/// - the cell is updated strictly before any listener observes the value,
/// - a subscriber either receives a value in its seed or live, never both
///   and never neither.
///
/// Like a subject, the relay carries no error or completion signal; it
/// "completes" only by being dropped, which ends its subscriptions.
/// Cloning shares the underlying cell and registry.
#[derive(Debug)]
pub struct StateRelay<S> {
    inner: Arc<Mutex<RelayInner<S>>>,
}

impl<S> Clone for StateRelay<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S> std::fmt::Debug for RelayInner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayInner")
            .field("replaying", &self.replaying)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: Clone> StateRelay<S> {
    /// Create a relay holding `value`, replaying it to subscribers.
    #[must_use]
    pub fn new(value: S) -> Self {
        Self::with_replaying(value, true)
    }

    /// Create a relay holding `value` for synchronous reads, with replay
    /// deferred until the first accept.
    #[must_use]
    pub fn deferred(value: S) -> Self {
        Self::with_replaying(value, false)
    }

    fn with_replaying(value: S, replaying: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RelayInner {
                value,
                replaying,
                listeners: Vec::new(),
            })),
        }
    }

    /// Snapshot the current value.
    #[must_use]
    pub fn value(&self) -> S {
        self.lock().value.clone()
    }

    /// Replace the current value and deliver it to every listener.
    ///
    /// Delivery happens even when the new value equals the old one; the
    /// relay does not compare values.
    pub fn accept(&self, value: S) {
        let mut inner = self.lock();
        inner.value = value.clone();
        inner.replaying = true;
        inner.listeners.retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Attach a listener.
    ///
    /// If the relay is replaying, the subscription's first delivery is the
    /// value current at this call; after that (or from the first accept,
    /// for a still-deferred relay) it receives every accepted value, in
    /// order.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<S> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        if inner.replaying {
            let _ = tx.send(inner.value.clone());
        }
        inner.listeners.push(tx);
        Subscription::new(rx)
    }

    /// Number of currently attached listeners (pruned lazily on accept).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RelayInner<S>> {
        match self.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn subscriber_is_seeded_with_current_value() {
        let relay = StateRelay::new(0);
        relay.accept(1);
        relay.accept(2);

        let mut sub = relay.subscribe();
        assert_eq!(sub.recv().await, Some(2));
    }

    #[tokio::test]
    async fn subscriber_never_sees_missed_history() {
        let relay = StateRelay::new(0);
        relay.accept(1);
        relay.accept(2);

        let sub = relay.subscribe();
        relay.accept(3);
        drop(relay);

        let values: Vec<i32> = sub.collect().await;
        assert_eq!(values, vec![2, 3]);
    }

    #[tokio::test]
    async fn value_reflects_latest_accept() {
        let relay = StateRelay::new("initial");
        assert_eq!(relay.value(), "initial");

        relay.accept("next");
        assert_eq!(relay.value(), "next");
    }

    #[tokio::test]
    async fn equal_values_are_still_delivered() {
        let relay = StateRelay::new(7);
        let mut sub = relay.subscribe();

        relay.accept(7);

        assert_eq!(sub.recv().await, Some(7));
        assert_eq!(sub.recv().await, Some(7));
    }

    #[tokio::test]
    async fn deferred_relay_reads_but_does_not_seed() {
        let relay = StateRelay::deferred(0);
        assert_eq!(relay.value(), 0);

        let mut early = relay.subscribe();
        relay.accept(1);

        // Exactly one delivery: the accept, no construction-value seed.
        assert_eq!(early.recv().await, Some(1));

        // Replay is live from the first accept on.
        let mut late = relay.subscribe();
        assert_eq!(late.recv().await, Some(1));
    }

    #[tokio::test]
    async fn dropped_subscriber_is_pruned() {
        let relay = StateRelay::new(0);
        let first = relay.subscribe();
        let _second = relay.subscribe();
        assert_eq!(relay.listener_count(), 2);

        drop(first);
        relay.accept(1);
        assert_eq!(relay.listener_count(), 1);
    }
}
