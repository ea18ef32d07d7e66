//! The action channel: a multicast subject that cannot terminate.

use crate::streams::Subscription;
use futures::{Stream, pin_mut};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A multicast channel for action values.
///
/// `ActionSubject` is the entry point of the pipeline: views (or effects,
/// re-entrantly) push actions in, and any number of listeners observe them.
/// Three properties distinguish it from a general-purpose channel:
///
/// - **Lossless per listener**: `send` enqueues a clone of the value to
///   every subscription attached at the moment of the call, before it
///   returns. Queues are unbounded, so a slow listener lags instead of
///   dropping values.
/// - **Value-only**: the subject carries no error or completion signal.
///   Forwarding a fallible upstream through [`forward`](Self::forward)
///   discards failures and end-of-stream; the subject keeps accepting
///   values afterwards.
/// - **Re-entrancy safe**: no user code runs while the listener registry
///   lock is held, so listeners may attach, detach, or send from any
///   context — including from inside an in-flight effect.
///
/// Cloning the subject clones the handle, not the channel: all clones share
/// one listener registry.
#[derive(Debug)]
pub struct ActionSubject<A> {
    inner: Arc<Mutex<Vec<mpsc::UnboundedSender<A>>>>,
}

impl<A> Clone for ActionSubject<A> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<A> Default for ActionSubject<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ActionSubject<A> {
    /// Create a subject with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Number of currently attached listeners.
    ///
    /// Listeners whose subscriptions were dropped are pruned lazily on the
    /// next `send`, so this may briefly over-count.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        match self.inner.lock() {
            Ok(listeners) => listeners.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Attach a listener. The subscription receives every action sent
    /// after this call; dropping or closing it detaches the listener.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<A> {
        let (tx, rx) = mpsc::unbounded_channel();
        match self.inner.lock() {
            Ok(mut listeners) => listeners.push(tx),
            Err(poisoned) => poisoned.into_inner().push(tx),
        }
        Subscription::new(rx)
    }
}

impl<A: Clone> ActionSubject<A> {
    /// Deliver `action` to every attached listener.
    ///
    /// Delivery (enqueueing into each listener's queue) completes before
    /// this returns. Listeners that detached since the last send are
    /// removed here.
    pub fn send(&self, action: A) {
        let mut listeners = match self.inner.lock() {
            Ok(listeners) => listeners,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.retain(|tx| tx.send(action.clone()).is_ok());
    }

    /// Drain a fallible stream into this subject.
    ///
    /// `Ok` values are sent; `Err` values and the stream's completion are
    /// silently discarded — neither terminates the subject, which keeps
    /// delivering subsequently sent values. Returns once the stream ends.
    pub async fn forward<S, E>(&self, stream: S)
    where
        S: Stream<Item = Result<A, E>>,
    {
        pin_mut!(stream);
        while let Some(item) = futures::StreamExt::next(&mut stream).await {
            if let Ok(action) = item {
                self.send(action);
            }
        }
    }
}
