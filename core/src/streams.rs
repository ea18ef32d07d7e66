//! Stream aliases and the per-listener subscription type.
//!
//! Every stage boundary in the pipeline is a boxed stream so that user
//! transform hooks can splice in arbitrary combinators or merge external
//! sources without naming concrete combinator types.

use crate::error::EffectError;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Stream of actions flowing out of the action channel, pre-effect.
pub type ActionStream<A> = Pin<Box<dyn Stream<Item = A> + Send>>;

/// Stream of mutations produced by an effect invocation.
///
/// Items are `Result` so that an effect can fail mid-stream; the engine
/// truncates a per-action stream at its first `Err` item and the error
/// never reaches the output state stream.
pub type MutationStream<M> = Pin<Box<dyn Stream<Item = Result<M, EffectError>> + Send>>;

/// Stream of folded states, post-reduce.
pub type StateStream<S> = Pin<Box<dyn Stream<Item = S> + Send>>;

/// A listener's view of a multicast channel.
///
/// Returned by [`ActionSubject::subscribe`](crate::subject::ActionSubject::subscribe)
/// and [`StateRelay::subscribe`](crate::relay::StateRelay::subscribe). Each
/// subscription owns an unbounded queue: values sent while the listener is
/// attached are never dropped, regardless of how slowly it consumes them.
///
/// Dropping the subscription detaches the listener. [`close`](Self::close)
/// detaches it explicitly and is idempotent.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    pub(crate) const fn new(rx: mpsc::UnboundedReceiver<T>) -> Self {
        Self { rx }
    }

    /// Receive the next value, or `None` once the channel is closed and
    /// all buffered values have been consumed.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Detach this listener. Values already queued remain receivable;
    /// subsequent sends are no longer delivered. Calling `close` more than
    /// once has no further effect.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_recv(cx)
    }
}
