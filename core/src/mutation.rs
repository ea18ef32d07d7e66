//! Constructors for mutation streams.
//!
//! `mutate` implementations assemble their return value from these the way
//! reactive code assembles observables: `just` for a synchronous mutation,
//! `concat` to sequence an immediate flag flip before an async result,
//! [`run`] to drive mutations out of a spawned task.

use crate::error::EffectError;
use crate::streams::MutationStream;
use futures::{Future, FutureExt, Stream, StreamExt, stream};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A stream that emits no mutations and completes immediately.
///
/// The default [`Reactor::mutate`](crate::reactor::Reactor::mutate) returns
/// this: an action with no declared effect is a no-op.
#[must_use]
pub fn empty<M: Send + 'static>() -> MutationStream<M> {
    stream::empty().boxed()
}

/// A stream that emits exactly one mutation.
///
/// This is also the identity effect: a reactor whose `Mutation` type is its
/// `Action` type implements `mutate` as `mutation::just(action)`.
#[must_use]
pub fn just<M: Send + 'static>(mutation: M) -> MutationStream<M> {
    stream::once(std::future::ready(Ok(mutation))).boxed()
}

/// A stream that emits each mutation of `mutations`, in order.
#[must_use]
pub fn of<M, I>(mutations: I) -> MutationStream<M>
where
    M: Send + 'static,
    I: IntoIterator<Item = M>,
    I::IntoIter: Send + 'static,
{
    stream::iter(mutations.into_iter().map(Ok)).boxed()
}

/// A stream that fails immediately.
///
/// The engine swallows the error and folds nothing; use this for guards
/// that should abandon an effect without modeling an error state.
#[must_use]
pub fn fail<M: Send + 'static>(error: EffectError) -> MutationStream<M> {
    stream::once(std::future::ready(Err(error))).boxed()
}

/// A single-mutation stream produced by an async computation.
#[must_use]
pub fn from_future<M, Fut>(future: Fut) -> MutationStream<M>
where
    M: Send + 'static,
    Fut: Future<Output = Result<M, EffectError>> + Send + 'static,
{
    stream::once(future).boxed()
}

/// Wrap an infallible stream of mutations.
#[must_use]
pub fn from_stream<M, St>(mutations: St) -> MutationStream<M>
where
    M: Send + 'static,
    St: Stream<Item = M> + Send + 'static,
{
    mutations.map(Ok).boxed()
}

/// Concatenate mutation streams: each runs to completion before the next
/// starts. Under the engine's failure policy an `Err` item stops
/// consumption there, so later segments never run.
#[must_use]
pub fn concat<M, I>(streams: I) -> MutationStream<M>
where
    M: Send + 'static,
    I: IntoIterator<Item = MutationStream<M>>,
    I::IntoIter: Send + 'static,
{
    stream::iter(streams).flatten().boxed()
}

/// Handle for emitting mutations from inside a [`run`] task.
#[derive(Debug)]
pub struct Emitter<M> {
    tx: mpsc::UnboundedSender<M>,
}

impl<M> Clone for Emitter<M> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<M> Emitter<M> {
    /// Emit one mutation. Has no effect once the consuming stream has been
    /// dropped (the task is being cancelled).
    pub fn emit(&self, mutation: M) {
        let _ = self.tx.send(mutation);
    }
}

/// Bridge a spawned task to a mutation stream.
///
/// `operation` runs on a new tokio task and emits mutations through the
/// [`Emitter`] it is given. The returned stream yields them in emission
/// order and completes when the task finishes (and every `Emitter` clone
/// is gone). Dropping the stream aborts the task, so cancellation from the
/// supersede pattern or store teardown propagates into the operation.
///
/// ```ignore
/// fn mutate(&self, action: Action, _ctx: &MutationContext<Action, State>)
///     -> MutationStream<Mutation>
/// {
///     mutation::run(|emitter| async move {
///         let mut ticks = interval(Duration::from_secs(1));
///         loop {
///             ticks.tick().await;
///             emitter.emit(Mutation::Tick);
///         }
///     })
/// }
/// ```
pub fn run<M, F, Fut>(operation: F) -> MutationStream<M>
where
    M: Send + 'static,
    F: FnOnce(Emitter<M>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(operation(Emitter { tx }));
    RunStream { task, rx }.boxed()
}

/// Stream side of [`run`]: yields emitted mutations, aborts the task when
/// dropped.
struct RunStream<M> {
    task: JoinHandle<()>,
    rx: mpsc::UnboundedReceiver<M>,
}

impl<M> Stream for RunStream<M> {
    type Item = Result<M, EffectError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(mutation)) => Poll::Ready(Some(Ok(mutation))),
            Poll::Ready(None) => {
                // All emitters gone; surface a task panic as an effect
                // failure so the engine's truncation policy applies.
                match self.task.poll_unpin(cx) {
                    Poll::Ready(Err(join_error)) if join_error.is_panic() => {
                        Poll::Ready(Some(Err(EffectError::failed("effect task panicked"))))
                    }
                    Poll::Ready(_) => Poll::Ready(None),
                    Poll::Pending => Poll::Pending,
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<M> Drop for RunStream<M> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    async fn collect<M: Send + 'static>(stream: MutationStream<M>) -> Vec<Result<M, EffectError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn just_emits_one_value() {
        let items = collect(just(5)).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().ok(), Some(&5));
    }

    #[tokio::test]
    async fn of_preserves_order() {
        let items = collect(of(vec!['a', 'b', 'c'])).await;
        let values: Vec<char> = items.into_iter().filter_map(Result::ok).collect();
        assert_eq!(values, vec!['a', 'b', 'c']);
    }

    #[tokio::test]
    async fn concat_sequences_streams() {
        let items = collect(concat(vec![of(vec![1, 2]), just(3)])).await;
        let values: Vec<i32> = items.into_iter().filter_map(Result::ok).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn from_stream_wraps_infallible_items() {
        let ticks = async_stream::stream! {
            for n in 0..3 {
                yield n;
            }
        };
        let items = collect(from_stream(ticks)).await;
        let values: Vec<i32> = items.into_iter().filter_map(Result::ok).collect();
        assert_eq!(values, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn fail_emits_a_single_error() {
        let items = collect(fail::<i32>(EffectError::failed("guard"))).await;
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }

    #[tokio::test]
    async fn run_yields_emitted_mutations_in_order() {
        let stream = run(|emitter| async move {
            emitter.emit(1);
            emitter.emit(2);
            emitter.emit(3);
        });
        let values: Vec<i32> = collect(stream).await.into_iter().filter_map(Result::ok).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn dropping_run_stream_aborts_the_task() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let stream: MutationStream<i32> = run(|_emitter| async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            flag.store(true, Ordering::SeqCst);
        });
        drop(stream);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }
}
