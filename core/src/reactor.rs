//! The `Reactor` trait: a view's state machine, independent of any view.

use crate::mutation;
use crate::relay::StateRelay;
use crate::streams::{ActionStream, MutationStream, StateStream, Subscription};
use crate::subject::ActionSubject;

/// A reactor is a UI-independent layer managing the state of one view.
///
/// The view delegates all control flow to its reactor: user inputs become
/// [`Action`](Self::Action)s, the reactor turns them into
/// [`Mutation`](Self::Mutation)s (the only place side effects are allowed),
/// and a pure fold turns mutations into [`State`](Self::State) snapshots
/// the view renders. The runtime (`Store` in `reactor-rust-runtime`) owns
/// the wiring; a reactor itself is plain data plus these methods, so it is
/// trivially testable without a runtime.
///
/// # Pipeline
///
/// ```text
/// actions ─ transform_action ─ mutate (async, fan-out)
///         ─ transform_mutation ─ reduce (pure, serialized fold)
///         ─ transform_state ─ replayed state stream
/// ```
///
/// Only `initial_state` is required together with the two stages a real
/// reactor cares about; every hook has an identity default and the default
/// `mutate` emits nothing.
///
/// # Example
///
/// ```ignore
/// struct CounterReactor;
///
/// impl Reactor for CounterReactor {
///     type Action = CounterAction;
///     type Mutation = CounterMutation;
///     type State = CounterState;
///
///     fn initial_state(&self) -> CounterState {
///         CounterState::default()
///     }
///
///     fn mutate(
///         &self,
///         action: CounterAction,
///         _ctx: &MutationContext<CounterAction, CounterState>,
///     ) -> MutationStream<CounterMutation> {
///         match action {
///             CounterAction::Increase => mutation::just(CounterMutation::IncreaseValue),
///             CounterAction::Decrease => mutation::just(CounterMutation::DecreaseValue),
///         }
///     }
///
///     fn reduce(&self, state: CounterState, mutation: CounterMutation) -> CounterState {
///         // pure: no I/O, no channel access
///     }
/// }
/// ```
pub trait Reactor: Send + Sync + Sized + 'static {
    /// A user or system intent fed into the pipeline.
    type Action: Clone + Send + 'static;

    /// One discrete state-change instruction.
    ///
    /// Reactors whose actions are already state-change instructions set
    /// `Mutation = Action` and implement `mutate` as
    /// `mutation::just(action)`.
    type Mutation: Send + 'static;

    /// One complete, immutable snapshot of view-relevant data.
    type State: Clone + Send + Sync + 'static;

    /// The state before any mutation has been folded.
    ///
    /// Called exactly once, when the store is created; the value is
    /// immutable for the store's lifetime.
    fn initial_state(&self) -> Self::State;

    /// Reshape the action stream before effects run.
    ///
    /// Called once during stream construction. Use it to merge external
    /// action sources or to throttle. Defaults to identity.
    fn transform_action(&self, actions: ActionStream<Self::Action>) -> ActionStream<Self::Action> {
        actions
    }

    /// Turn one action into a stream of zero or more mutations.
    ///
    /// This is the only stage where side effects (network calls, timers,
    /// re-entrant sends) are permitted. Streams from concurrent in-flight
    /// actions interleave their mutations as they arrive; a stream that
    /// yields `Err` is truncated there and the error is swallowed.
    ///
    /// The default emits nothing: actions without a declared effect are
    /// no-ops.
    fn mutate(
        &self,
        action: Self::Action,
        ctx: &MutationContext<Self::Action, Self::State>,
    ) -> MutationStream<Self::Mutation> {
        let _ = (action, ctx);
        mutation::empty()
    }

    /// Reshape the merged mutation stream before folding.
    ///
    /// Called once during stream construction. Defaults to identity.
    fn transform_mutation(
        &self,
        mutations: MutationStream<Self::Mutation>,
    ) -> MutationStream<Self::Mutation> {
        mutations
    }

    /// Compute the next state from the previous state and one mutation.
    ///
    /// Must be pure: synchronous, no I/O, no reads of the action channel
    /// or the current-state cell (those belong in [`mutate`](Self::mutate)).
    /// Called once per surviving mutation, serialized, in arrival order.
    ///
    /// Defaults to returning the state unchanged.
    fn reduce(&self, state: Self::State, mutation: Self::Mutation) -> Self::State {
        let _ = mutation;
        state
    }

    /// Reshape the state stream before external delivery.
    ///
    /// Called once during stream construction, after the initial-state
    /// prefix; the hook therefore also sees (and may map) the initial
    /// emission. Defaults to identity.
    fn transform_state(&self, states: StateStream<Self::State>) -> StateStream<Self::State> {
        states
    }
}

/// The executor-side view of a running store, handed to
/// [`Reactor::mutate`].
///
/// It carries the two capabilities an effect legitimately needs from its
/// store, without exposing the store itself:
///
/// - a snapshot of the current state ([`current_state`](Self::current_state)),
/// - the action channel, both readable ([`actions`](Self::actions)) and
///   writable ([`send`](Self::send)).
///
/// Cloning is cheap (handles only), so a context can be moved into the
/// futures and tasks an effect spawns.
#[derive(Debug)]
pub struct MutationContext<A, S> {
    actions: ActionSubject<A>,
    state: StateRelay<S>,
}

impl<A, S> Clone for MutationContext<A, S> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            state: self.state.clone(),
        }
    }
}

impl<A: Clone + Send + 'static, S: Clone + Send + 'static> MutationContext<A, S> {
    /// Assemble a context from a store's channel handles. Called by the
    /// runtime when it constructs the state stream.
    #[must_use]
    pub fn new(actions: ActionSubject<A>, state: StateRelay<S>) -> Self {
        Self { actions, state }
    }

    /// Snapshot the state as of the most recent fold.
    ///
    /// Reading it here (rather than in `reduce`) is the supported way for
    /// an effect to branch on current data, e.g. pagination guards.
    #[must_use]
    pub fn current_state(&self) -> S {
        self.state.value()
    }

    /// Subscribe to the action channel.
    ///
    /// This is the supersede hook: an effect that must stop when a
    /// logically newer action arrives races its own stream against the
    /// next matching value from this subscription.
    ///
    /// The subscription observes actions sent after it is created; an
    /// action already queued before this effect began is not replayed
    /// into it.
    #[must_use]
    pub fn actions(&self) -> Subscription<A> {
        self.actions.subscribe()
    }

    /// Send a new action into the store, re-entrantly.
    ///
    /// Safe to call from inside an effect or a listener; delivery is
    /// queue-based, so nested sends cannot deadlock or recurse.
    pub fn send(&self, action: A) {
        self.actions.send(action);
    }
}
