//! The store: lifecycle binding and state stream engine for one reactor.

use crate::StoreConfig;
use crate::error::StoreError;
use crate::stub::Stub;
use futures::stream::BoxStream;
use futures::{StreamExt, future, stream};
use reactor_rust_core::{
    ActionStream, ActionSubject, MutationContext, MutationStream, Reactor, StateRelay,
    StateStream, Subscription,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use tokio::task::JoinHandle;

/// How a store is backed, fixed at construction time.
enum Mode {
    /// Actions run through `mutate`/`reduce` on the live engine.
    Live,
    /// Actions are recorded; state is set directly by tests.
    Stub,
}

/// The materialized backing, created once on first access.
pub(crate) enum Backing<A> {
    Live {
        actions: ActionSubject<A>,
        _driver: DriverHandle,
    },
    Stub {
        actions: ActionSubject<A>,
        log: Mutex<Vec<A>>,
    },
}

pub(crate) struct StoreInner<R: Reactor> {
    reactor: R,
    initial_state: R::State,
    relay: StateRelay<R::State>,
    config: StoreConfig,
    mode: Mode,
    backing: OnceLock<Backing<R::Action>>,
}

/// The runtime for one reactor.
///
/// A store owns everything the reactor's pipeline needs: the initial state
/// (computed once at construction), the action channel, the single
/// long-lived driver of the fold, and the current-state cell with its
/// replay-1 multicast. Cloning a store clones a handle; all clones share
/// the same instance.
///
/// # Laziness and construction
///
/// The channel and state stream are constructed on the first call to
/// [`send`](Self::send), [`state`](Self::state), or
/// [`actions`](Self::actions) — whichever comes first — exactly once, even
/// under racing first accesses from many threads. Construction immediately
/// starts the fold ("self-connecting"), so actions sent before any listener
/// attaches are not lost. [`current_state`](Self::current_state) never
/// triggers construction.
///
/// Construction spawns the driver task, so the first `send`/`state`/
/// `actions` call must happen inside a Tokio runtime.
///
/// # Teardown
///
/// Dropping the last handle aborts the driver task, which drops any
/// in-flight mutation streams (cancelling effects that cancel on drop) and
/// terminates outstanding [`state`](Self::state) subscriptions.
///
/// # Example
///
/// ```ignore
/// let store = Store::new(CounterReactor);
/// let mut states = store.state();
///
/// store.send(CounterAction::Increase);
///
/// assert_eq!(states.recv().await, Some(CounterState { value: 0, .. })); // initial
/// assert_eq!(states.recv().await, Some(CounterState { value: 1, .. }));
/// ```
pub struct Store<R: Reactor> {
    inner: Arc<StoreInner<R>>,
}

impl<R: Reactor> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<R: Reactor> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("stub", &matches!(self.inner.mode, Mode::Stub))
            .field("constructed", &self.inner.backing.get().is_some())
            .finish_non_exhaustive()
    }
}

impl<R: Reactor> Store<R> {
    /// Create a live store with default configuration.
    #[must_use]
    pub fn new(reactor: R) -> Self {
        Self::build(reactor, StoreConfig::default(), Mode::Live)
    }

    /// Create a live store with custom configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = StoreConfig::default().with_effect_concurrency(8);
    /// let store = Store::with_config(SearchReactor::new(), config);
    /// ```
    #[must_use]
    pub fn with_config(reactor: R, config: StoreConfig) -> Self {
        Self::build(reactor, config, Mode::Live)
    }

    /// Create a stubbed store for tests.
    ///
    /// The stub backing bypasses `mutate` and `reduce` entirely: sent
    /// actions are recorded in order, and state is driven directly through
    /// [`stub`](Self::stub). Stub mode is part of the store's identity —
    /// it is selected here, once, and cannot be toggled later.
    #[must_use]
    pub fn stubbed(reactor: R) -> Self {
        Self::build(reactor, StoreConfig::default(), Mode::Stub)
    }

    fn build(reactor: R, config: StoreConfig, mode: Mode) -> Self {
        let initial_state = reactor.initial_state();
        // The live engine delivers the (possibly transformed) initial state
        // through the stream itself, so its relay must not seed a second
        // copy; the stub has no stream and seeds directly.
        let relay = match mode {
            Mode::Live => StateRelay::deferred(initial_state.clone()),
            Mode::Stub => StateRelay::new(initial_state.clone()),
        };
        Self {
            inner: Arc::new(StoreInner {
                reactor,
                initial_state,
                relay,
                config,
                mode,
                backing: OnceLock::new(),
            }),
        }
    }

    /// Send an action into the store. Fire-and-forget: processing happens
    /// on the driver task, serialized at the fold.
    ///
    /// Forces construction of the state stream if it does not exist yet.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub fn send(&self, action: R::Action) {
        metrics::counter!("store.actions.total").increment(1);
        match self.backing() {
            Backing::Live { actions, .. } => actions.send(action),
            Backing::Stub { actions, log } => {
                match log.lock() {
                    Ok(mut log) => log.push(action.clone()),
                    Err(poisoned) => poisoned.into_inner().push(action.clone()),
                }
                actions.send(action);
            }
        }
    }

    /// Snapshot the current state.
    ///
    /// Cheap and synchronous; never constructs the state stream. Before
    /// construction it yields the initial state.
    #[must_use]
    pub fn current_state(&self) -> R::State {
        self.inner.relay.value()
    }

    /// Subscribe to the state stream.
    ///
    /// The subscription's first delivery is the current state (the initial
    /// state if nothing has been folded yet); after that it receives every
    /// state as it is produced. Forces construction.
    #[must_use]
    pub fn state(&self) -> Subscription<R::State> {
        let _ = self.backing();
        self.inner.relay.subscribe()
    }

    /// Subscribe to the action channel.
    ///
    /// Observes every action sent after this call — from views, effects,
    /// or (in stub mode) tests. Forces construction.
    #[must_use]
    pub fn actions(&self) -> Subscription<R::Action> {
        match self.backing() {
            Backing::Live { actions, .. } | Backing::Stub { actions, .. } => actions.subscribe(),
        }
    }

    /// Whether this store was created with [`stubbed`](Self::stubbed).
    #[must_use]
    pub fn is_stub_enabled(&self) -> bool {
        matches!(self.inner.mode, Mode::Stub)
    }

    /// Access the stub backing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StubDisabled`] if the store was not created
    /// with [`stubbed`](Self::stubbed).
    pub fn stub(&self) -> Result<Stub<'_, R>, StoreError> {
        match self.backing() {
            Backing::Stub { log, .. } => Ok(Stub::new(&self.inner.relay, log)),
            Backing::Live { .. } => Err(StoreError::StubDisabled),
        }
    }

    /// Get or create the backing, single-flight.
    fn backing(&self) -> &Backing<R::Action> {
        self.inner.backing.get_or_init(|| match self.inner.mode {
            Mode::Live => build_engine(&self.inner),
            Mode::Stub => Backing::Stub {
                actions: ActionSubject::new(),
                log: Mutex::new(Vec::new()),
            },
        })
    }
}

impl<R: Reactor> StoreInner<R> {
    /// One fold step. A panicking reducer is contained here: the previous
    /// state is kept and the stream continues.
    fn fold(&self, state: R::State, mutation: R::Mutation) -> R::State {
        let previous = state.clone();
        let started = std::time::Instant::now();
        let next = catch_unwind(AssertUnwindSafe(|| self.reactor.reduce(state, mutation)));
        metrics::histogram!("store.reduce.duration_seconds")
            .record(started.elapsed().as_secs_f64());
        match next {
            Ok(next) => next,
            Err(_) => {
                tracing::warn!("reducer panicked; keeping previous state");
                metrics::counter!("store.reduce.panics").increment(1);
                previous
            }
        }
    }
}

/// Construct the live engine: wire channel → mutate fan-out → fold → relay
/// and start the single driver task.
///
/// Pipeline order (each hook invoked exactly once, here):
/// `transform_action` → `mutate` per action, flattened unordered →
/// `transform_mutation` → serialized fold via `reduce`, seeded and
/// prefixed with the initial state → `transform_state` → relay tap.
fn build_engine<R: Reactor>(inner: &Arc<StoreInner<R>>) -> Backing<R::Action> {
    tracing::debug!("constructing state stream");

    let actions = ActionSubject::new();
    let ctx = MutationContext::new(actions.clone(), inner.relay.clone());

    let action_stream: ActionStream<R::Action> = Box::pin(actions.subscribe());
    let action_stream = inner.reactor.transform_action(action_stream);

    let weak = Arc::downgrade(inner);
    let merged: MutationStream<R::Mutation> = action_stream
        .map(move |action| mutate_one(&weak, &ctx, action))
        .flatten_unordered(inner.config.effect_concurrency)
        .map(Ok)
        .boxed();

    let mutations = inner.reactor.transform_mutation(merged).filter_map(|result| {
        future::ready(match result {
            Ok(mutation) => Some(mutation),
            Err(error) => {
                // An error injected by the mutation transform hook must not
                // terminate the state stream; drop the item instead.
                tracing::warn!(%error, "transformed mutation stream yielded an error; dropping");
                metrics::counter!("store.mutations.failed").increment(1);
                None
            }
        })
    });

    let weak = Arc::downgrade(inner);
    let seed = inner.initial_state.clone();
    let folded = mutations.scan(seed.clone(), move |state, mutation| {
        let Some(inner) = weak.upgrade() else {
            return future::ready(None);
        };
        let next = inner.fold(state.clone(), mutation);
        *state = next.clone();
        future::ready(Some(next))
    });

    let states: StateStream<R::State> = stream::once(future::ready(seed)).chain(folded).boxed();
    let states = inner.reactor.transform_state(states);

    let weak = Arc::downgrade(inner);
    let driver = tokio::spawn(drive(weak, states));

    Backing::Live { actions, _driver: DriverHandle(driver) }
}

/// Run one action through `mutate`, truncating its mutation stream at the
/// first error (the effect-failure swallowing policy).
fn mutate_one<R: Reactor>(
    weak: &Weak<StoreInner<R>>,
    ctx: &MutationContext<R::Action, R::State>,
    action: R::Action,
) -> BoxStream<'static, R::Mutation> {
    let Some(inner) = weak.upgrade() else {
        return stream::empty().boxed();
    };
    inner
        .reactor
        .mutate(action, ctx)
        .take_while(|result| {
            if let Err(error) = result {
                tracing::warn!(%error, "effect failed; truncating its mutation stream");
                metrics::counter!("store.mutations.failed").increment(1);
            }
            future::ready(result.is_ok())
        })
        .filter_map(|result| future::ready(result.ok()))
        .boxed()
}

/// The single long-lived subscription: pull each state and tap it into the
/// relay, which updates the current-state cell before delivering to
/// listeners. Holds only a weak reference so a forgotten driver cannot keep
/// a store alive.
async fn drive<R: Reactor>(weak: Weak<StoreInner<R>>, mut states: StateStream<R::State>) {
    while let Some(state) = states.next().await {
        let Some(inner) = weak.upgrade() else { break };
        inner.relay.accept(state);
    }
    tracing::trace!("state stream ended");
}

/// Owns the driver task; aborting on drop releases the engine's upstream
/// subscription and cancels in-flight effects.
pub(crate) struct DriverHandle(JoinHandle<()>);

impl Drop for DriverHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}
