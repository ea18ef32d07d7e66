//! # Reactor Rust Core
//!
//! Core traits and channel primitives for the Reactor Rust architecture.
//!
//! This crate defines the vocabulary of a unidirectional state pipeline for
//! interactive views; the `reactor-rust-runtime` crate provides the `Store`
//! that wires it together and keeps it running.
//!
//! ## Core Concepts
//!
//! - **Action**: one unit of user/system intent, pushed by the view
//! - **Mutation**: one discrete state-change instruction, produced
//!   asynchronously by [`Reactor::mutate`] (the only side-effecting stage)
//! - **State**: one complete, immutable snapshot of view-relevant data,
//!   produced by the pure [`Reactor::reduce`] fold
//! - **[`ActionSubject`]**: the multicast action channel; it carries values
//!   only and cannot be terminated by forwarded errors or completions
//! - **[`StateRelay`]**: the current-state cell fused with a replay-1
//!   multicast of the folded state stream
//!
//! ## Architecture Principles
//!
//! - Unidirectional data flow: actions in, states out, never sideways
//! - Side effects confined to `mutate`; `reduce` stays pure and serialized
//! - The output state stream is infallible: effect and fold failures are
//!   swallowed at their stage, never surfaced to listeners
//!
//! ## Example
//!
//! ```ignore
//! use reactor_rust_core::{Reactor, MutationContext, MutationStream, mutation};
//!
//! #[derive(Clone)]
//! enum Action { Increase }
//! enum Mutation { IncreaseValue }
//! #[derive(Clone, Default)]
//! struct State { value: i64 }
//!
//! struct CounterReactor;
//!
//! impl Reactor for CounterReactor {
//!     type Action = Action;
//!     type Mutation = Mutation;
//!     type State = State;
//!
//!     fn initial_state(&self) -> State {
//!         State::default()
//!     }
//!
//!     fn mutate(
//!         &self,
//!         action: Action,
//!         _ctx: &MutationContext<Action, State>,
//!     ) -> MutationStream<Mutation> {
//!         match action {
//!             Action::Increase => mutation::just(Mutation::IncreaseValue),
//!         }
//!     }
//!
//!     fn reduce(&self, state: State, mutation: Mutation) -> State {
//!         match mutation {
//!             Mutation::IncreaseValue => State { value: state.value + 1 },
//!         }
//!     }
//! }
//! ```

/// Error types carried by mutation streams.
pub mod error;

/// Constructors for mutation streams (`just`, `of`, `concat`, `run`, ...).
pub mod mutation;

/// The `Reactor` trait and the context handed to `mutate`.
pub mod reactor;

/// The current-state cell fused with a replay-1 multicast.
pub mod relay;

/// Stream aliases and the per-listener subscription type.
pub mod streams;

/// The multicast action channel.
pub mod subject;

pub use error::EffectError;
pub use mutation::Emitter;
pub use reactor::{MutationContext, Reactor};
pub use relay::StateRelay;
pub use streams::{ActionStream, MutationStream, StateStream, Subscription};
pub use subject::ActionSubject;
