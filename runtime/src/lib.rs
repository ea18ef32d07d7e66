//! # Reactor Rust Runtime
//!
//! Runtime implementation for the Reactor Rust architecture.
//!
//! This crate provides the [`Store`] that wires a
//! [`Reactor`](reactor_rust_core::Reactor) into a running pipeline:
//!
//! - actions pushed through the store's action channel,
//! - effects fanned out through `mutate`, their mutation streams flattened
//!   with unordered interleaving,
//! - a serialized, panic-guarded fold through `reduce`,
//! - a replay-1 state stream whose current value is always readable
//!   synchronously.
//!
//! ## Core Components
//!
//! - **[`Store`]**: per-reactor runtime; lazy single-flight construction,
//!   eager self-connecting fold, abort-on-drop teardown
//! - **[`Stub`]**: test backing substituted at construction time,
//!   bypassing `mutate`/`reduce`
//! - **[`StoreConfig`]**: engine tuning knobs
//!
//! ## Example
//!
//! ```ignore
//! use reactor_rust_runtime::Store;
//!
//! let store = Store::new(CounterReactor);
//! let mut states = store.state();
//!
//! store.send(CounterAction::Increase);
//!
//! // First delivery is the current (here: initial) state, then live folds.
//! let initial = states.recv().await;
//! let updated = states.recv().await;
//! ```

/// Prometheus-style metric descriptions for the runtime's observability.
pub mod metrics;

mod store;
mod stub;

pub use store::Store;
pub use stub::Stub;

/// Error types for the Store runtime.
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations.
    ///
    /// The steady-state pipeline is infallible by design (effect and fold
    /// failures are swallowed where they occur); these errors cover misuse
    /// of the store surface itself.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Stub access on a store that was not created with
        /// [`Store::stubbed`](crate::Store::stubbed).
        ///
        /// Stub mode is fixed at construction; it cannot be enabled on a
        /// live store.
        #[error("stub mode is not enabled for this store")]
        StubDisabled,
    }
}

pub use error::StoreError;

/// Configuration for the state stream engine.
///
/// # Example
///
/// ```
/// use reactor_rust_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_effect_concurrency(8);
/// assert_eq!(config.effect_concurrency, Some(8));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Maximum number of per-action mutation streams polled concurrently.
    ///
    /// `None` (the default) places no limit. Lowering this bounds how many
    /// in-flight effects interleave; it does not affect the fold, which is
    /// always serialized.
    pub effect_concurrency: Option<usize>,
}

impl StoreConfig {
    /// Create the default configuration (unlimited effect concurrency).
    #[must_use]
    pub const fn new() -> Self {
        Self { effect_concurrency: None }
    }

    /// Cap the number of concurrently polled mutation streams.
    #[must_use]
    pub const fn with_effect_concurrency(mut self, limit: usize) -> Self {
        self.effect_concurrency = Some(limit);
        self
    }
}
