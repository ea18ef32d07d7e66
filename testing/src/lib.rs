//! # Reactor Rust Testing
//!
//! Testing utilities and helpers for the Reactor Rust architecture.
//!
//! This crate provides:
//! - [`ReactorTest`]: fluent Given-When-Then testing of the pure fold
//! - [`StateRecorder`]: records a store's delivered state sequence
//! - [`init_tracing`]: env-filtered tracing for test diagnostics
//!
//! Stub-mode stores (recorded actions, directly settable state) live in
//! the runtime crate itself — see `Store::stubbed` — since stub selection
//! is part of store construction.
//!
//! ## Example
//!
//! ```ignore
//! use reactor_rust_runtime::Store;
//! use reactor_rust_testing::StateRecorder;
//!
//! #[tokio::test]
//! async fn increase_folds_to_one() {
//!     let store = Store::new(CounterReactor);
//!     let recorder = StateRecorder::attach(&store);
//!
//!     store.send(CounterAction::Increase);
//!     recorder.wait_for(2).await;
//!
//!     assert_eq!(store.current_state().value, 1);
//! }
//! ```

mod recorder;

pub use reactor_test::ReactorTest;
pub use recorder::StateRecorder;

/// Initialize env-filtered tracing for a test binary.
///
/// Subsequent calls (e.g. from other tests in the same binary) are no-ops.
/// Set `RUST_LOG` to adjust verbosity; defaults to `warn`.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
