//! Metric descriptions for observability.
//!
//! The runtime records through the [`metrics`] facade; whichever exporter
//! the host application installs will pick these up. Call
//! [`describe_metrics`] once at startup so exporters can attach units and
//! help text.
//!
//! # Recorded metrics
//!
//! | Name | Kind | Meaning |
//! |------|------|---------|
//! | `store.actions.total` | counter | Actions sent into any store |
//! | `store.mutations.failed` | counter | Mutation-stream errors swallowed |
//! | `store.reduce.panics` | counter | Reducer panics contained at the fold |
//! | `store.reduce.duration_seconds` | histogram | Time spent in `reduce` |

use metrics::{Unit, describe_counter, describe_histogram};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Register descriptions for every metric the runtime records.
///
/// Idempotent; safe to call before or after an exporter is installed.
pub fn describe_metrics() {
    describe_counter!(
        "store.actions.total",
        Unit::Count,
        "Total number of actions sent into stores"
    );
    describe_counter!(
        "store.mutations.failed",
        Unit::Count,
        "Mutation-stream errors swallowed by the engine"
    );
    describe_counter!(
        "store.reduce.panics",
        Unit::Count,
        "Reducer panics contained at the fold step"
    );
    describe_histogram!(
        "store.reduce.duration_seconds",
        Unit::Seconds,
        "Time spent in the reduce step per mutation"
    );
}
