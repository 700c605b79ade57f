//! Metric names and descriptions for the Store runtime.
//!
//! The runtime records through the `metrics` facade only. Installing a
//! recorder (Prometheus, statsd, a test recorder) is left to the binary; with
//! no recorder installed every call is a no-op.

use metrics::{describe_counter, describe_histogram, Unit};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Actions received by `Store::send`, including fed-back actions
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Actions produced by effects and fed back into the reducer
pub const FEEDBACK_TOTAL: &str = "store.feedback.total";

/// Wall-clock time spent inside `Reducer::reduce`
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Effects executed, labelled by effect `label`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Register descriptions for every metric the Store emits.
///
/// Call once after installing a recorder so exporters can publish help text.
pub fn register_metrics() {
    describe_counter!(
        ACTIONS_TOTAL,
        Unit::Count,
        "Total number of actions reduced by the store"
    );
    describe_counter!(
        FEEDBACK_TOTAL,
        Unit::Count,
        "Actions produced by effects and fed back into the reducer"
    );
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent executing the reducer for one action"
    );
    describe_counter!(
        EFFECTS_EXECUTED,
        Unit::Count,
        "Effects executed by the store, by label"
    );
}
