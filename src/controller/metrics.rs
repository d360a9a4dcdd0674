//! Mutation metrics
//!
//! Records one set of measurements per optimistic mutation through the
//! `metrics` facade. Without an installed recorder every call is a no-op.
//!
//! # Metrics
//!
//! - `chatroll_mutations_total`: counter of started mutations by kind
//! - `chatroll_mutation_outcomes_total`: counter of finished mutations by kind and outcome
//! - `chatroll_mutation_duration_seconds`: histogram of time spent waiting on the backend
//! - `chatroll_mutations_in_flight`: gauge of mutations awaiting the backend
//!
//! # Examples
//!
//! ```
//! use chatroll::controller::metrics::MutationMetrics;
//! use chatroll::controller::MutationKind;
//!
//! let metrics = MutationMetrics::start(MutationKind::ToggleFavorite);
//! metrics.record_outcome("confirmed");
//! ```

use super::MutationKind;
use ::metrics::{decrement_gauge, histogram, increment_counter, increment_gauge};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Metrics for one in-flight mutation
///
/// Dropping the value before an outcome is recorded counts the mutation as
/// `abandoned`, so the in-flight gauge stays balanced when a caller drops
/// the mutation future.
#[derive(Debug)]
pub struct MutationMetrics {
    kind: MutationKind,
    start: Instant,
    recorded: AtomicBool,
}

impl MutationMetrics {
    /// Count a new mutation of `kind` and start its timer
    pub fn start(kind: MutationKind) -> Self {
        increment_counter!("chatroll_mutations_total", "kind" => kind.as_str());
        increment_gauge!("chatroll_mutations_in_flight", 1.0);

        Self {
            kind,
            start: Instant::now(),
            recorded: AtomicBool::new(false),
        }
    }

    /// Record how the mutation ended
    ///
    /// Only the first call has an effect.
    pub fn record_outcome(&self, outcome: &'static str) {
        if self.recorded.swap(true, Ordering::SeqCst) {
            return;
        }

        histogram!(
            "chatroll_mutation_duration_seconds",
            self.elapsed().as_secs_f64(),
            "kind" => self.kind.as_str()
        );

        increment_counter!(
            "chatroll_mutation_outcomes_total",
            "kind" => self.kind.as_str(),
            "outcome" => outcome
        );

        decrement_gauge!("chatroll_mutations_in_flight", 1.0);
    }

    /// Returns `true` once an outcome has been recorded
    pub fn is_recorded(&self) -> bool {
        self.recorded.load(Ordering::SeqCst)
    }

    /// Time since [`MutationMetrics::start`]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for MutationMetrics {
    fn drop(&mut self) {
        if !self.is_recorded() {
            self.record_outcome("abandoned");
        }
    }
}
