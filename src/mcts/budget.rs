//! Decision budgets and the stopping rule.
//!
//! A search runs until its budget is exhausted: a wall-clock deadline, a
//! fixed playout count, or a bound on estimated forward-model calls. The
//! time rule is advisory: it is checked once per completed iteration, so
//! the deadline can be overshot by at most one iteration; the
//! average-iteration-time headroom below exists to bound that overshoot.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Floor under the time rule's headroom check.
const SAFETY_MARGIN: Duration = Duration::from_millis(5);

/// Which stopping rule a search runs under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetRule {
    /// Stop when the remaining wall-clock time cannot fit two more average
    /// iterations (or drops under a fixed safety margin).
    Time {
        /// Total decision time in milliseconds.
        millis: u64,
    },
    /// Stop after a fixed number of playouts.
    Iterations {
        /// Playout count.
        count: u32,
    },
    /// Stop once the estimated number of forward-model calls would exceed
    /// the limit.
    ForwardCalls {
        /// Forward-model call limit.
        count: u32,
    },
}

impl BudgetRule {
    /// Replace zero limits with the given default rule.
    #[must_use]
    pub fn validated(self, default: BudgetRule) -> BudgetRule {
        let degenerate = matches!(
            self,
            BudgetRule::Time { millis: 0 }
                | BudgetRule::Iterations { count: 0 }
                | BudgetRule::ForwardCalls { count: 0 }
        );
        if degenerate {
            default
        } else {
            self
        }
    }
}

/// Read-only stopping rule plus the running tallies it is judged against.
#[derive(Debug)]
pub struct DecisionBudget {
    rule: BudgetRule,
    deadline: Instant,
    iterations: u32,
    accumulated: Duration,
    estimated_calls: u32,
    per_iteration_estimate: u32,
}

impl DecisionBudget {
    /// Start the clock on a fresh decision.
    #[must_use]
    pub fn start(rule: BudgetRule) -> Self {
        let millis = match rule {
            BudgetRule::Time { millis } => millis,
            _ => 0,
        };
        Self {
            rule,
            deadline: Instant::now() + Duration::from_millis(millis),
            iterations: 0,
            accumulated: Duration::ZERO,
            estimated_calls: 0,
            per_iteration_estimate: 0,
        }
    }

    /// Record one completed playout.
    ///
    /// `estimated_calls` is the forward-call estimate charged for this
    /// iteration (the configured rollout depth).
    pub fn record_iteration(&mut self, elapsed: Duration, estimated_calls: u32) {
        self.iterations += 1;
        self.accumulated += elapsed;
        self.estimated_calls += estimated_calls;
        self.per_iteration_estimate = estimated_calls;
    }

    /// Number of playouts recorded so far.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Test the stopping rule.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        match self.rule {
            BudgetRule::Time { .. } => {
                let remaining = self.deadline.saturating_duration_since(Instant::now());
                let average = if self.iterations == 0 {
                    Duration::ZERO
                } else {
                    self.accumulated / self.iterations
                };
                remaining <= 2 * average || remaining <= SAFETY_MARGIN
            }
            BudgetRule::Iterations { count } => self.iterations >= count,
            BudgetRule::ForwardCalls { count } => {
                self.estimated_calls + self.per_iteration_estimate > count
            }
        }
    }
}
