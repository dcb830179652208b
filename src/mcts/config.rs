//! Search configuration parameters.

use serde::{Deserialize, Serialize};

use crate::heuristics::HeuristicKind;

use super::budget::BudgetRule;

/// Tunable parameters for one search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Ply at which the tree stops expanding and hands deep branches to the
    /// pessimistic rollout.
    pub search_depth: u16,

    /// Ply bound for the standard rollout, counted from the root.
    pub rollout_depth: u16,

    /// Ply bound for the pessimistic rollout. Typically larger than
    /// `rollout_depth`; each pessimistic ply costs three forward steps.
    pub pessimistic_depth: u16,

    /// Exploration constant K in the bandit formula (default: sqrt(2)).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Small epsilon guarding every division and feeding tie-break noise.
    pub epsilon: f64,

    /// Stopping rule for the decision loop.
    pub budget: BudgetRule,

    /// Sample opponents from the learned frequency model. When false every
    /// non-controlled seat plays uniformly at random.
    pub probabilistic_model: bool,

    /// Heuristic variant bound to the tree at construction.
    pub heuristic: HeuristicKind,

    /// Seed for the agent's RNG stream.
    /// Same seed produces deterministic decisions.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_depth: 6,
            rollout_depth: 10,
            pessimistic_depth: 12,
            exploration_constant: std::f64::consts::SQRT_2,
            epsilon: 1e-6,
            budget: BudgetRule::Time { millis: 40 },
            probabilistic_model: true,
            heuristic: HeuristicKind::default(),
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Create a config with a custom budget rule.
    pub fn with_budget(mut self, budget: BudgetRule) -> Self {
        self.budget = budget;
        self
    }

    /// Create a config with a custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a config with a custom search depth.
    pub fn with_search_depth(mut self, depth: u16) -> Self {
        self.search_depth = depth;
        self
    }

    /// Create a config with a custom rollout depth.
    pub fn with_rollout_depth(mut self, depth: u16) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Create a config with a custom exploration constant.
    pub fn with_exploration(mut self, k: f64) -> Self {
        self.exploration_constant = k;
        self
    }

    /// Create a config with the opponent model toggled.
    pub fn with_probabilistic_model(mut self, enabled: bool) -> Self {
        self.probabilistic_model = enabled;
        self
    }

    /// Create a config with a custom heuristic variant.
    pub fn with_heuristic(mut self, kind: HeuristicKind) -> Self {
        self.heuristic = kind;
        self
    }

    /// Replace out-of-range values with their defaults.
    ///
    /// Depth parameters must be at least 1, epsilon and the exploration
    /// constant must be positive and finite, and budget limits must be
    /// non-zero.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.search_depth == 0 {
            self.search_depth = defaults.search_depth;
        }
        if self.rollout_depth == 0 {
            self.rollout_depth = defaults.rollout_depth;
        }
        if self.pessimistic_depth == 0 {
            self.pessimistic_depth = defaults.pessimistic_depth;
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            self.epsilon = defaults.epsilon;
        }
        if !(self.exploration_constant.is_finite() && self.exploration_constant >= 0.0) {
            self.exploration_constant = defaults.exploration_constant;
        }
        self.budget = self.budget.validated(defaults.budget);

        self
    }
}
