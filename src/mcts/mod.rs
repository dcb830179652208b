//! Pessimistic Monte Carlo tree search.
//!
//! ## Overview
//!
//! An anytime tree search over futures simulated through the caller's
//! forward model. Distinctive pieces:
//!
//! - **Two-phase simulation**: branches that reach the search-depth
//!   threshold are scored with a deliberately conservative rollout that
//!   forces two no-op steps before every move.
//! - **Opponent modeling**: non-controlled seats advance via learned
//!   action-frequency tables instead of pure noise.
//! - **Per-child normalization**: bandit scores normalize each child's mean
//!   through its own observed value range.
//! - **Deterministic**: every random draw comes from one seeded stream, so
//!   identical inputs reproduce identical decisions.
//!
//! ## Usage
//!
//! ```
//! use pommer::core::{AgentRng, Seat};
//! use pommer::game::mini::MiniArena;
//! use pommer::mcts::{BudgetRule, SearchConfig, TreeSearch};
//! use pommer::opponent::OpponentModel;
//!
//! let arena = MiniArena::new(4, 4, 20);
//! let state = arena.initial_state(Seat::new(0));
//!
//! let config = SearchConfig::default()
//!     .with_budget(BudgetRule::Iterations { count: 50 })
//!     .with_search_depth(2);
//! let opponents = OpponentModel::new();
//! let mut rng = AgentRng::new(config.seed);
//!
//! let mut search = TreeSearch::new(&arena, &config, state, &opponents, &mut rng);
//! let action = search.run().expect("consistent tree");
//! assert!(action < 6);
//! ```

pub mod budget;
pub mod config;
pub mod node;
pub mod search;
pub mod stats;
pub mod tree;

pub use budget::{BudgetRule, DecisionBudget};
pub use config::SearchConfig;
pub use node::{NodeId, SearchNode};
pub use search::{safe_random_action, SearchError, TreeSearch};
pub use stats::SearchStats;
pub use tree::SearchTree;
