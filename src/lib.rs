//! # pommer
//!
//! A pessimistic Monte Carlo tree search agent for four-seat,
//! Bomberman-style grid arenas.
//!
//! ## Design Principles
//!
//! 1. **The game is a collaborator, not a dependency**: the agent explores
//!    futures exclusively through the [`game::ForwardModel`] trait the
//!    caller implements. No game rules live in this crate.
//!
//! 2. **Deterministic**: every randomized decision draws from one owned,
//!    explicitly seeded stream. Same seed, state, and configuration
//!    reproduce the same action and visit counts.
//!
//! 3. **Budget-driven**: a decision runs to a wall-clock deadline, a
//!    playout count, or a forward-call bound, and returns its best answer
//!    when the budget runs out.
//!
//! ## Architecture
//!
//! - **Pessimistic two-phase rollouts**: branches that reach the
//!   search-depth threshold are scored by a conservative rollout that
//!   forces two no-op steps before every move, pulling deep estimates
//!   downward on purpose.
//!
//! - **Opponent modeling from board deltas**: the driver never sees other
//!   seats' choices; it reconstructs them from consecutive board snapshots
//!   and feeds a per-seat action-frequency model into the search's joint
//!   steps.
//!
//! - **Arena tree**: nodes index into a flat vector, parent links are
//!   plain indices, and the whole tree is dropped after every decision.
//!
//! ## Modules
//!
//! - `core`: seats, actions, fixed-size tables, RNG
//! - `game`: the forward-model boundary and board vocabulary
//! - `heuristics`: pluggable state scorers
//! - `opponent`: action inference and frequency modeling
//! - `mcts`: the search tree, budgets, and the decision loop
//! - `agent`: the per-tick driver

pub mod agent;
pub mod core;
pub mod game;
pub mod heuristics;
pub mod mcts;
pub mod opponent;

// Re-export commonly used types
pub use crate::core::{Action, ActionTable, AgentRng, Seat, SeatMap, ACTION_COUNT, SEAT_COUNT};

pub use crate::game::{
    Board, ForwardModel, GameMode, Position, Tile, MESSAGE_LENGTH,
};

pub use crate::heuristics::{
    AdvancedHeuristic, CustomHeuristic, HeuristicKind, ModifiedAdvancedHeuristic, StateHeuristic,
};

pub use crate::opponent::{infer_actions, OpponentModel};

pub use crate::mcts::{
    BudgetRule, DecisionBudget, NodeId, SearchConfig, SearchError, SearchNode, SearchStats,
    SearchTree, TreeSearch,
};

pub use crate::agent::PessimisticAgent;
