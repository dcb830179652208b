//! The decision loop: selection, expansion, two-phase simulation, and
//! backpropagation.
//!
//! One [`TreeSearch`] serves one decision. It owns a fresh arena rooted at
//! the current real state and repeats playouts until the budget is
//! exhausted:
//!
//! 1. **Tree policy** walks from the root, expanding a random untried
//!    action where one exists and otherwise descending through the
//!    UCB1-style bandit, until the simulated state is terminal or the
//!    search-depth threshold is crossed.
//! 2. **Simulation** continues from the selected node with safe-random
//!    actions, or, exactly at the threshold, with the pessimistic policy
//!    that forces two no-op steps before every move, deliberately biasing
//!    deep branches downward.
//! 3. **Backpropagation** folds the heuristic score into every node on the
//!    path back to the root.
//!
//! Non-controlled seats advance via the opponent model's probability
//! tables on every simulated step.

use std::time::Instant;

use smallvec::SmallVec;
use thiserror::Error;
use tracing::{trace, warn};

use crate::core::{Action, ActionTable, AgentRng, Seat, SeatMap, ACTION_COUNT};
use crate::game::{Board, ForwardModel, Position, Tile};
use crate::heuristics::{build_heuristic, StateHeuristic};
use crate::opponent::OpponentModel;

use super::budget::DecisionBudget;
use super::config::SearchConfig;
use super::node::{noise, NodeId, SearchNode};
use super::stats::SearchStats;
use super::tree::SearchTree;

/// Fatal search failures.
///
/// Anything recoverable (degenerate best-action reads, unsafe-action
/// exhaustion, inference ambiguity) is handled in place; an error here
/// means the tree itself is inconsistent and the decision must be aborted
/// rather than answered with a plausible-looking guess.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The bandit step found no candidate child on a fully-expanded node.
    #[error(
        "bandit selection found no candidate child (depth {depth}, parent visits {visits})"
    )]
    SelectionFailure {
        /// Depth of the node being selected from.
        depth: u16,
        /// Visit count of the node being selected from.
        visits: u32,
    },
}

/// One decision's search, rooted at a snapshot of the real game state.
pub struct TreeSearch<'a, M: ForwardModel> {
    model: &'a M,
    config: &'a SearchConfig,
    opponents: &'a OpponentModel,
    rng: &'a mut AgentRng,
    heuristic: Box<dyn StateHeuristic<M> + 'a>,
    tree: SearchTree,
    root_state: M::State,
    own_seat: Seat,
    stats: SearchStats,
}

impl<'a, M: ForwardModel> TreeSearch<'a, M> {
    /// Build a fresh tree over `root_state`, binding the configured
    /// heuristic variant.
    pub fn new(
        model: &'a M,
        config: &'a SearchConfig,
        root_state: M::State,
        opponents: &'a OpponentModel,
        rng: &'a mut AgentRng,
    ) -> Self {
        let own_seat = model.acting_seat(&root_state);
        let heuristic = build_heuristic(config.heuristic, model, &root_state);

        Self {
            model,
            config,
            opponents,
            rng,
            heuristic,
            tree: SearchTree::new(),
            root_state,
            own_seat,
            stats: SearchStats::new(),
        }
    }

    /// Run playouts until the budget is exhausted and return the index of
    /// the best root action.
    ///
    /// At least one playout always runs; the budget is checked after each
    /// completed iteration.
    pub fn run(&mut self) -> Result<usize, SearchError> {
        let start = Instant::now();
        let mut budget = DecisionBudget::start(self.config.budget);

        loop {
            let iteration_start = Instant::now();
            let mut state = self.root_state.clone();

            let selected = self.tree_policy(&mut state)?;
            let depth = self.tree.get(selected).depth;
            let result = if depth == self.config.search_depth {
                self.pessimistic_rollout(depth, &mut state)
            } else {
                self.rollout(depth, &mut state)
            };
            self.backup(selected, result);

            self.stats.iterations += 1;
            budget.record_iteration(
                iteration_start.elapsed(),
                u32::from(self.config.rollout_depth),
            );
            if budget.exhausted() {
                break;
            }
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;

        let best = self.best_root_action();
        trace!(
            iterations = self.stats.iterations,
            nodes = self.tree.len(),
            fm_calls = self.stats.fm_calls,
            action = best,
            "search complete"
        );
        Ok(best)
    }

    /// Walk the tree policy, advancing `state` alongside, and return the
    /// node to simulate from.
    fn tree_policy(&mut self, state: &mut M::State) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();

        while !self.model.is_terminal(state)
            && self.tree.get(current).depth <= self.config.search_depth
        {
            if !self.tree.get(current).is_fully_expanded() {
                return Ok(self.expand(current, state));
            }
            current = self.select_child(current, state)?;
        }

        Ok(current)
    }

    /// Expand one untried action of `node`, chosen uniformly at random.
    fn expand(&mut self, node: NodeId, state: &mut M::State) -> NodeId {
        let slots: SmallVec<[usize; ACTION_COUNT]> =
            self.tree.get(node).unexpanded_slots().collect();
        let action_index = slots[self.rng.gen_range_usize(0..slots.len())];

        self.roll(state, action_index);

        let depth = self.tree.get(node).depth + 1;
        let child = self
            .tree
            .alloc(SearchNode::new(node, action_index as u8, depth));
        self.tree.get_mut(node).children[action_index] = child;

        self.stats.nodes_expanded += 1;
        if depth > self.stats.max_depth {
            self.stats.max_depth = depth;
        }

        child
    }

    /// Descend one step through the bandit, advancing `state` by the chosen
    /// child's action.
    fn select_child(&mut self, node: NodeId, state: &mut M::State) -> Result<NodeId, SearchError> {
        let parent_visits = self.tree.get(node).visits;
        let epsilon = self.config.epsilon;
        let exploration = self.config.exploration_constant;

        let mut selected = NodeId::NONE;
        let mut selected_index = 0;
        let mut best_score = f64::NEG_INFINITY;

        for index in 0..ACTION_COUNT {
            let child_id = self.tree.get(node).children[index];
            if child_id.is_none() {
                continue;
            }

            let child = self.tree.get(child_id);
            let exploit = child.normalized_mean(epsilon);
            let explore = exploration
                * ((f64::from(parent_visits) + 1.0).ln() / (f64::from(child.visits) + epsilon))
                    .sqrt();
            let raw = exploit + explore;

            let score = noise(raw, epsilon, self.rng.next_f64());
            if score > best_score {
                best_score = score;
                selected = child_id;
                selected_index = index;
            }
        }

        if selected.is_none() {
            let node = self.tree.get(node);
            return Err(SearchError::SelectionFailure {
                depth: node.depth,
                visits: node.visits,
            });
        }

        self.roll(state, selected_index);
        Ok(selected)
    }

    /// Advance `state` by one joint step: the controlled seat takes
    /// `action_index`, every other seat an action from the opponent model
    /// (or a uniform draw).
    fn roll(&mut self, state: &mut M::State, action_index: usize) {
        let chosen = Action::ALL[action_index];
        let mut joint = SeatMap::with_value(Action::Stop);

        for seat in Seat::all() {
            joint[seat] = if seat == self.own_seat {
                chosen
            } else {
                self.opponent_action(state, seat)
            };
        }

        self.model.step(state, &joint);
        self.stats.fm_calls += 1;
    }

    /// Pick one simulated action for a non-controlled seat.
    fn opponent_action(&mut self, state: &M::State, seat: Seat) -> Action {
        if !self.config.probabilistic_model {
            return self.uniform_action(state);
        }

        let probs = self.opponents.probabilities(seat);
        if table_is_flat(probs) {
            // The estimate carries no information yet.
            self.uniform_action(state)
        } else {
            most_probable_action(probs)
        }
    }

    /// Uniform draw over the state's legal action count.
    fn uniform_action(&mut self, state: &M::State) -> Action {
        let count = self.model.action_count(state).min(ACTION_COUNT).max(1);
        Action::ALL[self.rng.gen_range_usize(0..count)]
    }

    /// Bounded random continuation from the selected node, scored by the
    /// heuristic. The depth counter starts at the node's own depth.
    fn rollout(&mut self, node_depth: u16, state: &mut M::State) -> f64 {
        let mut depth = node_depth;

        while depth < self.config.rollout_depth && !self.model.is_terminal(state) {
            let action_index = self.safe_random_action(state);
            self.roll(state, action_index);
            depth += 1;
        }

        self.heuristic.evaluate(self.model, state)
    }

    /// Pessimistic continuation for branches that hit the search-depth
    /// threshold: two forced no-op steps before every move, so deep
    /// branches absorb the danger a shallow tree cannot see.
    fn pessimistic_rollout(&mut self, node_depth: u16, state: &mut M::State) -> f64 {
        let mut depth = node_depth;

        while depth <= self.config.pessimistic_depth && !self.model.is_terminal(state) {
            self.roll(state, Action::Stop.index());
            self.roll(state, Action::Stop.index());

            let action_index = self.safe_random_action(state);
            self.roll(state, action_index);
            depth += 1;
        }

        self.heuristic.evaluate(self.model, state)
    }

    fn safe_random_action(&mut self, state: &M::State) -> usize {
        safe_random_action(
            self.model.board(state),
            self.model.position(state),
            self.model.action_count(state),
            self.rng,
        )
    }

    /// Fold `result` into every node from `node` up to the root.
    fn backup(&mut self, node: NodeId, result: f64) {
        let mut current = node;
        while !current.is_none() {
            let n = self.tree.get_mut(current);
            n.record(result);
            current = n.parent;
        }
    }

    /// Most-visited root child, with noise breaking exact ties.
    ///
    /// Falls back to the highest normalized mean when every expanded child
    /// has the same visit count, and to action 0 when nothing was ever
    /// expanded.
    fn best_root_action(&mut self) -> usize {
        let epsilon = self.config.epsilon;
        let root = self.tree.root();

        let mut selected: Option<usize> = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut first_visits: Option<u32> = None;
        let mut all_equal = true;

        for index in 0..ACTION_COUNT {
            let child_id = self.tree.get(root).children[index];
            if child_id.is_none() {
                continue;
            }

            let visits = self.tree.get(child_id).visits;
            match first_visits {
                None => first_visits = Some(visits),
                Some(first) if first != visits => all_equal = false,
                _ => {}
            }

            let score = noise(f64::from(visits), epsilon, self.rng.next_f64());
            if score > best_score {
                best_score = score;
                selected = Some(index);
            }
        }

        match selected {
            None => {
                warn!("budget exhausted before any root child was expanded; defaulting to action 0");
                0
            }
            Some(index) if all_equal => self.best_value_action().unwrap_or(index),
            Some(index) => index,
        }
    }

    /// Root child with the highest normalized mean value: the bandit's
    /// value term without the exploration bonus.
    fn best_value_action(&mut self) -> Option<usize> {
        let epsilon = self.config.epsilon;
        let root = self.tree.root();

        let mut selected = None;
        let mut best_score = f64::NEG_INFINITY;

        for index in 0..ACTION_COUNT {
            let child_id = self.tree.get(root).children[index];
            if child_id.is_none() {
                continue;
            }

            let value = self.tree.get(child_id).normalized_mean(epsilon);
            let score = noise(value, epsilon, self.rng.next_f64());
            if score > best_score {
                best_score = score;
                selected = Some(index);
            }
        }

        selected
    }

    /// Per-action visit counts of the root's children (0 when unexpanded).
    #[must_use]
    pub fn root_visit_counts(&self) -> ActionTable<u32> {
        let root = self.tree.root_node();
        ActionTable::new(|action| {
            let child = root.children[action.index()];
            if child.is_none() {
                0
            } else {
                self.tree.get(child).visits
            }
        })
    }

    /// The search tree built so far.
    #[must_use]
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Statistics for the search so far.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

/// Check whether every entry of a probability table is numerically equal.
fn table_is_flat(table: &ActionTable<f64>) -> bool {
    let values = table.values();
    values.iter().all(|&p| p == values[0])
}

/// The action with the highest estimated probability; exact ties resolve
/// to the lowest action index.
fn most_probable_action(table: &ActionTable<f64>) -> Action {
    let mut best = Action::Stop;
    let mut best_prob = f64::NEG_INFINITY;
    for action in Action::ALL {
        if table[action] > best_prob {
            best_prob = table[action];
            best = action;
        }
    }
    best
}

/// Pick a uniformly random action whose landing tile stays on the board
/// and is not burning; fall back to a fully uniform draw when every action
/// is unsafe.
#[must_use]
pub fn safe_random_action(
    board: &Board,
    position: Position,
    action_count: usize,
    rng: &mut AgentRng,
) -> usize {
    let count = action_count.min(ACTION_COUNT).max(1);
    let mut candidates: SmallVec<[usize; ACTION_COUNT]> = (0..count).collect();

    while !candidates.is_empty() {
        let pick = rng.gen_range_usize(0..candidates.len());
        let action_index = candidates[pick];
        let target = position.translated(Action::ALL[action_index]);

        if board.in_bounds(target) && board.tile_at(target) != Some(Tile::Flames) {
            return action_index;
        }
        candidates.swap_remove(pick);
    }

    rng.gen_range_usize(0..count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Seat;
    use crate::game::mini::MiniArena;
    use crate::mcts::budget::BudgetRule;

    fn iteration_config(count: u32) -> SearchConfig {
        SearchConfig::default()
            .with_budget(BudgetRule::Iterations { count })
            .with_search_depth(2)
            .with_rollout_depth(4)
    }

    #[test]
    fn test_run_returns_valid_action() {
        let arena = MiniArena::new(4, 4, 20);
        let state = arena.initial_state(Seat::new(0));
        let config = iteration_config(50);
        let opponents = OpponentModel::new();
        let mut rng = AgentRng::new(config.seed);

        let mut search = TreeSearch::new(&arena, &config, state, &opponents, &mut rng);
        let action = search.run().unwrap();

        assert!(action < ACTION_COUNT);
    }

    #[test]
    fn test_root_visits_equal_iterations() {
        let arena = MiniArena::new(4, 4, 20);
        let state = arena.initial_state(Seat::new(0));
        let config = iteration_config(50);
        let opponents = OpponentModel::new();
        let mut rng = AgentRng::new(config.seed);

        let mut search = TreeSearch::new(&arena, &config, state, &opponents, &mut rng);
        search.run().unwrap();

        assert_eq!(search.stats().iterations, 50);
        assert_eq!(search.tree().root_node().visits, 50);

        // Every child's visits are the number of playouts routed through it.
        let child_total: u32 = search.root_visit_counts().values().iter().sum();
        assert_eq!(child_total, 50);
    }

    #[test]
    fn test_search_is_deterministic() {
        let arena = MiniArena::new(4, 4, 20);
        let config = iteration_config(80).with_seed(1234);
        let opponents = OpponentModel::new();

        let state1 = arena.initial_state(Seat::new(0));
        let mut rng1 = AgentRng::new(config.seed);
        let mut search1 = TreeSearch::new(&arena, &config, state1, &opponents, &mut rng1);
        let action1 = search1.run().unwrap();

        let state2 = arena.initial_state(Seat::new(0));
        let mut rng2 = AgentRng::new(config.seed);
        let mut search2 = TreeSearch::new(&arena, &config, state2, &opponents, &mut rng2);
        let action2 = search2.run().unwrap();

        assert_eq!(action1, action2);
        assert_eq!(search1.root_visit_counts(), search2.root_visit_counts());
    }

    #[test]
    fn test_forward_call_budget_limits_work() {
        let arena = MiniArena::new(4, 4, 20);
        let state = arena.initial_state(Seat::new(0));
        let config = SearchConfig::default()
            .with_budget(BudgetRule::ForwardCalls { count: 25 })
            .with_rollout_depth(10);
        let opponents = OpponentModel::new();
        let mut rng = AgentRng::new(config.seed);

        let mut search = TreeSearch::new(&arena, &config, state, &opponents, &mut rng);
        search.run().unwrap();

        // 25 allowed calls at an estimate of 10 per playout: after the
        // second playout a third would push the estimate past the limit.
        assert_eq!(search.stats().iterations, 2);
    }

    #[test]
    fn test_safe_random_action_avoids_flames() {
        // Acting agent at the center of a 3x3 board, flames on all four
        // orthogonal neighbors: only the non-displacing actions remain.
        let mut board = Board::filled(3, 3, Tile::Passage);
        let center = Position::new(1, 1);
        board.set(center, Tile::Agent0);
        for dir in [Action::Up, Action::Down, Action::Left, Action::Right] {
            board.set(center.translated(dir), Tile::Flames);
        }

        let mut rng = AgentRng::new(99);
        for _ in 0..50 {
            let index = safe_random_action(&board, center, ACTION_COUNT, &mut rng);
            let action = Action::ALL[index];
            assert!(
                !action.is_move(),
                "picked unsafe displacing action {action}"
            );
        }
    }

    #[test]
    fn test_safe_random_action_falls_back_when_nothing_is_safe() {
        // A 1x1 board: every move leaves the board, and stop/bomb stay on
        // the (burning) only tile.
        let mut board = Board::filled(1, 1, Tile::Passage);
        board.set(Position::new(0, 0), Tile::Flames);

        let mut rng = AgentRng::new(7);
        let index = safe_random_action(&board, Position::new(0, 0), ACTION_COUNT, &mut rng);
        assert!(index < ACTION_COUNT);
    }

    #[test]
    fn test_most_probable_action_breaks_ties_by_index() {
        let mut table = ActionTable::with_value(0.1);
        table[Action::Down] = 0.4;
        table[Action::Right] = 0.4;

        assert_eq!(most_probable_action(&table), Action::Down);
    }

    #[test]
    fn test_table_is_flat() {
        let flat = ActionTable::with_value(1.0 / 6.0);
        assert!(table_is_flat(&flat));

        let mut skewed = flat.clone();
        skewed[Action::Bomb] = 0.5;
        assert!(!table_is_flat(&skewed));
    }

    #[test]
    fn test_disabled_opponent_model_still_searches() {
        let arena = MiniArena::new(4, 4, 20);
        let state = arena.initial_state(Seat::new(0));
        let config = iteration_config(30).with_probabilistic_model(false);
        let opponents = OpponentModel::new();
        let mut rng = AgentRng::new(config.seed);

        let mut search = TreeSearch::new(&arena, &config, state, &opponents, &mut rng);
        let action = search.run().unwrap();
        assert!(action < ACTION_COUNT);
    }
}
