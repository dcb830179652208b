//! The search driver: one decision per real game tick.
//!
//! The driver owns everything that persists across ticks (the RNG stream,
//! the opponent model, the cached previous state) and builds a fresh
//! search tree for every decision. Episodes start with [`reset`];
//! everything the driver learned about opponents is discarded there, not
//! between ticks.
//!
//! [`reset`]: PessimisticAgent::reset

use tracing::trace;

use crate::core::{Action, AgentRng, Seat};
use crate::game::{ForwardModel, GameMode, MESSAGE_LENGTH};
use crate::mcts::{SearchConfig, SearchError, SearchStats, TreeSearch};
use crate::opponent::{infer_actions, OpponentModel};

/// Pessimistic-MCTS playing agent.
///
/// ## Usage
///
/// ```
/// use pommer::agent::PessimisticAgent;
/// use pommer::core::Seat;
/// use pommer::game::mini::MiniArena;
/// use pommer::mcts::{BudgetRule, SearchConfig};
///
/// let arena = MiniArena::new(4, 4, 50);
/// let state = arena.initial_state(Seat::new(0));
///
/// let config = SearchConfig::default()
///     .with_budget(BudgetRule::Iterations { count: 50 })
///     .with_search_depth(2);
/// let mut agent = PessimisticAgent::new(arena.clone(), Seat::new(0), config);
///
/// let action = agent.act(&state).expect("consistent search");
/// println!("chose {action}");
/// ```
pub struct PessimisticAgent<M: ForwardModel> {
    model: M,
    config: SearchConfig,
    seat: Seat,
    rng: AgentRng,
    opponents: OpponentModel,
    prev_state: Option<M::State>,
    last_stats: SearchStats,
}

impl<M: ForwardModel> PessimisticAgent<M> {
    /// Create an agent for `seat`, validating the configuration and seeding
    /// the RNG from it.
    pub fn new(model: M, seat: Seat, config: SearchConfig) -> Self {
        let config = config.validated();
        let rng = AgentRng::new(config.seed);

        Self {
            model,
            config,
            seat,
            rng,
            opponents: OpponentModel::new(),
            prev_state: None,
            last_stats: SearchStats::new(),
        }
    }

    /// Reset for a new episode: reseed the RNG, re-validate parameters,
    /// clear the cached previous state, and start the opponent model over.
    pub fn reset(&mut self, seed: u64, seat: Seat) {
        self.config.seed = seed;
        self.config = self.config.clone().validated();
        self.rng = AgentRng::new(seed);
        self.seat = seat;
        self.opponents = OpponentModel::new();
        self.prev_state = None;
        self.last_stats = SearchStats::new();
    }

    /// Choose one action for the current real game state.
    ///
    /// Updates the opponent model from the previous tick's observed board
    /// delta, runs a fresh search to budget exhaustion, caches the state
    /// for the next call, and returns the chosen action.
    pub fn act(&mut self, state: &M::State) -> Result<Action, SearchError> {
        if self.model.game_mode(state) == GameMode::TeamRadio {
            // TODO: feed teammate messages into the opponent model.
            let _payload = self.model.message(state);
        }

        if let Some(prev) = &self.prev_state {
            let inferred = infer_actions(self.model.board(prev), self.model.board(state));
            self.opponents.observe(&inferred);
        }

        let mut search = TreeSearch::new(
            &self.model,
            &self.config,
            state.clone(),
            &self.opponents,
            &mut self.rng,
        );
        let action_index = search.run()?;
        self.last_stats = search.stats().clone();

        self.prev_state = Some(state.clone());

        let action = Action::ALL[action_index];
        trace!(seat = self.seat.index(), %action, "decision made");
        Ok(action)
    }

    /// Default team-radio payload: a leading 1, zero-filled.
    #[must_use]
    pub fn message(&self) -> [i32; MESSAGE_LENGTH] {
        let mut message = [0; MESSAGE_LENGTH];
        message[0] = 1;
        message
    }

    /// The seat this agent plays.
    #[must_use]
    pub fn seat(&self) -> Seat {
        self.seat
    }

    /// The validated configuration in effect.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Statistics from the most recent decision.
    #[must_use]
    pub fn last_stats(&self) -> &SearchStats {
        &self.last_stats
    }

    /// The opponent model accumulated this episode.
    #[must_use]
    pub fn opponent_model(&self) -> &OpponentModel {
        &self.opponents
    }
}
