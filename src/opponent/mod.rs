//! Opponent action-frequency modeling.
//!
//! The agent never sees what the other seats chose; it only sees two board
//! snapshots one tick apart. [`infer_actions`] reconstructs a best-effort
//! action per seat from that delta, and [`OpponentModel`] folds each
//! observation into a persistent per-seat probability estimate the search's
//! multi-agent step samples from.
//!
//! The estimate is deliberately rough: frequencies are blended into the
//! previous estimate with an equal-weight average and never renormalized,
//! so a single observation can't dominate and the stored distribution may
//! drift off summing to exactly 1.

use crate::core::{Action, ActionTable, Seat, SeatMap, ACTION_COUNT};
use crate::game::Board;

/// Per-seat action counts and blended probability estimates.
///
/// All four seats carry tables; the search only reads the non-controlled
/// ones. Lives as long as the driver: across ticks of one episode.
#[derive(Clone, Debug)]
pub struct OpponentModel {
    counts: SeatMap<ActionTable<u32>>,
    probs: SeatMap<ActionTable<f64>>,
}

impl Default for OpponentModel {
    fn default() -> Self {
        Self::new()
    }
}

impl OpponentModel {
    /// Create a model with zero counts and uniform probabilities.
    #[must_use]
    pub fn new() -> Self {
        let uniform = 1.0 / ACTION_COUNT as f64;
        Self {
            counts: SeatMap::new(|_| ActionTable::with_value(0)),
            probs: SeatMap::new(|_| ActionTable::with_value(uniform)),
        }
    }

    /// The current probability estimate for a seat, indexed by action.
    #[must_use]
    pub fn probabilities(&self, seat: Seat) -> &ActionTable<f64> {
        &self.probs[seat]
    }

    /// The raw observation counts for a seat, indexed by action.
    #[must_use]
    pub fn counts(&self, seat: Seat) -> &ActionTable<u32> {
        &self.counts[seat]
    }

    /// Fold one observed action for one seat into the estimate.
    ///
    /// Increments the count, recomputes every action's empirical frequency,
    /// and averages each into the stored probability. No renormalization.
    pub fn record(&mut self, seat: Seat, action: Action) {
        self.counts[seat][action] += 1;

        let total: u32 = self.counts[seat].values().iter().sum();
        for observed in Action::ALL {
            let fresh = self.counts[seat][observed] as f64 / total as f64;
            let blended = (self.probs[seat][observed] + fresh) / 2.0;
            self.probs[seat][observed] = blended;
        }
    }

    /// Fold one tick's worth of inferred actions into the estimate.
    ///
    /// Seats with no inferable action this tick are skipped.
    pub fn observe(&mut self, inferred: &SeatMap<Option<Action>>) {
        for seat in Seat::all() {
            if let Some(action) = inferred[seat] {
                self.record(seat, action);
            }
        }
    }
}

/// Reconstruct each seat's most likely action from two board snapshots one
/// tick apart.
///
/// Position deltas map directly to the four moves. An unchanged position is
/// a bomb placement iff bomb-tile presence at that position differs between
/// the snapshots, otherwise a stop. A pawn standing on its fresh bomb hides
/// the bomb tile, so an unchanged position usually reads as a stop; the
/// reconstruction is a best-effort estimate, not ground truth. Seats absent
/// from either snapshot yield no observation.
#[must_use]
pub fn infer_actions(prev: &Board, cur: &Board) -> SeatMap<Option<Action>> {
    let prev_seats = prev.scan_seats();
    let cur_seats = cur.scan_seats();

    SeatMap::new(|seat| {
        let (before, after) = match (prev_seats[seat], cur_seats[seat]) {
            (Some(b), Some(a)) => (b, a),
            _ => return None,
        };

        let action = if after.x < before.x {
            Action::Left
        } else if after.x > before.x {
            Action::Right
        } else if after.y < before.y {
            Action::Up
        } else if after.y > before.y {
            Action::Down
        } else if prev.bomb_at(before) != cur.bomb_at(after) {
            Action::Bomb
        } else {
            Action::Stop
        };
        Some(action)
    })
}
