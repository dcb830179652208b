//! Hand-authored baseline scorer.

use crate::core::Seat;
use crate::game::{Board, ForwardModel, Position, Tile};

use super::StateHeuristic;

pub(super) fn count_tile(board: &Board, wanted: Tile) -> u32 {
    let mut count = 0;
    for y in 0..board.height() {
        for x in 0..board.width() {
            let pos = Position::new(x as i32, y as i32);
            if board.tile_at(pos) == Some(wanted) {
                count += 1;
            }
        }
    }
    count
}

pub(super) fn enemies_on_board(board: &Board, own: Seat) -> u32 {
    board
        .scan_seats()
        .iter()
        .filter(|(seat, pos)| *seat != own && pos.is_some())
        .count() as u32
}

/// Survival-and-eliminations scorer.
///
/// Rewards enemy eliminations and cleared wood relative to the root
/// snapshot, with elimination of the owning seat dominating everything
/// else. Scores land in [-1, 1].
pub struct CustomHeuristic {
    own_seat: Seat,
    root_enemies: u32,
    root_wood: u32,
}

impl CustomHeuristic {
    /// Snapshot baseline features from the root state.
    pub fn from_root<M: ForwardModel>(model: &M, root: &M::State) -> Self {
        let own_seat = model.acting_seat(root);
        let board = model.board(root);
        Self {
            own_seat,
            root_enemies: enemies_on_board(board, own_seat),
            root_wood: count_tile(board, Tile::Wood),
        }
    }
}

impl<M: ForwardModel> StateHeuristic<M> for CustomHeuristic {
    fn evaluate(&self, model: &M, state: &M::State) -> f64 {
        let board = model.board(state);
        let seats = board.scan_seats();

        if seats[self.own_seat].is_none() {
            return -1.0;
        }

        let enemies = enemies_on_board(board, self.own_seat);
        if enemies == 0 {
            return 1.0;
        }

        let eliminated = self.root_enemies.saturating_sub(enemies) as f64;
        let wood_cleared = self
            .root_wood
            .saturating_sub(count_tile(board, Tile::Wood)) as f64;

        (0.3 * eliminated + 0.05 * wood_cleared).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, SeatMap};
    use crate::game::mini::MiniArena;
    use crate::game::Position;

    #[test]
    fn test_neutral_start_scores_zero() {
        let arena = MiniArena::new(4, 4, 10);
        let state = arena.initial_state(Seat::new(0));
        let heuristic = CustomHeuristic::from_root(&arena, &state);

        assert_eq!(heuristic.evaluate(&arena, &state), 0.0);
    }

    #[test]
    fn test_score_is_stable_across_harmless_steps() {
        let arena = MiniArena::new(4, 4, 10);
        let mut state = arena.initial_state(Seat::new(0));
        let heuristic = CustomHeuristic::from_root(&arena, &state);

        arena.step(&mut state, &SeatMap::with_value(Action::Stop));
        let score = heuristic.evaluate(&arena, &state);
        assert!((-1.0..=1.0).contains(&score));
    }

    #[test]
    fn test_losing_own_pawn_is_worst() {
        let arena = MiniArena::new(4, 4, 10);
        let root = arena.initial_state(Seat::new(0));
        let heuristic = CustomHeuristic::from_root(&arena, &root);

        // A state observed by seat 0 whose pawn shares a tile with seat 1's:
        // the board scan then only shows the overlapping pawn, so seat 0
        // reads as gone.
        let mut dead = root.clone();
        dead.place_pawn(Seat::new(0), Position::new(3, 0));

        assert_eq!(heuristic.evaluate(&arena, &dead), -1.0);
    }
}
