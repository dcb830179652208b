//! Richer tuned scorers: mobility, hazard proximity, power-ups.

use crate::core::{Action, Seat};
use crate::game::{Board, ForwardModel, Position, Tile};

use super::custom::{count_tile, enemies_on_board};
use super::StateHeuristic;

const DIRECTIONS: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

/// Count walkable orthogonal neighbors of a position.
fn mobility(board: &Board, pos: Position) -> u32 {
    DIRECTIONS
        .iter()
        .filter(|&&dir| {
            matches!(
                board.tile_at(pos.translated(dir)),
                Some(Tile::Passage | Tile::ExtraBomb | Tile::IncrRange | Tile::Kick)
            )
        })
        .count() as u32
}

/// Count orthogonal neighbors that are burning.
fn adjacent_flames(board: &Board, pos: Position) -> u32 {
    DIRECTIONS
        .iter()
        .filter(|&&dir| board.tile_at(pos.translated(dir)) == Some(Tile::Flames))
        .count() as u32
}

/// Manhattan distance from `pos` to the nearest enemy pawn, if any survive.
fn nearest_enemy_distance(board: &Board, own: Seat, pos: Position) -> Option<i32> {
    board
        .scan_seats()
        .iter()
        .filter(|(seat, _)| *seat != own)
        .filter_map(|(_, enemy)| *enemy)
        .map(|e| (e.x - pos.x).abs() + (e.y - pos.y).abs())
        .min()
}

struct Weights {
    elimination: f64,
    mobility: f64,
    hazard: f64,
    enemy_distance: f64,
    powerup: f64,
}

fn score(board: &Board, own_seat: Seat, root_enemies: u32, weights: &Weights) -> f64 {
    let seats = board.scan_seats();

    let Some(own_pos) = seats[own_seat] else {
        return -1.0;
    };

    let enemies = enemies_on_board(board, own_seat);
    if enemies == 0 {
        return 1.0;
    }

    let eliminated = root_enemies.saturating_sub(enemies) as f64;
    let mut value = weights.elimination * eliminated;

    value += weights.mobility * mobility(board, own_pos) as f64;
    value -= weights.hazard * adjacent_flames(board, own_pos) as f64;

    if let Some(dist) = nearest_enemy_distance(board, own_seat, own_pos) {
        // Mild pressure towards the closest surviving enemy.
        value -= weights.enemy_distance * dist as f64;
    }

    value += weights.powerup * count_tile(board, Tile::ExtraBomb) as f64;

    value.clamp(-1.0, 1.0)
}

/// Mobility-and-hazard-aware scorer.
pub struct AdvancedHeuristic {
    own_seat: Seat,
    root_enemies: u32,
}

impl AdvancedHeuristic {
    const WEIGHTS: Weights = Weights {
        elimination: 0.3,
        mobility: 0.02,
        hazard: 0.15,
        enemy_distance: 0.005,
        powerup: 0.0,
    };

    /// Snapshot baseline features from the root state.
    pub fn from_root<M: ForwardModel>(model: &M, root: &M::State) -> Self {
        let own_seat = model.acting_seat(root);
        Self {
            own_seat,
            root_enemies: enemies_on_board(model.board(root), own_seat),
        }
    }
}

impl<M: ForwardModel> StateHeuristic<M> for AdvancedHeuristic {
    fn evaluate(&self, model: &M, state: &M::State) -> f64 {
        score(
            model.board(state),
            self.own_seat,
            self.root_enemies,
            &Self::WEIGHTS,
        )
    }
}

/// Retuned advanced scorer that also values visible power-ups.
pub struct ModifiedAdvancedHeuristic {
    own_seat: Seat,
    root_enemies: u32,
}

impl ModifiedAdvancedHeuristic {
    const WEIGHTS: Weights = Weights {
        elimination: 0.35,
        mobility: 0.03,
        hazard: 0.2,
        enemy_distance: 0.002,
        powerup: 0.01,
    };

    /// Snapshot baseline features from the root state.
    pub fn from_root<M: ForwardModel>(model: &M, root: &M::State) -> Self {
        let own_seat = model.acting_seat(root);
        Self {
            own_seat,
            root_enemies: enemies_on_board(model.board(root), own_seat),
        }
    }
}

impl<M: ForwardModel> StateHeuristic<M> for ModifiedAdvancedHeuristic {
    fn evaluate(&self, model: &M, state: &M::State) -> f64 {
        score(
            model.board(state),
            self.own_seat,
            self.root_enemies,
            &Self::WEIGHTS,
        )
    }
}
