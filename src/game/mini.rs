//! A miniature deterministic forward model.
//!
//! `MiniArena` implements just enough of the arena to exercise the agent
//! end-to-end: four pawns on a small open grid, bounds-clamped movement,
//! bomb tiles that appear once their placer walks away, and a tick-count
//! terminal condition. No explosions, no power-ups, no simulator
//! randomness. Tests and benches drive the search against it; it is not a
//! substitute for the real game.

use crate::core::{Action, Seat, SeatMap, ACTION_COUNT};
use crate::game::{Board, ForwardModel, GameMode, Position, Tile};

/// Miniature arena simulator.
#[derive(Clone, Debug)]
pub struct MiniArena {
    width: usize,
    height: usize,
    max_ticks: u32,
}

/// One `MiniArena` snapshot.
#[derive(Clone, Debug)]
pub struct MiniState {
    positions: SeatMap<Position>,
    bombs: Vec<Position>,
    board: Board,
    tick: u32,
    observer: Seat,
}

impl MiniArena {
    /// Create an arena of the given size that ends after `max_ticks` ticks.
    #[must_use]
    pub fn new(width: usize, height: usize, max_ticks: u32) -> Self {
        assert!(width >= 2 && height >= 2, "arena must be at least 2x2");
        Self {
            width,
            height,
            max_ticks,
        }
    }

    /// Build the initial state, observed by `observer`.
    ///
    /// The four pawns start in the corners, seat 0 top-left going clockwise.
    #[must_use]
    pub fn initial_state(&self, observer: Seat) -> MiniState {
        let w = self.width as i32 - 1;
        let h = self.height as i32 - 1;
        let corners = [
            Position::new(0, 0),
            Position::new(w, 0),
            Position::new(w, h),
            Position::new(0, h),
        ];
        let positions = SeatMap::new(|s| corners[s.index()]);

        let mut state = MiniState {
            positions,
            bombs: Vec::new(),
            board: Board::filled(self.width, self.height, Tile::Passage),
            tick: 0,
            observer,
        };
        state.rebuild_board(self.width, self.height);
        state
    }
}

impl MiniState {
    /// The current tick count.
    #[must_use]
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Move a pawn for a test setup. The board is rebuilt to match.
    pub fn place_pawn(&mut self, seat: Seat, pos: Position) {
        self.positions[seat] = pos;
        let (w, h) = (self.board.width(), self.board.height());
        self.rebuild_board(w, h);
    }

    fn rebuild_board(&mut self, width: usize, height: usize) {
        let mut board = Board::filled(width, height, Tile::Passage);
        for &bomb in &self.bombs {
            board.set(bomb, Tile::Bomb);
        }
        for (seat, &pos) in self.positions.iter() {
            board.set(pos, Tile::agent(seat));
        }
        self.board = board;
    }
}

impl ForwardModel for MiniArena {
    type State = MiniState;

    fn step(&self, state: &mut MiniState, joint: &SeatMap<Action>) {
        for seat in Seat::all() {
            let action = joint[seat];
            let current = state.positions[seat];

            if action == Action::Bomb {
                if !state.bombs.contains(&current) {
                    state.bombs.push(current);
                }
                continue;
            }

            let target = current.translated(action);
            let occupied = Seat::all()
                .any(|other| other != seat && state.positions[other] == target);
            if state.board.in_bounds(target) && !occupied {
                state.positions[seat] = target;
            }
        }

        state.tick += 1;
        state.rebuild_board(self.width, self.height);
    }

    fn is_terminal(&self, state: &MiniState) -> bool {
        state.tick >= self.max_ticks
    }

    fn acting_seat(&self, state: &MiniState) -> Seat {
        state.observer
    }

    fn position(&self, state: &MiniState) -> Position {
        state.positions[state.observer]
    }

    fn board<'a>(&self, state: &'a MiniState) -> &'a Board {
        &state.board
    }

    fn action_count(&self, _state: &MiniState) -> usize {
        ACTION_COUNT
    }

    fn game_mode(&self, _state: &MiniState) -> GameMode {
        GameMode::FreeForAll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joint(actions: [Action; 4]) -> SeatMap<Action> {
        SeatMap::new(|s| actions[s.index()])
    }

    #[test]
    fn test_initial_layout() {
        let arena = MiniArena::new(3, 3, 10);
        let state = arena.initial_state(Seat::new(0));

        assert_eq!(arena.position(&state), Position::new(0, 0));
        let seats = arena.board(&state).scan_seats();
        assert_eq!(seats[Seat::new(1)], Some(Position::new(2, 0)));
        assert_eq!(seats[Seat::new(2)], Some(Position::new(2, 2)));
        assert_eq!(seats[Seat::new(3)], Some(Position::new(0, 2)));
    }

    #[test]
    fn test_step_moves_and_clamps() {
        let arena = MiniArena::new(3, 3, 10);
        let mut state = arena.initial_state(Seat::new(0));

        // Seat 0 walks right; seat 1 tries to leave the board and stays put.
        arena.step(
            &mut state,
            &joint([Action::Right, Action::Up, Action::Stop, Action::Stop]),
        );

        let seats = arena.board(&state).scan_seats();
        assert_eq!(seats[Seat::new(0)], Some(Position::new(1, 0)));
        assert_eq!(seats[Seat::new(1)], Some(Position::new(2, 0)));
    }

    #[test]
    fn test_bomb_appears_after_placer_leaves() {
        let arena = MiniArena::new(3, 3, 10);
        let mut state = arena.initial_state(Seat::new(0));

        arena.step(
            &mut state,
            &joint([Action::Bomb, Action::Stop, Action::Stop, Action::Stop]),
        );
        // Pawn still covers the bomb.
        assert!(!arena.board(&state).bomb_at(Position::new(0, 0)));

        arena.step(
            &mut state,
            &joint([Action::Right, Action::Stop, Action::Stop, Action::Stop]),
        );
        assert!(arena.board(&state).bomb_at(Position::new(0, 0)));
    }

    #[test]
    fn test_terminal_after_max_ticks() {
        let arena = MiniArena::new(3, 3, 2);
        let mut state = arena.initial_state(Seat::new(0));

        assert!(!arena.is_terminal(&state));
        arena.step(&mut state, &joint([Action::Stop; 4]));
        assert!(!arena.is_terminal(&state));
        arena.step(&mut state, &joint([Action::Stop; 4]));
        assert!(arena.is_terminal(&state));
        assert_eq!(state.tick(), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let arena = MiniArena::new(3, 3, 10);
        let state = arena.initial_state(Seat::new(0));

        let mut copy = state.clone();
        arena.step(&mut copy, &joint([Action::Right, Action::Stop, Action::Stop, Action::Stop]));

        assert_eq!(arena.position(&state), Position::new(0, 0));
        assert_eq!(arena.position(&copy), Position::new(1, 0));
    }
}
