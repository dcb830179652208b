//! The forward-model boundary: board vocabulary and the simulator contract.
//!
//! The search never implements game rules. It explores hypothetical futures
//! through a [`ForwardModel`] the caller supplies: deep-copyable states,
//! a synchronous joint step, a terminal test, and read-only accessors for
//! the acting seat, its position, and the tile grid. Everything the agent
//! knows about the world arrives through this trait.
//!
//! [`mini`] holds a miniature deterministic model used by tests and benches.

pub mod mini;

use serde::{Deserialize, Serialize};

use crate::core::{Action, Seat, SeatMap};

/// Length of a team-radio message payload, in words.
pub const MESSAGE_LENGTH: usize = 4;

/// A grid coordinate. `x` grows rightwards, `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position reached by taking `action` from here.
    ///
    /// Non-displacing actions return the same position.
    #[must_use]
    pub fn translated(self, action: Action) -> Self {
        let (dx, dy) = action.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Tile-type symbols the board accessor speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Walkable empty tile.
    Passage,
    /// Indestructible wall.
    Rigid,
    /// Destructible wooden wall.
    Wood,
    /// A planted bomb.
    Bomb,
    /// A burning tile. Walking into it is lethal.
    Flames,
    /// Unobserved tile (partially observable modes).
    Fog,
    /// Extra-bomb power-up.
    ExtraBomb,
    /// Blast-range power-up.
    IncrRange,
    /// Kick power-up.
    Kick,
    /// Seat 0's pawn.
    Agent0,
    /// Seat 1's pawn.
    Agent1,
    /// Seat 2's pawn.
    Agent2,
    /// Seat 3's pawn.
    Agent3,
}

impl Tile {
    /// The pawn tile for a seat.
    #[must_use]
    pub fn agent(seat: Seat) -> Tile {
        match seat.index() {
            0 => Tile::Agent0,
            1 => Tile::Agent1,
            2 => Tile::Agent2,
            _ => Tile::Agent3,
        }
    }

    /// The seat whose pawn this tile is, if any.
    #[must_use]
    pub fn seat(self) -> Option<Seat> {
        match self {
            Tile::Agent0 => Some(Seat::new(0)),
            Tile::Agent1 => Some(Seat::new(1)),
            Tile::Agent2 => Some(Seat::new(2)),
            Tile::Agent3 => Some(Seat::new(3)),
            _ => None,
        }
    }
}

/// A rectangular grid of tile symbols, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// Create a board filled with one tile type.
    #[must_use]
    pub fn filled(width: usize, height: usize, fill: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; width * height],
        }
    }

    /// Board width in tiles.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Board height in tiles.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Check whether a coordinate lies on the board.
    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && (pos.x as usize) < self.width && pos.y >= 0 && (pos.y as usize) < self.height
    }

    /// The tile at a coordinate, or `None` when out of bounds.
    #[must_use]
    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        if self.in_bounds(pos) {
            Some(self.tiles[pos.y as usize * self.width + pos.x as usize])
        } else {
            None
        }
    }

    /// Overwrite the tile at an in-bounds coordinate.
    ///
    /// Panics when the coordinate is out of bounds.
    pub fn set(&mut self, pos: Position, tile: Tile) {
        assert!(self.in_bounds(pos), "board coordinate out of bounds: {pos:?}");
        self.tiles[pos.y as usize * self.width + pos.x as usize] = tile;
    }

    /// Locate each seat's pawn tile by scanning the grid.
    ///
    /// A seat whose pawn is not on the board (eliminated, or hidden by fog)
    /// maps to `None`.
    #[must_use]
    pub fn scan_seats(&self) -> SeatMap<Option<Position>> {
        let mut positions: SeatMap<Option<Position>> = SeatMap::with_value(None);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x as i32, y as i32);
                if let Some(seat) = self.tiles[y * self.width + x].seat() {
                    positions[seat] = Some(pos);
                }
            }
        }
        positions
    }

    /// Check whether a bomb tile sits at a coordinate.
    #[must_use]
    pub fn bomb_at(&self, pos: Position) -> bool {
        self.tile_at(pos) == Some(Tile::Bomb)
    }
}

/// Match mode reported by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Four seats, last one standing.
    FreeForAll,
    /// Two teams of two.
    Team,
    /// Two teams of two with a message channel between teammates.
    TeamRadio,
}

/// The simulator contract the search depends on.
///
/// A `State` clone is an independent deep copy: stepping one copy never
/// touches another. `step` is deterministic given the joint action vector
/// (any internal simulator randomness is the simulator's own concern) and
/// mutates only the state passed to it, so the tree can explore futures
/// from fresh copies of the real state.
pub trait ForwardModel {
    /// One full game state snapshot.
    type State: Clone;

    /// Advance the state by one tick with one action per seat.
    fn step(&self, state: &mut Self::State, joint: &SeatMap<Action>);

    /// Test whether the game has ended in this state.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// The seat observing this state.
    fn acting_seat(&self, state: &Self::State) -> Seat;

    /// Grid position of the acting seat.
    fn position(&self, state: &Self::State) -> Position;

    /// The full tile grid of this state.
    fn board<'a>(&self, state: &'a Self::State) -> &'a Board;

    /// Number of legal actions in this state.
    fn action_count(&self, state: &Self::State) -> usize;

    /// The active match mode.
    fn game_mode(&self, state: &Self::State) -> GameMode;

    /// Team-radio payload observed by the acting seat, if any.
    ///
    /// Only meaningful when [`game_mode`](Self::game_mode) is
    /// [`GameMode::TeamRadio`].
    fn message(&self, _state: &Self::State) -> Option<[i32; MESSAGE_LENGTH]> {
        None
    }
}
