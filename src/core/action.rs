//! The discrete action vocabulary and per-action data storage.
//!
//! Every seat picks exactly one of six actions per tick: stay put, move in
//! one of four directions, or drop a bomb. The vocabulary is fixed and
//! small, so per-action data lives in array-backed `ActionTable`s rather
//! than hash maps: no missing-key ambiguity, and indexing is O(1).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of actions in the vocabulary.
pub const ACTION_COUNT: usize = 6;

/// One discrete per-tick action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Stay on the current tile.
    Stop = 0,
    /// Move one tile up (decreasing y).
    Up = 1,
    /// Move one tile down (increasing y).
    Down = 2,
    /// Move one tile left (decreasing x).
    Left = 3,
    /// Move one tile right (increasing x).
    Right = 4,
    /// Drop a bomb on the current tile.
    Bomb = 5,
}

impl Action {
    /// All actions, in index order.
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Stop,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Bomb,
    ];

    /// Get the action's index in the vocabulary.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up an action by vocabulary index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    /// Grid displacement (dx, dy) caused by this action.
    ///
    /// `Stop` and `Bomb` leave the seat on its current tile.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Action::Stop | Action::Bomb => (0, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// Check whether this action displaces the seat.
    #[must_use]
    pub const fn is_move(self) -> bool {
        !matches!(self, Action::Stop | Action::Bomb)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Stop => "stop",
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Bomb => "bomb",
        };
        write!(f, "{name}")
    }
}

/// Per-action data storage with O(1) access.
///
/// Backed by a fixed `[T; 6]`, one entry per action in index order.
///
/// ## Example
///
/// ```
/// use pommer::core::{Action, ActionTable};
///
/// let mut counts: ActionTable<u32> = ActionTable::with_value(0);
/// counts[Action::Left] += 1;
/// assert_eq!(counts[Action::Left], 1);
/// assert_eq!(counts[Action::Stop], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionTable<T> {
    data: [T; ACTION_COUNT],
}

impl<T> ActionTable<T> {
    /// Create a new table with values from a factory function.
    pub fn new(factory: impl Fn(Action) -> T) -> Self {
        Self {
            data: [
                factory(Action::Stop),
                factory(Action::Up),
                factory(Action::Down),
                factory(Action::Left),
                factory(Action::Right),
                factory(Action::Bomb),
            ],
        }
    }

    /// Create a new table with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Iterate over (Action, &T) pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, &T)> {
        Action::ALL.iter().map(move |&a| (a, &self.data[a.index()]))
    }

    /// Borrow the raw per-action slice, in index order.
    #[must_use]
    pub fn values(&self) -> &[T; ACTION_COUNT] {
        &self.data
    }
}

impl<T> Index<Action> for ActionTable<T> {
    type Output = T;

    fn index(&self, action: Action) -> &Self::Output {
        &self.data[action.index()]
    }
}

impl<T> IndexMut<Action> for ActionTable<T> {
    fn index_mut(&mut self, action: Action) -> &mut Self::Output {
        &mut self.data[action.index()]
    }
}
