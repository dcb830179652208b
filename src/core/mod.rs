//! Core vocabulary types: seats, actions, per-seat/per-action tables, RNG.
//!
//! These are the fundamental building blocks shared by the search, the
//! opponent model, and the driver. The action vocabulary and seat count are
//! fixed by the game, so the tables here are array-backed.

pub mod action;
pub mod rng;
pub mod seat;

pub use action::{Action, ActionTable, ACTION_COUNT};
pub use rng::AgentRng;
pub use seat::{Seat, SeatMap, SEAT_COUNT};
