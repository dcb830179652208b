//! Pluggable state evaluation.
//!
//! The search never interprets a state itself; it asks a [`StateHeuristic`]
//! for a scalar desirability score from the owning seat's point of view.
//! Three interchangeable variants exist, selected by [`HeuristicKind`] when
//! the tree is built. All of them score from the board accessors alone, so
//! swapping one for another never changes tree logic.

pub mod advanced;
pub mod custom;

pub use advanced::{AdvancedHeuristic, ModifiedAdvancedHeuristic};
pub use custom::CustomHeuristic;

use serde::{Deserialize, Serialize};

use crate::game::ForwardModel;

/// Scores a (possibly non-terminal) state for the owning seat.
///
/// Implementations hold no mutable state and may be evaluated any number of
/// times per search.
pub trait StateHeuristic<M: ForwardModel> {
    /// Scalar desirability of `state` for the seat this heuristic was built
    /// for. Higher is better.
    fn evaluate(&self, model: &M, state: &M::State) -> f64;
}

/// Which heuristic variant the tree binds at construction time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeuristicKind {
    /// Hand-authored scorer: survival and eliminations.
    #[default]
    Custom,
    /// Adds mobility and hazard terms to the custom scorer.
    Advanced,
    /// Retuned advanced variant that also values power-up pickups.
    ModifiedAdvanced,
}

/// Build the configured heuristic variant, snapshotting baseline features
/// from the root state.
pub fn build_heuristic<'m, M: ForwardModel + 'm>(
    kind: HeuristicKind,
    model: &M,
    root: &M::State,
) -> Box<dyn StateHeuristic<M> + 'm> {
    match kind {
        HeuristicKind::Custom => Box::new(CustomHeuristic::from_root(model, root)),
        HeuristicKind::Advanced => Box::new(AdvancedHeuristic::from_root(model, root)),
        HeuristicKind::ModifiedAdvanced => {
            Box::new(ModifiedAdvancedHeuristic::from_root(model, root))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Seat;
    use crate::game::mini::MiniArena;

    #[test]
    fn test_build_all_variants() {
        let arena = MiniArena::new(4, 4, 10);
        let state = arena.initial_state(Seat::new(0));

        for kind in [
            HeuristicKind::Custom,
            HeuristicKind::Advanced,
            HeuristicKind::ModifiedAdvanced,
        ] {
            let heuristic = build_heuristic(kind, &arena, &state);
            let score = heuristic.evaluate(&arena, &state);
            assert!(score.is_finite(), "{kind:?} returned a non-finite score");
        }
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&HeuristicKind::ModifiedAdvanced).unwrap();
        let back: HeuristicKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, HeuristicKind::ModifiedAdvanced);
    }
}
