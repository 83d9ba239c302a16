//! Exclusive control invariant: at most one actor per cell.

use super::Invariant;
use crate::board::state::BoardState;
use std::collections::HashSet;

/// Invariant: no coordinate appears in two actors' controlled lists.
///
/// Control is an exclusive claim; two actors holding the same cell would let
/// both treat it as theirs during their second flip.
pub(crate) struct ExclusiveControl;

impl Invariant<BoardState> for ExclusiveControl {
    fn holds(state: &BoardState) -> bool {
        let mut seen = HashSet::new();
        for (_, slot) in state.actor_slots() {
            for &coord in slot.controlled() {
                if !seen.insert(coord) {
                    return false;
                }
            }
        }
        true
    }

    fn description() -> &'static str {
        "no cell is controlled by two actors"
    }
}
