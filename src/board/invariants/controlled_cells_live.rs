//! Controlled cells invariant: claims refer to present, face-up cards.

use super::Invariant;
use crate::board::state::BoardState;

/// Invariant: every controlled coordinate refers to a cell that still holds
/// a card and is face-up.
///
/// Control is only ever taken on a visible card, and removal always releases
/// control first, so a claim on a removed or face-down cell means the rule
/// table mis-stepped.
pub(crate) struct ControlledCellsLive;

impl Invariant<BoardState> for ControlledCellsLive {
    fn holds(state: &BoardState) -> bool {
        state.actor_slots().all(|(_, slot)| {
            slot.controlled().iter().all(|&coord| {
                let cell = state.cell_at(coord);
                !cell.is_removed() && cell.is_face_up()
            })
        })
    }

    fn description() -> &'static str {
        "every controlled cell holds a face-up card"
    }
}
