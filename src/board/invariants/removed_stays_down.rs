//! Removed cells invariant: removal is final and face-down.

use super::Invariant;
use crate::board::state::BoardState;

/// Invariant: a removed cell is face-down.
///
/// Removal clears both the card and the orientation in the same step; a
/// face-up removed cell would render as neither `none` nor a card.
pub(crate) struct RemovedStaysDown;

impl Invariant<BoardState> for RemovedStaysDown {
    fn holds(state: &BoardState) -> bool {
        state
            .cells()
            .iter()
            .all(|cell| !cell.is_removed() || !cell.is_face_up())
    }

    fn description() -> &'static str {
        "removed cells are face-down"
    }
}
