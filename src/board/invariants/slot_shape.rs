//! Slot shape invariant: claims and cleanup lists keep their legal sizes.

use super::Invariant;
use crate::board::state::BoardState;

/// Invariant: for every actor, at most two cells are controlled, the cleanup
/// list holds exactly zero or two entries, and neither list repeats a
/// coordinate.
pub(crate) struct SlotShape;

impl Invariant<BoardState> for SlotShape {
    fn holds(state: &BoardState) -> bool {
        state.actor_slots().all(|(_, slot)| {
            let controlled = slot.controlled();
            let cleanup = slot.to_clean_up();
            controlled.len() <= 2
                && matches!(cleanup.len(), 0 | 2)
                && pairwise_distinct(controlled)
                && pairwise_distinct(cleanup)
        })
    }

    fn description() -> &'static str {
        "every slot controls at most 2 distinct cells and cleans up 0 or 2"
    }
}

fn pairwise_distinct<T: PartialEq>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(i, item)| !items[..i].contains(item))
}
