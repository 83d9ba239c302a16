//! Per-actor transient claims.

use super::coordinate::Coordinate;

/// What one actor currently has in flight: the cells it controls (0, 1, or 2)
/// and the pair left over from its previous two-card play, awaiting cleanup
/// (0 or 2).
///
/// Slots are created lazily on first mention of an actor id and live for the
/// board's lifetime. All mutation goes through the board core; the slot is
/// bookkeeping only.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActorSlot {
    controlled: Vec<Coordinate>,
    to_clean_up: Vec<Coordinate>,
}

impl ActorSlot {
    /// Number of cells currently controlled.
    pub(crate) fn count(&self) -> usize {
        self.controlled.len()
    }

    /// Whether a previous play is awaiting cleanup.
    pub(crate) fn has_cleanup(&self) -> bool {
        self.to_clean_up.len() == 2
    }

    pub(crate) fn controls(&self, coord: Coordinate) -> bool {
        self.controlled.contains(&coord)
    }

    pub(crate) fn controlled(&self) -> &[Coordinate] {
        &self.controlled
    }

    pub(crate) fn to_clean_up(&self) -> &[Coordinate] {
        &self.to_clean_up
    }

    /// Records control of `coord`.
    pub(crate) fn grab(&mut self, coord: Coordinate) {
        debug_assert!(self.controlled.len() < 2, "an actor controls at most 2 cells");
        debug_assert!(!self.controlled.contains(&coord), "controlled cells are distinct");
        self.controlled.push(coord);
    }

    /// Drops every claim.
    pub(crate) fn release_all(&mut self) {
        self.controlled.clear();
    }

    /// Defers the post-effects of a finished two-card play.
    pub(crate) fn schedule_cleanup(&mut self, first: Coordinate, second: Coordinate) {
        debug_assert!(self.to_clean_up.is_empty(), "only one play awaits cleanup");
        debug_assert_ne!(first, second, "cleanup coordinates are distinct");
        self.to_clean_up = vec![first, second];
    }

    /// Claims the pending cleanup pair, if any, leaving the slot clean.
    pub(crate) fn take_cleanup(&mut self) -> Option<(Coordinate, Coordinate)> {
        if self.to_clean_up.len() == 2 {
            let second = self.to_clean_up.pop()?;
            let first = self.to_clean_up.pop()?;
            Some((first, second))
        } else {
            None
        }
    }
}

#[cfg(test)]
impl ActorSlot {
    /// Pushes a claim without the usual shape checks, for corrupting state in
    /// invariant tests.
    pub(crate) fn force_push(&mut self, coord: Coordinate) {
        self.controlled.push(coord);
    }

    /// Overwrites the cleanup list without shape checks.
    pub(crate) fn force_cleanup(&mut self, coords: Vec<Coordinate>) {
        self.to_clean_up = coords;
    }
}
