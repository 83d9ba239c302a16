//! The locked board state and the flip rule table.
//!
//! Everything in here runs under the board monitor. Methods mutate the grid,
//! the actor slots, the waiter queues, and the observer set together, so a
//! single critical section sees the board move from one consistent state to
//! the next. Suspension never happens here; when a flip must wait, the caller
//! gets the receiving half of a completion and suspends after the lock drops.

use super::card::Card;
use super::cell::Cell;
use super::changes::ChangeBus;
use super::coordinate::Coordinate;
use super::slot::ActorSlot;
use super::waiters::WaiterRegistry;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::oneshot;
use tracing::debug;

/// What a single pass through the rule table decided.
#[derive(Debug)]
pub(crate) enum FlipStep {
    /// The flip finished; no suspension needed.
    Done,
    /// The target is controlled by someone else; suspend on this completion
    /// and re-enter the rule table when it fires.
    Wait(oneshot::Receiver<()>),
}

/// Grid, actor slots, waiter queues, and observer set, guarded as one unit.
#[derive(Debug)]
pub(crate) struct BoardState {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    actors: HashMap<String, ActorSlot>,
    waiters: WaiterRegistry,
    changes: ChangeBus,
}

impl BoardState {
    /// Builds the grid from row-major cards. The caller has already checked
    /// that `cards.len() == rows * cols` and both dimensions are positive.
    pub(crate) fn new(rows: usize, cols: usize, cards: Vec<Card>) -> Self {
        debug_assert!(rows >= 1 && cols >= 1);
        debug_assert_eq!(cards.len(), rows * cols);
        Self {
            rows,
            cols,
            cells: cards.into_iter().map(Cell::new).collect(),
            actors: HashMap::new(),
            waiters: WaiterRegistry::default(),
            changes: ChangeBus::default(),
        }
    }

    fn index(&self, coord: Coordinate) -> usize {
        coord.row * self.cols + coord.col
    }

    fn cell(&self, coord: Coordinate) -> &Cell {
        &self.cells[self.index(coord)]
    }

    fn cell_mut(&mut self, coord: Coordinate) -> &mut Cell {
        let index = self.index(coord);
        &mut self.cells[index]
    }

    fn cells_match(&self, a: Coordinate, b: Coordinate) -> bool {
        self.cell(a).matches(self.cell(b))
    }

    /// The actor currently controlling `coord`, if any. At most one exists.
    fn controller_of(&self, coord: Coordinate) -> Option<&str> {
        self.actors
            .iter()
            .find(|(_, slot)| slot.controls(coord))
            .map(|(id, _)| id.as_str())
    }

    fn ensure_actor(&mut self, actor: &str) {
        if !self.actors.contains_key(actor) {
            self.actors.insert(actor.to_owned(), ActorSlot::default());
        }
    }

    /// Registers an observer for the next published change.
    pub(crate) fn subscribe(&mut self) -> oneshot::Receiver<()> {
        self.changes.subscribe()
    }

    // ─────────────────────────────────────────────────────────────
    //  The flip rule table
    // ─────────────────────────────────────────────────────────────

    /// Runs one pass of the flip protocol for `actor` aimed at `coord`.
    ///
    /// `resumed` marks a re-entry after a waiter wake-up, which skips the
    /// cleanup prologue (it already ran before the suspension). The coordinate
    /// is in bounds; the board's public surface checked it.
    pub(crate) fn flip_step(&mut self, coord: Coordinate, actor: &str, resumed: bool) -> FlipStep {
        self.ensure_actor(actor);
        let mut changed = false;

        if !resumed {
            changed |= self.run_cleanup(actor);
        }

        let step = match self.actors[actor].count() {
            0 => self.first_card(coord, actor, &mut changed),
            1 => self.second_card(coord, actor, &mut changed),
            _ => unreachable!("cleanup prologue leaves at most one controlled cell"),
        };

        if changed {
            self.changes.publish();
        }
        self.assert_invariants();
        step
    }

    /// Cleanup prologue: settle the actor's previous two-card play.
    ///
    /// A matched pair (still controlled since the match) is removed; a
    /// mismatched pair is turned face-down wherever nobody else has taken the
    /// card over in the meantime. Either way the slot is left empty and the
    /// waiters at both positions are woken, since ownership has released.
    /// Returns whether any cell visibly changed.
    fn run_cleanup(&mut self, actor: &str) -> bool {
        let (pair, held_pair) = {
            let slot = self.actors.get_mut(actor).expect("slot ensured");
            (slot.take_cleanup(), slot.count() == 2)
        };
        let Some((p1, p2)) = pair else {
            return false;
        };
        let mut changed = false;

        if held_pair {
            // The pair stayed controlled and face-up since the match.
            debug_assert!(self.cells_match(p1, p2));
            debug!(actor, first = %p1, second = %p2, "removing matched pair");
            self.cell_mut(p1).remove();
            self.cell_mut(p2).remove();
            changed = true;
        } else {
            for p in [p1, p2] {
                let taken_over = self.controller_of(p).is_some();
                let cell = self.cell(p);
                if !cell.is_removed() && cell.is_face_up() && !taken_over {
                    self.cell_mut(p).turn_down();
                    changed = true;
                }
            }
        }

        if let Some(slot) = self.actors.get_mut(actor) {
            slot.release_all();
        }
        self.waiters.wake_all(p1);
        self.waiters.wake_all(p2);
        changed
    }

    /// Phase A: the actor holds nothing and is trying its first card.
    fn first_card(&mut self, coord: Coordinate, actor: &str, changed: &mut bool) -> FlipStep {
        if self.cell(coord).is_removed() {
            // No card there any more; the flip is a no-op.
            return FlipStep::Done;
        }
        if !self.cell(coord).is_face_up() {
            self.cell_mut(coord).turn_up();
            *changed = true;
            self.slot_mut(actor).grab(coord);
            return FlipStep::Done;
        }
        if self.controller_of(coord).is_none() {
            // Face-up but unclaimed, e.g. left over from someone's mismatch.
            // Taking it over changes ownership, not faces, so no publish.
            self.slot_mut(actor).grab(coord);
            return FlipStep::Done;
        }
        debug!(actor, cell = %coord, "first card is controlled; suspending");
        FlipStep::Wait(self.waiters.enqueue(coord))
    }

    /// Phase B: the actor holds one card and is trying its second.
    fn second_card(&mut self, coord: Coordinate, actor: &str, changed: &mut bool) -> FlipStep {
        let first = self.actors[actor].controlled()[0];

        if self.cell(coord).is_removed() {
            self.relinquish(actor, first);
            return FlipStep::Done;
        }
        if self.controller_of(coord).is_some() {
            // Controlled by anyone, the actor itself included. Giving up the
            // first card instead of waiting breaks the hold-one-wait-for-one
            // cycle between two actors.
            self.relinquish(actor, first);
            return FlipStep::Done;
        }
        if !self.cell(coord).is_face_up() {
            self.cell_mut(coord).turn_up();
            *changed = true;
        }

        if self.cells_match(first, coord) {
            // Matched: both cards stay controlled and face-up until the
            // actor's next flip removes them in the prologue.
            self.slot_mut(actor).grab(coord);
            self.slot_mut(actor).schedule_cleanup(first, coord);
            debug!(actor, first = %first, second = %coord, "matched pair");
        } else {
            self.slot_mut(actor).schedule_cleanup(first, coord);
            self.slot_mut(actor).release_all();
            self.waiters.wake_all(first);
            self.waiters.wake_all(coord);
            debug!(actor, first = %first, second = %coord, "mismatch; cards released face-up");
        }
        FlipStep::Done
    }

    /// Drops the single held card and wakes anyone queued on it.
    fn relinquish(&mut self, actor: &str, first: Coordinate) {
        self.slot_mut(actor).release_all();
        self.waiters.wake_all(first);
    }

    fn slot_mut(&mut self, actor: &str) -> &mut ActorSlot {
        self.actors.get_mut(actor).expect("slot ensured before dispatch")
    }

    // ─────────────────────────────────────────────────────────────
    //  Bulk transform support
    // ─────────────────────────────────────────────────────────────

    /// Distinct card contents currently on the board, removed cells excluded.
    pub(crate) fn distinct_cards(&self) -> BTreeSet<Card> {
        self.cells.iter().filter_map(Cell::card).cloned().collect()
    }

    /// Substitutes contents per `mapping` in one critical section.
    ///
    /// Cells are matched by their content at this moment, so cards that were
    /// removed or rewritten while the mapping was being computed are simply
    /// not touched. Face orientation and control are positional and stay put.
    /// Publishes once if any content actually changed.
    pub(crate) fn apply_mapping(&mut self, mapping: &HashMap<Card, Card>) {
        let mut changed = false;
        for cell in &mut self.cells {
            let Some(next) = cell.card().and_then(|card| mapping.get(card)) else {
                continue;
            };
            if cell.card() != Some(next) {
                cell.replace_card(next.clone());
                changed = true;
            }
        }
        if changed {
            self.changes.publish();
        }
        self.assert_invariants();
    }

    // ─────────────────────────────────────────────────────────────
    //  View projection
    // ─────────────────────────────────────────────────────────────

    /// Renders the board as `actor` sees it: a dimension header, then one
    /// line per cell in row-major order.
    pub(crate) fn render_view(&mut self, actor: &str) -> String {
        self.ensure_actor(actor);
        let slot = &self.actors[actor];
        let mut out = format!("{}x{}", self.rows, self.cols);
        for (i, cell) in self.cells.iter().enumerate() {
            let coord = Coordinate::new(i / self.cols, i % self.cols);
            out.push('\n');
            match cell.card() {
                None => out.push_str("none"),
                Some(_) if !cell.is_face_up() => out.push_str("down"),
                Some(card) if slot.controls(coord) => {
                    out.push_str("my ");
                    out.push_str(card.as_str());
                }
                Some(card) => {
                    out.push_str("up ");
                    out.push_str(card.as_str());
                }
            }
        }
        out
    }

    fn assert_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            use super::invariants::{
                ControlledCellsLive, ExclusiveControl, Invariant, RemovedStaysDown, SlotShape,
            };
            debug_assert!(ExclusiveControl::holds(self), "{}", ExclusiveControl::description());
            debug_assert!(ControlledCellsLive::holds(self), "{}", ControlledCellsLive::description());
            debug_assert!(SlotShape::holds(self), "{}", SlotShape::description());
            debug_assert!(RemovedStaysDown::holds(self), "{}", RemovedStaysDown::description());
        }
    }

    // Accessors for the invariant checks.

    pub(crate) fn actor_slots(&self) -> impl Iterator<Item = (&str, &ActorSlot)> {
        self.actors.iter().map(|(id, slot)| (id.as_str(), slot))
    }

    pub(crate) fn cell_at(&self, coord: Coordinate) -> &Cell {
        self.cell(coord)
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
impl BoardState {
    /// Corrupts state for invariant tests: records control without going
    /// through the rule table.
    pub(crate) fn force_control(&mut self, actor: &str, coord: Coordinate) {
        self.ensure_actor(actor);
        self.actors
            .get_mut(actor)
            .expect("actor just ensured")
            .force_push(coord);
    }

    /// Corrupts state for invariant tests: overwrites an actor's cleanup list.
    pub(crate) fn force_cleanup(&mut self, actor: &str, coords: Vec<Coordinate>) {
        self.ensure_actor(actor);
        self.actors
            .get_mut(actor)
            .expect("actor just ensured")
            .force_cleanup(coords);
    }

    /// Corrupts state for invariant tests: flips a cell down directly.
    pub(crate) fn force_turn_down(&mut self, coord: Coordinate) {
        self.cell_mut(coord).turn_down();
    }

    /// Corrupts state for invariant tests: flips a cell up directly.
    pub(crate) fn force_turn_up(&mut self, coord: Coordinate) {
        self.cell_mut(coord).turn_up();
    }

    /// Corrupts state for invariant tests: removes a card directly.
    pub(crate) fn force_remove(&mut self, coord: Coordinate) {
        self.cell_mut(coord).remove();
    }
}
