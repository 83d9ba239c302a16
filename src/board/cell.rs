//! A single grid slot.

use super::card::Card;

/// One slot of the grid: an optional card plus its face orientation.
///
/// A cell whose card is gone is "removed"; removal is permanent and a removed
/// cell is always face-down. Cells know nothing about actors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cell {
    card: Option<Card>,
    face_up: bool,
}

impl Cell {
    /// Creates a face-down cell holding `card`.
    pub(crate) fn new(card: Card) -> Self {
        Self {
            card: Some(card),
            face_up: false,
        }
    }

    pub(crate) fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub(crate) fn is_removed(&self) -> bool {
        self.card.is_none()
    }

    pub(crate) fn is_face_up(&self) -> bool {
        self.face_up
    }

    pub(crate) fn turn_up(&mut self) {
        self.face_up = true;
    }

    pub(crate) fn turn_down(&mut self) {
        self.face_up = false;
    }

    /// Takes the card out of play. Removed cells never regain content.
    pub(crate) fn remove(&mut self) {
        self.card = None;
        self.face_up = false;
    }

    /// Swaps in new content, preserving face orientation. No-op on removed cells.
    pub(crate) fn replace_card(&mut self, card: Card) {
        if self.card.is_some() {
            self.card = Some(card);
        }
    }

    /// Whether this cell and `other` form a matching pair: both still hold a
    /// card and the cards are equal.
    pub(crate) fn matches(&self, other: &Cell) -> bool {
        match (&self.card, &other.card) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
