//! The Memory Scramble board: a shared grid of face-down cards that many
//! actors flip, claim, and match concurrently.
//!
//! All mutation is serialized through one monitor. A flip either finishes
//! inside a single critical section or parks itself on a per-cell waiter
//! queue and re-enters the rule table when the cell is released; observers
//! park on a change bus that broadcasts once per visible mutation. See
//! [`Board::flip`] for the protocol.

mod card;
mod cell;
mod changes;
mod coordinate;
mod invariants;
mod parser;
mod slot;
mod state;
mod waiters;

pub use card::{Card, InvalidCard};
pub use coordinate::Coordinate;
pub use parser::{load_board, parse_board, ParseError, ParsedBoard};

use derive_more::{Display, Error};
use state::{BoardState, FlipStep};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Rejected input to a board operation.
#[derive(Debug, Clone, Display, Error)]
pub enum BoardError {
    /// A flip aimed outside the grid. This is a caller bug, not a game event;
    /// in-bounds removed cells are handled by the soft no-card rules instead.
    #[display("coordinate {coord} is outside the {rows}x{cols} board")]
    OutOfBounds {
        /// The offending coordinate.
        coord: Coordinate,
        /// Board rows.
        rows: usize,
        /// Board columns.
        cols: usize,
    },
    /// A board was constructed with a zero dimension.
    #[display("board must be at least 1x1, got {rows}x{cols}")]
    EmptyDimensions {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
    /// The card list does not fill the grid.
    #[display("a {rows}x{cols} board needs {} cards, got {found}", rows * cols)]
    WrongCardCount {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Cards supplied.
        found: usize,
    },
}

/// A concurrent Memory Scramble game board.
///
/// The board is safe to share behind an `Arc`; every operation takes `&self`.
/// [`flip`](Board::flip) and [`wait_for_change`](Board::wait_for_change) may
/// suspend, [`view`](Board::view) never does.
#[derive(Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    state: Mutex<BoardState>,
}

impl Board {
    /// Creates a board from row-major cards.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] if either dimension is zero or the card list
    /// does not hold exactly `rows * cols` entries.
    pub fn new(rows: usize, cols: usize, cards: Vec<Card>) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::EmptyDimensions { rows, cols });
        }
        if cards.len() != rows * cols {
            return Err(BoardError::WrongCardCount {
                rows,
                cols,
                found: cards.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            state: Mutex::new(BoardState::new(rows, cols, cards)),
        })
    }

    /// Creates a board from an already-validated parse.
    pub fn from_parsed(parsed: ParsedBoard) -> Self {
        let (rows, cols) = (*parsed.rows(), *parsed.cols());
        Self {
            rows,
            cols,
            state: Mutex::new(BoardState::new(rows, cols, parsed.into_cards())),
        }
    }

    /// Parses board text and builds the board.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the text is not a valid board file.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(Self::from_parsed(parse_board(text)?))
    }

    /// Reads a board file and builds the board.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ParseError> {
        Ok(Self::from_parsed(load_board(path)?))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Flips a card for `actor`.
    ///
    /// One call advances the actor's play by one card: settle the previous
    /// play if one is pending (remove a matched pair, turn a mismatch back
    /// down), then either claim a first card, or resolve a second card
    /// against the held one. A first flip aimed at a card someone else
    /// controls suspends until that card is relinquished, then re-enters the
    /// protocol from scratch; a second flip never suspends. The actor's slot
    /// is created on first mention.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] if `coord` is outside the grid.
    /// Flipping a removed cell is not an error; the play just ends early.
    #[instrument(skip(self))]
    pub async fn flip(&self, coord: Coordinate, actor: &str) -> Result<(), BoardError> {
        if coord.row >= self.rows || coord.col >= self.cols {
            return Err(BoardError::OutOfBounds {
                coord,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let mut resumed = false;
        loop {
            let step = {
                let mut state = self.state.lock().unwrap();
                state.flip_step(coord, actor, resumed)
            };
            match step {
                FlipStep::Done => return Ok(()),
                FlipStep::Wait(rx) => {
                    debug!(actor, %coord, "suspended on controlled cell");
                    // A closed channel only happens on board teardown; treat
                    // it like a wake-up and let the rule table decide.
                    let _ = rx.await;
                    resumed = true;
                }
            }
        }
    }

    /// Renders the board as `actor` sees it.
    ///
    /// Line 1 is `RxC`; then one line per cell in row-major order: `none`
    /// for a removed cell, `down` for a face-down card, `up CARD` for a
    /// face-up card someone else may control, and `my CARD` for a card this
    /// actor controls. Lines are LF-joined with no trailing newline.
    #[instrument(skip(self))]
    pub fn view(&self, actor: &str) -> String {
        self.state.lock().unwrap().render_view(actor)
    }

    /// Suspends until the next visible board mutation, then returns the
    /// actor's view.
    ///
    /// Only face, removal, and content changes publish; a pure ownership
    /// handover does not. Changes that happen before this call are not
    /// replayed: the caller observes the next one.
    #[instrument(skip(self))]
    pub async fn wait_for_change(&self, actor: &str) -> String {
        let rx = self.state.lock().unwrap().subscribe();
        let _ = rx.await;
        self.view(actor)
    }

    /// Rewrites every card's content through `f`, preserving pairwise
    /// consistency.
    ///
    /// `f` runs once per distinct content, outside the monitor, so flips
    /// proceed while the mapping is computed. The substitutions are applied
    /// in one critical section against the contents cells hold at that
    /// moment: cards matched before still match after, faces and control are
    /// untouched, and one change is published if anything was rewritten.
    ///
    /// # Errors
    ///
    /// The first error from `f` is returned as-is and nothing is substituted.
    pub async fn transform<F, Fut, E>(&self, f: F) -> Result<(), E>
    where
        F: Fn(Card) -> Fut,
        Fut: Future<Output = Result<Card, E>>,
    {
        let snapshot = self.state.lock().unwrap().distinct_cards();

        let mut mapping = HashMap::with_capacity(snapshot.len());
        for card in snapshot {
            let next = f(card.clone()).await?;
            mapping.insert(card, next);
        }

        self.state.lock().unwrap().apply_mapping(&mapping);
        Ok(())
    }
}
