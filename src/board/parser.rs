//! Board file parsing.
//!
//! A board file is UTF-8 text: the first non-blank line is `RxC`, then one
//! card per non-blank line, row-major. Leading and trailing whitespace on
//! each line is stripped, so LF and CRLF files read the same.

use super::card::{Card, InvalidCard};
use derive_getters::Getters;
use derive_more::{Display, Error};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// A syntactically valid board description: positive dimensions and exactly
/// `rows * cols` validated cards in row-major order.
#[derive(Debug, Clone, Getters)]
pub struct ParsedBoard {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Cards in row-major order.
    cards: Vec<Card>,
}

impl ParsedBoard {
    /// Consumes the parse, yielding the cards in row-major order.
    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

/// Why a board file failed to parse.
#[derive(Debug, Display, Error)]
pub enum ParseError {
    /// The file could not be read at all.
    #[display("cannot read board file {}: {source}", path.display())]
    Unreadable {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The first non-blank line is not `RxC` with positive decimal integers.
    #[display("malformed dimension line {line:?}: expected ROWSxCOLS")]
    MalformedDimensions {
        /// The offending line, trimmed.
        line: String,
    },
    /// The number of card lines does not fill the grid.
    #[display("wrong card count: a {rows}x{cols} board needs {} cards, found {found}", rows * cols)]
    WrongCardCount {
        /// Declared rows.
        rows: usize,
        /// Declared columns.
        cols: usize,
        /// Card lines actually present.
        found: usize,
    },
    /// A card line failed content validation.
    #[display("bad card on line {line_number}: {source}")]
    IllegalContent {
        /// 1-based line number in the file.
        line_number: usize,
        /// The content rejection.
        source: InvalidCard,
    },
}

/// Reads and parses a board file.
///
/// # Errors
///
/// Returns [`ParseError`] describing the first failure: unreadable file,
/// malformed dimension line, wrong card count, or illegal card content.
#[instrument]
pub fn load_board(path: &Path) -> Result<ParsedBoard, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_board(&text)
}

/// Parses board text.
///
/// # Errors
///
/// Same failure categories as [`load_board`], minus the unreadable-file case.
pub fn parse_board(text: &str) -> Result<ParsedBoard, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, dimension_line) = lines.next().ok_or_else(|| ParseError::MalformedDimensions {
        line: String::new(),
    })?;
    let (rows, cols) = parse_dimensions(dimension_line)?;

    let mut cards = Vec::with_capacity(rows * cols);
    for (line_number, line) in lines {
        let card = Card::new(line).map_err(|source| ParseError::IllegalContent {
            line_number,
            source,
        })?;
        cards.push(card);
    }

    if cards.len() != rows * cols {
        return Err(ParseError::WrongCardCount {
            rows,
            cols,
            found: cards.len(),
        });
    }

    debug!(rows, cols, cards = cards.len(), "board parsed");
    Ok(ParsedBoard { rows, cols, cards })
}

fn parse_dimensions(line: &str) -> Result<(usize, usize), ParseError> {
    let malformed = || ParseError::MalformedDimensions {
        line: line.to_owned(),
    };
    let (rows, cols) = line.split_once('x').ok_or_else(malformed)?;
    let rows: usize = rows.parse().map_err(|_| malformed())?;
    let cols: usize = cols.parse().map_err(|_| malformed())?;
    if rows == 0 || cols == 0 {
        return Err(malformed());
    }
    Ok((rows, cols))
}
