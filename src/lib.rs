//! Memory Scramble - a concurrent multi-player matching game board
//!
//! Many independent actors share one grid of face-down cards, flipping cards
//! to claim temporary exclusive control and match pairs. The board serializes
//! every mutation through a single monitor; a flip aimed at a card someone
//! else controls suspends on a per-cell FIFO and retries when the card is
//! relinquished, and observers long-poll a change bus that broadcasts once
//! per visible mutation.
//!
//! # Architecture
//!
//! - **Board**: the flip state machine, bulk transform, and view projection
//! - **Parser**: board file loading and validation
//! - **Server**: plain-text HTTP surface (`/look`, `/flip`, `/watch`)
//!
//! # Example
//!
//! ```no_run
//! use memory_scramble::{Board, Coordinate};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let board = Board::parse("1x2\nA\nA")?;
//! board.flip(Coordinate::new(0, 0), "alice").await?;
//! assert!(board.view("alice").contains("my A"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod cli;
mod server;

// Crate-level exports - Board core
pub use board::{Board, BoardError, Card, Coordinate, InvalidCard};

// Crate-level exports - Board file parsing
pub use board::{load_board, parse_board, ParseError, ParsedBoard};

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - HTTP adapter
pub use server::{router, serve};
