//! Memory Scramble server binary.

use anyhow::Result;
use clap::Parser;
use memory_scramble::{load_board, serve, Board, Cli, Command};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { board, host, port } => {
            let parsed = load_board(&board)?;
            info!(
                rows = *parsed.rows(),
                cols = *parsed.cols(),
                path = %board.display(),
                "board loaded"
            );
            let board = Arc::new(Board::from_parsed(parsed));
            serve(board, &host, port).await
        }
        Command::Check { board } => {
            let parsed = load_board(&board)?;
            println!(
                "{}x{} board with {} cards",
                parsed.rows(),
                parsed.cols(),
                parsed.cards().len()
            );
            Ok(())
        }
    }
}
