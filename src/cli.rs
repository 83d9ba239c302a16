//! Command-line interface for the board server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Memory Scramble - concurrent multi-player matching game server
#[derive(Parser, Debug)]
#[command(name = "memory-scramble")]
#[command(about = "Concurrent Memory Scramble game board server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve a board file over HTTP
    Serve {
        /// Path to the board file
        board: PathBuf,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Validate a board file and report its dimensions
    Check {
        /// Path to the board file
        board: PathBuf,
    },
}
