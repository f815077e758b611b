//! Command-line interface for turnwise.

use clap::{Parser, Subcommand};

/// Turnwise - session client for two-player board games
#[derive(Parser, Debug)]
#[command(name = "turnwise")]
#[command(about = "Turn-synchronized client for two-player board games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Join a grid-combat session (ship placement, then a shot exchange)
    Battleship {
        /// Game server URL
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        server_url: String,

        /// TOML client config; overrides --server-url when present
        #[arg(long)]
        config: Option<std::path::PathBuf>,
    },

    /// Join a nine-board session (3x3 boards of 3x3 cells)
    Nineboard {
        /// Game server URL
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        server_url: String,

        /// TOML client config; overrides --server-url when present
        #[arg(long)]
        config: Option<std::path::PathBuf>,

        /// Use the ready handshake instead of starting at load
        #[arg(long)]
        handshake: bool,
    },
}
