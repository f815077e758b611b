//! Turnwise session client binary.

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use turnwise::cli::{Cli, Command};
use turnwise::games::Rules;
use turnwise::games::battleship::Battleship;
use turnwise::games::nineboard::Nineboard;
use turnwise::net::HttpTransport;
use turnwise::orchestrator::Orchestrator;
use turnwise::shell::{self, LineParser};
use turnwise::{ClientConfig, EntryMode};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Battleship { server_url, config } => {
            run_session::<Battleship>(
                server_url,
                config,
                EntryMode::Handshake,
                shell::parse_battleship,
            )
            .await
        }
        Command::Nineboard {
            server_url,
            config,
            handshake,
        } => {
            let entry = if handshake {
                EntryMode::Handshake
            } else {
                EntryMode::Immediate
            };
            run_session::<Nineboard>(server_url, config, entry, shell::parse_nineboard).await
        }
    }
}

async fn run_session<R: Rules>(
    server_url: String,
    config_path: Option<std::path::PathBuf>,
    entry: EntryMode,
    parse: LineParser<R>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::new(server_url).with_entry(entry),
    };

    let transport = HttpTransport::new(config.server_url().clone());
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();

    let orchestrator = Orchestrator::new(&config, transport, notice_tx);
    let driver = tokio::spawn(orchestrator.run(command_rx));

    shell::run_shell(command_tx, notice_rx, parse).await?;

    let reason = driver.await??;
    info!(%reason, "returning to lobby");
    Ok(())
}
