//! Line-oriented session shell.
//!
//! Translates typed lines into session [`Command`]s and prints notices. A
//! richer rendering surface would attach to the same two channels; nothing
//! in the session core knows this shell exists.

use crate::games::Rules;
use crate::games::battleship::{Battleship, Coord, Orientation, ShipPlacement};
use crate::games::nineboard::{NestedCoord, Nineboard, Spot};
use crate::orchestrator::{Command, Notice};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Parses one input line into a command; `Ok(None)` means quit.
pub type LineParser<R> = fn(&str) -> Result<Option<Command<R>>, String>;

/// Pumps stdin lines into the command channel and notices to stdout until
/// the session ends.
pub async fn run_shell<R: Rules>(
    commands: mpsc::UnboundedSender<Command<R>>,
    mut notices: mpsc::UnboundedReceiver<Notice<R>>,
    parse: LineParser<R>,
) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            maybe_notice = notices.recv() => match maybe_notice {
                Some(notice) => {
                    let ended = matches!(notice, Notice::Ended(_));
                    println!("{}", describe(&notice));
                    if ended {
                        break;
                    }
                }
                None => break,
            },
            maybe_line = lines.next_line() => match maybe_line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match parse(line) {
                        Ok(Some(command)) => {
                            if commands.send(command).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {
                            let _ = commands.send(Command::Leave);
                        }
                        Err(message) => println!("{message}"),
                    }
                }
                Ok(None) => {
                    let _ = commands.send(Command::Leave);
                }
                Err(error) => {
                    debug!(%error, "stdin closed");
                    let _ = commands.send(Command::Leave);
                }
            },
        }
    }
    Ok(())
}

fn describe<R: Rules>(notice: &Notice<R>) -> String {
    match notice {
        Notice::Phase(phase) => format!("-- {phase}"),
        Notice::CountdownTick(0) => "go!".to_string(),
        Notice::CountdownTick(n) => format!("starting in {n}..."),
        Notice::PlacementAccepted { placed, required } => {
            format!("placed {placed}/{required}")
        }
        Notice::PlacementRejected { reason } => format!("placement refused: {reason}"),
        Notice::ReadyCommitted => "ready - waiting for opponent".to_string(),
        Notice::ReadyRejected { reason } => format!("not ready: {reason}"),
        Notice::OpponentReady => "opponent is ready".to_string(),
        Notice::MoveApplied { side, target } => match side {
            crate::games::Side::Local => format!("you played {target:?}"),
            crate::games::Side::Remote => format!("opponent played {target:?}"),
        },
        Notice::MoveRejected { reason } => format!("move refused: {reason}"),
        Notice::NetworkError { detail } => format!("network trouble: {detail}"),
        Notice::Ended(reason) => format!("session over: {reason}"),
    }
}

/// Parses grid-combat commands: `place <ship> <x> <y> <h|v>`, `ready`,
/// `fire <x> <y>`, `quit`.
pub fn parse_battleship(line: &str) -> Result<Option<Command<Battleship>>, String> {
    const USAGE: &str = "commands: place <ship> <x> <y> <h|v>, ready, fire <x> <y>, quit";
    let mut words = line.split_whitespace();
    match words.next() {
        Some("place") => {
            let ship = words
                .next()
                .ok_or(USAGE)?
                .parse()
                .map_err(|_| "unknown ship (carrier, battleship, cruiser, submarine, destroyer)")?;
            let x = parse_coord(words.next())?;
            let y = parse_coord(words.next())?;
            let orientation = match words.next() {
                Some("h") | Some("horizontal") => Orientation::Horizontal,
                Some("v") | Some("vertical") => Orientation::Vertical,
                _ => return Err("orientation must be h or v".to_string()),
            };
            Ok(Some(Command::Place(ShipPlacement::new(
                ship,
                x,
                y,
                orientation,
            ))))
        }
        Some("ready") => Ok(Some(Command::Ready)),
        Some("fire") => {
            let x = parse_coord(words.next())?;
            let y = parse_coord(words.next())?;
            Ok(Some(Command::Move(Coord::new(x, y))))
        }
        Some("quit") => Ok(None),
        _ => Err(USAGE.to_string()),
    }
}

/// Parses nine-board commands: `move <br> <bc> <cr> <cc>`, `ready`, `quit`.
pub fn parse_nineboard(line: &str) -> Result<Option<Command<Nineboard>>, String> {
    const USAGE: &str = "commands: move <board-row> <board-col> <cell-row> <cell-col>, ready, quit";
    let mut words = line.split_whitespace();
    match words.next() {
        Some("move") => {
            let board = Spot::new(parse_coord(words.next())?, parse_coord(words.next())?);
            let cell = Spot::new(parse_coord(words.next())?, parse_coord(words.next())?);
            Ok(Some(Command::Move(NestedCoord::new(board, cell))))
        }
        Some("ready") => Ok(Some(Command::Ready)),
        Some("quit") => Ok(None),
        _ => Err(USAGE.to_string()),
    }
}

fn parse_coord(word: Option<&str>) -> Result<u8, String> {
    word.ok_or_else(|| "missing coordinate".to_string())?
        .parse()
        .map_err(|_| "coordinates must be small numbers".to_string())
}
