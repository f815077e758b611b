//! Client-side move pre-filter.

use crate::games::{Constraint, Rules, Side};
use crate::session::{Session, SessionPhase};
use derive_more::{Display, Error};

/// Why a proposed move is not worth submitting. Ordered by evaluation
/// priority; the first applicable reason wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum Rejection {
    /// The turn belongs to the opponent (or is not assigned yet).
    #[display("not your turn")]
    NotMyTurn,
    /// The session is not in active play.
    #[display("the game is not in play")]
    SessionNotActive,
    /// The target cell is already taken.
    #[display("that cell is already taken")]
    CellOccupied,
    /// The target sits outside the required sub-board.
    #[display("you must play in the indicated sub-board")]
    WrongSubBoard,
    /// The target's sub-board has already been decided.
    #[display("that sub-board is closed")]
    SubBoardClosed,
}

/// Decides whether a proposed local move is worth submitting.
///
/// This is a pre-filter against doomed requests, nothing more: a positive
/// answer does not guarantee server acceptance, and a negative server
/// verdict on a gated-through move is authoritative, not a gate bug.
pub fn evaluate<R: Rules>(session: &Session<R>, target: R::Target) -> Result<(), Rejection> {
    if session.turn_owner() != Some(Side::Local) {
        return Err(Rejection::NotMyTurn);
    }
    if session.phase() != SessionPhase::Active {
        return Err(Rejection::SessionNotActive);
    }
    if !R::cell_open(session.board(), target) {
        return Err(Rejection::CellOccupied);
    }
    if let Constraint::Within(required) = session.constraint()
        && R::region_of(target) != Some(required)
    {
        return Err(Rejection::WrongSubBoard);
    }
    if let Some(region) = R::region_of(target)
        && R::region_closed(session.board(), region)
    {
        return Err(Rejection::SubBoardClosed);
    }
    Ok(())
}
