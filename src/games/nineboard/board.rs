//! Nested board state and sub-board closure tracking.

use crate::games::Side;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// X or O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Moves first.
    X,
    /// Moves second.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A row/column pair addressing one of nine slots, used at both nesting
/// levels: a sub-board within the main board, or a cell within a sub-board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spot {
    /// Row, 0..3.
    pub row: u8,
    /// Column, 0..3.
    pub col: u8,
}

impl Spot {
    /// Creates a spot.
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// True when the spot addresses a real slot.
    pub fn in_bounds(self) -> bool {
        self.row < 3 && self.col < 3
    }

    fn index(self) -> usize {
        (self.row as usize) * 3 + self.col as usize
    }
}

/// A move target: the sub-board, then the cell within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestedCoord {
    /// Which sub-board.
    pub board: Spot,
    /// Which cell inside it.
    pub cell: Spot,
}

impl NestedCoord {
    /// Creates a target.
    pub fn new(board: Spot, cell: Spot) -> Self {
        Self { board, cell }
    }
}

/// Terminal state of one sub-board. Once closed, the sub-board is immutable
/// for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Closure {
    /// Still accepting moves.
    #[default]
    Open,
    /// Won by the marked player.
    Won(Mark),
    /// Filled without a winner.
    Draw,
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// One 3x3 sub-board.
#[derive(Debug, Clone, Default)]
pub struct SubBoard {
    cells: [Option<Mark>; 9],
    closure: Closure,
}

impl SubBoard {
    /// The mark at the cell, if any.
    pub fn cell(&self, spot: Spot) -> Option<Mark> {
        if !spot.in_bounds() {
            return None;
        }
        self.cells[spot.index()]
    }

    /// How the sub-board ended, if it has.
    pub fn closure(&self) -> Closure {
        self.closure
    }

    /// True once the sub-board is won or drawn.
    pub fn is_closed(&self) -> bool {
        self.closure != Closure::Open
    }

    /// True when every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    fn place(&mut self, spot: Spot, mark: Mark) {
        if self.is_closed() || !spot.in_bounds() {
            return;
        }
        self.cells[spot.index()] = Some(mark);
        self.refresh_closure();
    }

    fn refresh_closure(&mut self) {
        for [a, b, c] in LINES {
            if let Some(mark) = self.cells[a]
                && self.cells[b] == Some(mark)
                && self.cells[c] == Some(mark)
            {
                self.closure = Closure::Won(mark);
                return;
            }
        }
        if self.is_full() {
            self.closure = Closure::Draw;
        }
    }
}

/// The full nested board, plus the mark assignment fixed at session start.
#[derive(Debug, Clone, Default)]
pub struct Board {
    boards: [SubBoard; 9],
    local_mark: Option<Mark>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sub-board at the spot.
    pub fn sub(&self, spot: Spot) -> &SubBoard {
        &self.boards[spot.index().min(8)]
    }

    /// The local player's mark, once assigned.
    pub fn local_mark(&self) -> Option<Mark> {
        self.local_mark
    }

    /// Fixes mark assignment: the opening player is always X.
    pub fn assign_marks(&mut self, local_first: bool) {
        self.local_mark = Some(if local_first { Mark::X } else { Mark::O });
    }

    /// Writes an accepted move for the given side.
    pub fn play(&mut self, target: NestedCoord, side: Side) {
        let Some(local) = self.local_mark else {
            warn!(?target, "move before marks were assigned, dropping");
            return;
        };
        let mark = match side {
            Side::Local => local,
            Side::Remote => local.other(),
        };
        if target.board.in_bounds() {
            self.boards[target.board.index()].place(target.cell, mark);
        }
    }
}
