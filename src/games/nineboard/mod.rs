//! Nine-board variant: 3x3 sub-boards of 3x3 cells, where each move sends
//! the opponent to the sub-board addressed by the cell just played.

mod board;

pub use board::{Board, Closure, Mark, NestedCoord, Spot, SubBoard};

use super::{Constraint, NoPlacement, Rules, Side};

/// The nine-board rules. No setup phase; the recursive sub-board constraint
/// is recomputed after every applied move, local or remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nineboard;

impl Rules for Nineboard {
    type Target = NestedCoord;
    type Region = Spot;
    type Placement = NoPlacement;
    type Board = Board;

    fn cell_open(board: &Board, target: NestedCoord) -> bool {
        target.board.in_bounds()
            && target.cell.in_bounds()
            && board.sub(target.board).cell(target.cell).is_none()
    }

    fn region_of(target: NestedCoord) -> Option<Spot> {
        Some(target.board)
    }

    fn region_closed(board: &Board, region: Spot) -> bool {
        board.sub(region).is_closed()
    }

    fn apply_move(board: &mut Board, target: NestedCoord, side: Side) {
        board.play(target, side);
    }

    fn constraint_after(board: &Board, target: NestedCoord) -> Constraint<Spot> {
        // The cell just played addresses the next sub-board; a closed or
        // full destination collapses the constraint so it can never lock
        // the game.
        let next = target.cell;
        let sub = board.sub(next);
        if sub.is_closed() || sub.is_full() {
            Constraint::Anywhere
        } else {
            Constraint::Within(next)
        }
    }

    fn on_start(board: &mut Board, local_first: bool) {
        board.assign_marks(local_first);
    }
}
