//! Grid-combat variant: ship placement, then a shot exchange on a 10x10 grid.

mod board;
mod placement;

pub use board::{BOARD_SIZE, Board, Coord};
pub use placement::{FLEET_SIZE, Orientation, ShipKind, ShipPlacement};

use super::{Constraint, PlacementRejection, Rules, Side};

/// The grid-combat rules. Shots carry no positional constraint; the setup
/// phase requires the full fleet on the board before readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Battleship;

impl Rules for Battleship {
    type Target = Coord;
    type Region = ();
    type Placement = ShipPlacement;
    type Board = Board;

    fn placements_required() -> u8 {
        FLEET_SIZE
    }

    fn check_placement(board: &Board, placement: &ShipPlacement) -> Result<(), PlacementRejection> {
        board.check_placement(placement)
    }

    fn apply_placement(board: &mut Board, placement: &ShipPlacement) {
        board.apply_placement(placement);
    }

    fn cell_open(board: &Board, target: Coord) -> bool {
        target.in_bounds() && board.shot_at(target).is_none()
    }

    fn apply_move(board: &mut Board, target: Coord, side: Side) {
        board.record_shot(target, side);
    }

    fn constraint_after(_board: &Board, _target: Coord) -> Constraint<()> {
        // Shots are never positionally constrained.
        Constraint::Anywhere
    }
}
