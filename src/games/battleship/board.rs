//! Local mirror of the shot exchange and the player's own fleet.

use super::placement::{ShipKind, ShipPlacement};
use crate::games::{PlacementRejection, Side};
use serde::{Deserialize, Serialize};

/// Side length of the square grid.
pub const BOARD_SIZE: u8 = 10;

/// A cell coordinate; `x` is the column, `y` the row, both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Column, 0..10.
    pub x: u8,
    /// Row, 0..10.
    pub y: u8,
}

impl Coord {
    /// Creates a coordinate.
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// True when the coordinate lies on the grid.
    pub fn in_bounds(self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }
}

/// Client-side board state: which side has fired at each cell, plus the
/// fleet mirror used to pre-check placements.
#[derive(Debug, Clone, Default)]
pub struct Board {
    shots: [[Option<Side>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    fleet: [[bool; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    placed: Vec<ShipKind>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Who has fired at the cell, if anyone.
    pub fn shot_at(&self, coord: Coord) -> Option<Side> {
        if !coord.in_bounds() {
            return None;
        }
        self.shots[coord.y as usize][coord.x as usize]
    }

    /// Records a fired shot.
    pub fn record_shot(&mut self, coord: Coord, side: Side) {
        if coord.in_bounds() {
            self.shots[coord.y as usize][coord.x as usize] = Some(side);
        }
    }

    /// True when a fleet piece occupies the cell.
    pub fn has_ship_at(&self, coord: Coord) -> bool {
        coord.in_bounds() && self.fleet[coord.y as usize][coord.x as usize]
    }

    /// Pieces placed so far.
    pub fn placed(&self) -> &[ShipKind] {
        &self.placed
    }

    /// Checks a placement against the fleet mirror without applying it.
    pub fn check_placement(&self, placement: &ShipPlacement) -> Result<(), PlacementRejection> {
        if self.placed.contains(&placement.ship) {
            return Err(PlacementRejection::DuplicatePiece);
        }
        for cell in placement.cells() {
            if !cell.in_bounds() {
                return Err(PlacementRejection::OutOfBounds);
            }
            if self.has_ship_at(cell) {
                return Err(PlacementRejection::Overlap);
            }
        }
        Ok(())
    }

    /// Writes a checked, server-accepted placement into the mirror.
    pub fn apply_placement(&mut self, placement: &ShipPlacement) {
        for cell in placement.cells() {
            if cell.in_bounds() {
                self.fleet[cell.y as usize][cell.x as usize] = true;
            }
        }
        self.placed.push(placement.ship);
    }
}
