//! Fleet roster and placement actions.

use super::board::Coord;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Number of pieces a player must place before committing readiness.
pub const FLEET_SIZE: u8 = 5;

/// The five fleet pieces.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShipKind {
    /// Five cells.
    Carrier,
    /// Four cells.
    Battleship,
    /// Three cells.
    Cruiser,
    /// Three cells.
    Submarine,
    /// Two cells.
    Destroyer,
}

impl ShipKind {
    /// The full roster, in the order pieces are usually placed.
    pub fn fleet() -> impl Iterator<Item = ShipKind> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    /// Length of the piece in cells.
    pub fn length(self) -> u8 {
        match self {
            ShipKind::Carrier => 5,
            ShipKind::Battleship => 4,
            ShipKind::Cruiser => 3,
            ShipKind::Submarine => 3,
            ShipKind::Destroyer => 2,
        }
    }
}

/// Axis a piece extends along from its origin cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Extends along increasing `x`.
    Horizontal,
    /// Extends along increasing `y`.
    Vertical,
}

/// One setup-phase placement action, shaped like the wire request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, new)]
pub struct ShipPlacement {
    /// Which piece.
    pub ship: ShipKind,
    /// Origin column.
    pub x: u8,
    /// Origin row.
    pub y: u8,
    /// Extension axis.
    pub orientation: Orientation,
}

impl ShipPlacement {
    /// Cells the piece would occupy, origin first. Callers check bounds.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let length = self.ship.length();
        (0..length).map(move |offset| match self.orientation {
            Orientation::Horizontal => Coord::new(self.x + offset, self.y),
            Orientation::Vertical => Coord::new(self.x, self.y + offset),
        })
    }
}
