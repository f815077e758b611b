//! Game variants and the seam between them and the session core.

pub mod battleship;
pub mod nineboard;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::hash::Hash;

/// Which participant of the session an action or cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// This client.
    Local,
    /// The opponent.
    Remote,
}

impl Side {
    /// Returns the other participant.
    pub fn opponent(self) -> Self {
        match self {
            Side::Local => Side::Remote,
            Side::Remote => Side::Local,
        }
    }
}

/// Where the next move is allowed to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint<R> {
    /// Any open cell.
    Anywhere,
    /// Only cells inside the referenced sub-region.
    Within(R),
}

impl<R> Default for Constraint<R> {
    fn default() -> Self {
        Constraint::Anywhere
    }
}

/// Why a setup placement was refused by the local mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PlacementRejection {
    /// The piece would run past the board edge.
    #[display("piece would run off the board")]
    OutOfBounds,
    /// The piece crosses one already placed.
    #[display("piece overlaps one already placed")]
    Overlap,
    /// The piece was placed earlier in this session.
    #[display("that piece is already on the board")]
    DuplicatePiece,
    /// The variant has no placement phase at all.
    #[display("this game has no placement phase")]
    Unsupported,
}

/// A placement action for variants without a setup phase. Uninhabited, so
/// such a command can never be constructed.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum NoPlacement {}

/// The variant seam: board representation, coordinates, and the legality
/// mirrors the session core consults before talking to the server.
///
/// Everything here is a client-side *mirror* of server truth, kept only to
/// avoid submitting doomed requests; the server's verdict stays final.
pub trait Rules: Debug + Sized + Send + 'static {
    /// Coordinate a move targets.
    type Target: Copy + Eq + Hash + Debug + Send + Sync + Serialize + DeserializeOwned + 'static;
    /// Identity of a sub-region referenced by a move constraint.
    type Region: Copy + Eq + Debug + Send + Sync + 'static;
    /// Setup-phase placement action.
    type Placement: Debug + Send + Sync + Serialize + 'static;
    /// Local board mirror.
    type Board: Debug + Default + Send + 'static;

    /// Placements the local player must commit before readiness.
    fn placements_required() -> u8 {
        0
    }

    /// Checks a placement against the mirror without applying it.
    fn check_placement(
        _board: &Self::Board,
        _placement: &Self::Placement,
    ) -> Result<(), PlacementRejection> {
        Err(PlacementRejection::Unsupported)
    }

    /// Writes a server-accepted placement into the mirror.
    fn apply_placement(_board: &mut Self::Board, _placement: &Self::Placement) {}

    /// True when the cell is free to receive a move.
    fn cell_open(board: &Self::Board, target: Self::Target) -> bool;

    /// The sub-region containing the target, for variants that have them.
    fn region_of(_target: Self::Target) -> Option<Self::Region> {
        None
    }

    /// True when the region can no longer accept moves.
    fn region_closed(_board: &Self::Board, _region: Self::Region) -> bool {
        false
    }

    /// Writes an accepted move into the mirror.
    fn apply_move(board: &mut Self::Board, target: Self::Target, side: Side);

    /// Computes the constraint on the move after `target` was played.
    fn constraint_after(board: &Self::Board, target: Self::Target) -> Constraint<Self::Region>;

    /// Hook run once when the session starts; `local_first` is the server's
    /// choice of opening player.
    fn on_start(_board: &mut Self::Board, _local_first: bool) {}
}
