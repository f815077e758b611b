//! Transport seam toward the remote game server.

mod http;
mod wire;

pub use http::HttpTransport;
pub use wire::{
    LivenessResponse, MoveResponse, PlaceResponse, ReadyResponse, StartResponse, StatusPayload,
    SubmitMoveRequest, WireEvent,
};

use crate::games::Rules;
use anyhow::Result;
use async_trait::async_trait;

/// Application-level calls the session core makes against the server.
///
/// Transport mechanics (retry, backoff, connection reuse) live behind this
/// seam; the core only assumes per-call in-order delivery and handles
/// redelivery itself.
#[async_trait]
pub trait Transport<R: Rules>: Send + Sync {
    /// Submits a setup placement.
    async fn place_piece(&self, placement: &R::Placement) -> Result<PlaceResponse>;

    /// Submits a move.
    async fn submit_move(&self, target: R::Target) -> Result<MoveResponse>;

    /// Commits local readiness.
    async fn commit_ready(&self) -> Result<ReadyResponse>;

    /// Asks the server to start the session directly.
    async fn start_session(&self) -> Result<StartResponse>;

    /// Polls session liveness and pending status events.
    async fn poll_liveness(&self) -> Result<LivenessResponse>;

    /// Announces departure. Best-effort: errors are swallowed by contract.
    async fn leave_session(&self);
}
