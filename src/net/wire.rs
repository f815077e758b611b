//! Application-level request and response shapes toward the game server.

use crate::reconcile::{GameOutcome, RemoteEvent};
use derive_new::new;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt::Debug;
use tracing::warn;

/// Body of a move submission.
#[derive(Debug, Clone, Serialize, new)]
pub struct SubmitMoveRequest<T: Serialize> {
    /// Variant-specific move coordinates.
    pub coordinates: T,
}

/// Response to a placement request.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResponse {
    /// Whether the server accepted the placement.
    pub success: bool,
    /// Why not, when it did not.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to a move submission.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveResponse {
    /// Whether the server accepted the move.
    pub valid: bool,
    /// Whether the move finished the game.
    #[serde(default)]
    pub game_over: bool,
    /// Whether the submitting player won, when the game finished.
    #[serde(default)]
    pub won: Option<bool>,
    /// Whether the game finished in a draw.
    #[serde(default)]
    pub is_draw: bool,
    /// Advisory next-move constraint; the local mirror recomputes its own.
    #[serde(default)]
    pub next_constraint: Option<Value>,
    /// Why the move was refused, when it was.
    #[serde(default)]
    pub message: Option<String>,
}

impl MoveResponse {
    /// The terminal outcome this response reports, if any.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.game_over {
            return None;
        }
        Some(if self.is_draw {
            GameOutcome::Draw
        } else if self.won == Some(true) {
            GameOutcome::Won
        } else {
            GameOutcome::Lost
        })
    }
}

/// Response to a readiness commit.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyResponse {
    /// Whether the commit was accepted.
    pub success: bool,
    /// Whether the opponent is ready too.
    #[serde(default)]
    pub both_ready: bool,
    /// Why the commit was refused, when it was.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to an explicit session start.
#[derive(Debug, Clone, Deserialize)]
pub struct StartResponse {
    /// Whether the session started.
    pub success: bool,
    /// True when the local player opens.
    #[serde(default)]
    pub first_player: bool,
}

/// Response to the liveness poll.
#[derive(Debug, Clone, Deserialize)]
pub struct LivenessResponse {
    /// Whether the opponent is still attached to the session.
    pub connected: bool,
    /// Pending status events, if the server has any.
    #[serde(default)]
    pub status: Option<StatusPayload>,
}

impl LivenessResponse {
    /// Flattens the payload into a server-ordered event list.
    pub fn into_events(self) -> Vec<WireEvent> {
        match self.status {
            None => Vec::new(),
            Some(StatusPayload::One(event)) => vec![*event],
            Some(StatusPayload::Many(events)) => events,
        }
    }
}

/// One event or a server-ordered list; servers have shipped both shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StatusPayload {
    /// A list of events, ordered by occurrence.
    Many(Vec<WireEvent>),
    /// A single event.
    One(Box<WireEvent>),
}

/// A raw status event. The kind is matched loosely so an unknown or
/// malformed event degrades to a diagnostic instead of poisoning the
/// whole snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct WireEvent {
    /// Event kind tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Server-assigned sequence marker, if any.
    #[serde(default)]
    pub seq: Option<u64>,
    /// `GAME_START`: true when the receiving player opens.
    #[serde(default)]
    pub first_player: Option<bool>,
    /// `PLAYER_MOVE`: variant-specific coordinates.
    #[serde(default)]
    pub coordinates: Option<Value>,
    /// `GAME_OVER`: true when the receiving player won.
    #[serde(default)]
    pub won: Option<bool>,
    /// `GAME_OVER`: true on a draw.
    #[serde(default)]
    pub is_draw: Option<bool>,
}

impl WireEvent {
    /// Decodes into a typed remote event. `None` means drop: an unknown
    /// kind or a payload that does not parse, logged either way.
    pub fn decode<T: DeserializeOwned + Debug>(self) -> Option<RemoteEvent<T>> {
        match self.kind.as_str() {
            "PLAYER_READY" => Some(RemoteEvent::OpponentReady),
            "GAME_START" => Some(RemoteEvent::SessionStart {
                local_first: self.first_player.unwrap_or(false),
            }),
            "PLAYER_MOVE" => {
                let Some(raw) = self.coordinates else {
                    warn!("move event without coordinates dropped");
                    return None;
                };
                match serde_json::from_value(raw) {
                    Ok(target) => Some(RemoteEvent::OpponentMove {
                        seq: self.seq.unwrap_or(0),
                        target,
                    }),
                    Err(error) => {
                        warn!(%error, "move event with unparseable coordinates dropped");
                        None
                    }
                }
            }
            "GAME_OVER" => {
                let outcome = if self.is_draw == Some(true) {
                    GameOutcome::Draw
                } else if self.won == Some(true) {
                    GameOutcome::Won
                } else {
                    GameOutcome::Lost
                };
                Some(RemoteEvent::GameOver { outcome })
            }
            "PLAYER_DISCONNECTED" => Some(RemoteEvent::OpponentLeft),
            other => {
                warn!(kind = other, "unrecognized status event dropped");
                None
            }
        }
    }
}
