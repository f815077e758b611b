//! Applies polled server snapshots to the session, each event exactly once.

use crate::games::{Rules, Side};
use crate::session::{Session, SessionPhase, TerminalReason};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A remote event decoded from a polled snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEvent<T> {
    /// The opponent committed readiness.
    OpponentReady,
    /// The server started the session and named the opening player.
    SessionStart {
        /// True when the local player opens.
        local_first: bool,
    },
    /// The opponent made a move.
    OpponentMove {
        /// Server-assigned sequence marker (0 when the server omits one).
        seq: u64,
        /// Where the move landed.
        target: T,
    },
    /// The server reported the game finished.
    GameOver {
        /// How it finished, from the local player's point of view.
        outcome: GameOutcome,
    },
    /// The opponent left the session.
    OpponentLeft,
}

/// Server-reported result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// Local win.
    Won,
    /// Local loss.
    Lost,
    /// Draw.
    Draw,
}

impl GameOutcome {
    /// The terminal reason this outcome maps to.
    pub fn terminal_reason(self) -> TerminalReason {
        match self {
            GameOutcome::Won => TerminalReason::Won,
            GameOutcome::Lost => TerminalReason::Lost,
            GameOutcome::Draw => TerminalReason::Draw,
        }
    }
}

/// What the reconciler did with an event it applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied<T> {
    /// Opponent readiness was recorded.
    RemoteReady,
    /// The session entered play (or the opening player was filled in).
    Started {
        /// True when the local player opens.
        local_first: bool,
    },
    /// An opponent move was written to the board.
    Move(T),
    /// The session ended.
    Finished(TerminalReason),
}

/// Dedup identity of an event. Singleton kinds carry no payload; moves are
/// keyed by sequence marker plus coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EventKey<T> {
    Ready,
    Start,
    Move { seq: u64, target: T },
    Over,
    Left,
}

/// Consumes polled snapshots and applies them idempotently: the polling
/// layer may redeliver a snapshot that repeats already-seen events, so
/// every applied event is remembered in a ledger for the session lifetime.
#[derive(Debug)]
pub struct StatusReconciler<R: Rules> {
    seen: HashSet<EventKey<R::Target>>,
}

impl<R: Rules> Default for StatusReconciler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rules> StatusReconciler<R> {
    /// Creates a reconciler with an empty ledger.
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Records opponent readiness delivered out of band (the commit-ready
    /// response), so the polled event for the same fact dedups against it.
    /// Returns `true` when this was fresh information.
    pub fn note_remote_ready(&mut self, session: &mut Session<R>) -> bool {
        if !self.seen.insert(EventKey::Ready) {
            return false;
        }
        session.apply_remote_ready();
        true
    }

    /// Records a session start delivered out of band (the start-session
    /// response), so the polled event for the same fact dedups against it.
    pub fn note_session_start(&mut self, session: &mut Session<R>, local_first: bool) -> bool {
        if !self.seen.insert(EventKey::Start) {
            return false;
        }
        session.apply_session_start(local_first)
    }

    /// Applies one polled snapshot in server order, skipping events already
    /// in the ledger. Returns what was actually applied.
    pub fn apply_snapshot(
        &mut self,
        session: &mut Session<R>,
        events: Vec<RemoteEvent<R::Target>>,
    ) -> Vec<Applied<R::Target>> {
        let mut applied = Vec::new();
        for event in events {
            if session.is_terminal() {
                break;
            }
            let key = key_of(&event);
            if self.seen.contains(&key) {
                debug!(?event, "duplicate event dropped");
                continue;
            }
            match event {
                RemoteEvent::OpponentReady => {
                    self.seen.insert(key);
                    session.apply_remote_ready();
                    applied.push(Applied::RemoteReady);
                }
                RemoteEvent::SessionStart { local_first } => {
                    self.seen.insert(key);
                    if session.apply_session_start(local_first) {
                        applied.push(Applied::Started { local_first });
                    }
                }
                RemoteEvent::OpponentMove { seq, target } => {
                    if session.phase() != SessionPhase::Active {
                        // The start event may still be in flight; leave the
                        // move out of the ledger so a later poll applies it.
                        debug!(seq, ?target, "move before session start, deferred");
                        continue;
                    }
                    if !R::cell_open(session.board(), target) {
                        warn!(seq, ?target, "opponent move targets an occupied cell, dropped");
                        self.seen.insert(key);
                        continue;
                    }
                    self.seen.insert(key);
                    session.apply_move(Side::Remote, target);
                    applied.push(Applied::Move(target));
                }
                RemoteEvent::GameOver { outcome } => {
                    self.seen.insert(key);
                    let reason = outcome.terminal_reason();
                    if session.terminate(reason) {
                        applied.push(Applied::Finished(reason));
                    }
                }
                RemoteEvent::OpponentLeft => {
                    self.seen.insert(key);
                    if session.terminate(TerminalReason::OpponentLeft) {
                        applied.push(Applied::Finished(TerminalReason::OpponentLeft));
                    }
                }
            }
        }
        applied
    }
}

fn key_of<T: Copy>(event: &RemoteEvent<T>) -> EventKey<T> {
    match *event {
        RemoteEvent::OpponentReady => EventKey::Ready,
        RemoteEvent::SessionStart { .. } => EventKey::Start,
        RemoteEvent::OpponentMove { seq, target } => EventKey::Move { seq, target },
        RemoteEvent::GameOver { .. } => EventKey::Over,
        RemoteEvent::OpponentLeft => EventKey::Left,
    }
}
