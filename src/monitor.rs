//! Liveness bookkeeping for the shared polling tick.

use std::time::Instant;
use tracing::{debug, warn};

/// Connection view, mutated only by the monitor.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionState {
    connected: bool,
    last_poll_at: Option<Instant>,
}

impl ConnectionState {
    /// Whether the last successful poll reported a live opponent.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// When the last poll (successful or not) completed.
    pub fn last_poll_at(&self) -> Option<Instant> {
        self.last_poll_at
    }
}

/// Verdict on a poll that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessVerdict {
    /// Session healthy; reconcile any embedded status payload.
    Healthy,
    /// The server reports the opponent is gone.
    OpponentGone,
}

/// Verdict on a poll that failed at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureVerdict {
    /// Transient; skip this tick and retry on the next.
    Transient,
    /// Consecutive-failure threshold exceeded; give the session up.
    GaveUp,
}

/// Tracks poll results and decides when the session is lost. A single
/// failure is never fatal; only an unbroken run of them is.
#[derive(Debug)]
pub struct ConnectionMonitor {
    state: ConnectionState,
    consecutive_failures: u32,
    max_failures: u32,
}

impl ConnectionMonitor {
    /// Creates a monitor that tolerates `max_failures - 1` consecutive
    /// transport failures.
    pub fn new(max_failures: u32) -> Self {
        Self {
            state: ConnectionState {
                connected: true,
                last_poll_at: None,
            },
            consecutive_failures: 0,
            max_failures: max_failures.max(1),
        }
    }

    /// Current connection view.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Records a poll that reached the server.
    pub fn record_success(&mut self, connected: bool) -> LivenessVerdict {
        self.consecutive_failures = 0;
        self.state = ConnectionState {
            connected,
            last_poll_at: Some(Instant::now()),
        };
        if connected {
            LivenessVerdict::Healthy
        } else {
            LivenessVerdict::OpponentGone
        }
    }

    /// Records a transport-level poll failure.
    pub fn record_failure(&mut self) -> FailureVerdict {
        self.consecutive_failures += 1;
        self.state.last_poll_at = Some(Instant::now());
        if self.consecutive_failures >= self.max_failures {
            warn!(
                failures = self.consecutive_failures,
                "poll failure threshold reached"
            );
            FailureVerdict::GaveUp
        } else {
            debug!(
                failures = self.consecutive_failures,
                max = self.max_failures,
                "poll failed, will retry next tick"
            );
            FailureVerdict::Transient
        }
    }
}
