//! Ready-handshake bookkeeping.

/// Outcome of a local readiness commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyAck {
    /// Readiness recorded.
    Accepted,
    /// Already committed earlier; a repeat commit is a no-op, not an error.
    AlreadyCommitted,
    /// The setup precondition does not hold yet.
    PlacementIncomplete,
    /// The session is past the point where readiness matters.
    Ignored,
}

/// Tracks the local and remote ready flags and fires the start signal
/// exactly once, whichever order the flags arrive in.
#[derive(Debug, Clone, Default)]
pub struct ReadinessCoordinator {
    local: bool,
    remote: bool,
    signaled: bool,
}

impl ReadinessCoordinator {
    /// Creates the coordinator with both flags down.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits local readiness, provided the caller's setup precondition
    /// holds. Repeat commits are no-ops.
    pub fn mark_local_ready(&mut self, setup_complete: bool) -> ReadyAck {
        if self.local {
            return ReadyAck::AlreadyCommitted;
        }
        if !setup_complete {
            return ReadyAck::PlacementIncomplete;
        }
        self.local = true;
        ReadyAck::Accepted
    }

    /// Records that the opponent committed readiness.
    pub fn apply_remote_ready(&mut self) {
        self.remote = true;
    }

    /// True once the local flag is up.
    pub fn local_ready(&self) -> bool {
        self.local
    }

    /// True once the remote flag is up.
    pub fn remote_ready(&self) -> bool {
        self.remote
    }

    /// True once both flags are up.
    pub fn both_ready(&self) -> bool {
        self.local && self.remote
    }

    /// Returns `true` exactly once, the first time both flags are up. Later
    /// flag writes no longer matter.
    pub fn take_signal(&mut self) -> bool {
        if self.signaled || !self.both_ready() {
            return false;
        }
        self.signaled = true;
        true
    }
}
