//! The session aggregate and its phase machine.

use crate::games::{Constraint, Rules, Side};
use crate::readiness::{ReadinessCoordinator, ReadyAck};
use derive_more::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Why a session reached `Terminal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TerminalReason {
    /// The server reported a local win.
    #[display("you won")]
    Won,
    /// The server reported a local loss.
    #[display("you lost")]
    Lost,
    /// The server reported a draw.
    #[display("draw")]
    Draw,
    /// The opponent left or was reported gone.
    #[display("opponent left the session")]
    OpponentLeft,
    /// Too many consecutive poll failures.
    #[display("connection lost")]
    ConnectionLost,
    /// The local player left.
    #[display("you left the session")]
    Left,
}

/// Local phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionPhase {
    /// Placing pieces (or, for variants without placement, waiting to commit).
    #[display("setup")]
    Setup,
    /// Local readiness committed; waiting for the opponent.
    #[display("ready")]
    Ready,
    /// Both sides ready; counting down to play.
    #[display("countdown ({remaining})")]
    Countdown {
        /// Ticks left before play begins.
        remaining: u8,
    },
    /// The game is in play.
    #[display("active")]
    Active,
    /// Absorbing end state.
    #[display("over: {_0}")]
    Terminal(TerminalReason),
}

/// One game instance between two participants, owned by this client. It
/// mirrors server truth and never owns it: every mutation here follows
/// either a server-accepted local action or a reconciled server event.
#[derive(Debug)]
pub struct Session<R: Rules> {
    phase: SessionPhase,
    board: R::Board,
    constraint: Constraint<R::Region>,
    turn_owner: Option<Side>,
    readiness: ReadinessCoordinator,
    placements_done: u8,
    countdown_ticks: u8,
    started_at: Option<Instant>,
}

impl<R: Rules> Session<R> {
    /// Creates a fresh session in `Setup`.
    pub fn new(countdown_ticks: u8) -> Self {
        Self {
            phase: SessionPhase::Setup,
            board: R::Board::default(),
            constraint: Constraint::Anywhere,
            turn_owner: None,
            readiness: ReadinessCoordinator::new(),
            placements_done: 0,
            countdown_ticks,
            started_at: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True once the session has ended, for any reason.
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SessionPhase::Terminal(_))
    }

    /// The board mirror.
    pub fn board(&self) -> &R::Board {
        &self.board
    }

    /// Constraint on the next move.
    pub fn constraint(&self) -> Constraint<R::Region> {
        self.constraint
    }

    /// Whose turn it is, once known. `None` until the server names the
    /// opening player.
    pub fn turn_owner(&self) -> Option<Side> {
        self.turn_owner
    }

    /// When the session entered play, if it has.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Placements committed so far.
    pub fn placements_done(&self) -> u8 {
        self.placements_done
    }

    /// True once the setup precondition for readiness holds.
    pub fn setup_complete(&self) -> bool {
        self.placements_done >= R::placements_required()
    }

    /// True once local readiness is committed.
    pub fn local_ready(&self) -> bool {
        self.readiness.local_ready()
    }

    /// Records a server-accepted placement in the mirror.
    pub fn accept_placement(&mut self, placement: &R::Placement) {
        if self.phase != SessionPhase::Setup {
            warn!(phase = %self.phase, "placement outside setup ignored");
            return;
        }
        R::apply_placement(&mut self.board, placement);
        self.placements_done += 1;
        debug!(
            placed = self.placements_done,
            required = R::placements_required(),
            "placement recorded"
        );
    }

    /// Commits local readiness. On acceptance the phase moves to `Ready`,
    /// and to `Countdown` if the opponent is already ready.
    pub fn commit_local_ready(&mut self) -> ReadyAck {
        if !matches!(self.phase, SessionPhase::Setup | SessionPhase::Ready) {
            return ReadyAck::Ignored;
        }
        let ack = self.readiness.mark_local_ready(self.setup_complete());
        if ack == ReadyAck::Accepted {
            self.phase = SessionPhase::Ready;
            info!("local readiness committed");
        }
        self.poll_ready_signal();
        ack
    }

    /// Records the opponent's readiness, whichever order it arrives in.
    pub fn apply_remote_ready(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.readiness.apply_remote_ready();
        self.poll_ready_signal();
    }

    fn poll_ready_signal(&mut self) {
        if self.readiness.take_signal() {
            self.phase = SessionPhase::Countdown {
                remaining: self.countdown_ticks,
            };
            info!(ticks = self.countdown_ticks, "both ready, countdown started");
        }
    }

    /// Advances the countdown by one tick, entering play at zero. Returns
    /// the remaining tick count, or `None` outside `Countdown`.
    pub fn countdown_tick(&mut self) -> Option<u8> {
        let SessionPhase::Countdown { remaining } = self.phase else {
            return None;
        };
        let next = remaining.saturating_sub(1);
        if next == 0 {
            self.enter_active(None);
        } else {
            self.phase = SessionPhase::Countdown { remaining: next };
        }
        Some(next)
    }

    /// Applies the server's session-start signal. Starts play if it has not
    /// started, or fills in the opening player if the local countdown got
    /// there first. Returns `true` when the call changed anything.
    pub fn apply_session_start(&mut self, local_first: bool) -> bool {
        match self.phase {
            SessionPhase::Setup | SessionPhase::Ready | SessionPhase::Countdown { .. } => {
                self.enter_active(Some(local_first));
                true
            }
            SessionPhase::Active if self.turn_owner.is_none() => {
                self.seat(local_first);
                true
            }
            _ => {
                debug!(phase = %self.phase, "session start ignored, already started");
                false
            }
        }
    }

    fn enter_active(&mut self, opening: Option<bool>) {
        self.phase = SessionPhase::Active;
        self.started_at.get_or_insert_with(Instant::now);
        if let Some(local_first) = opening {
            self.seat(local_first);
        }
        info!(turn_owner = ?self.turn_owner, "session active");
    }

    fn seat(&mut self, local_first: bool) {
        self.turn_owner = Some(if local_first { Side::Local } else { Side::Remote });
        R::on_start(&mut self.board, local_first);
    }

    /// Applies an accepted move: writes the board, recomputes the
    /// constraint, and flips turn ownership. Rejected moves never reach
    /// this method, so ownership never flips on one.
    pub fn apply_move(&mut self, side: Side, target: R::Target) {
        if self.phase != SessionPhase::Active {
            warn!(phase = %self.phase, ?side, "move outside active play ignored");
            return;
        }
        R::apply_move(&mut self.board, target, side);
        self.constraint = R::constraint_after(&self.board, target);
        self.turn_owner = Some(side.opponent());
        debug!(?side, ?target, next_turn = ?self.turn_owner, "move applied");
    }

    /// Moves the session to `Terminal`. Returns `true` only on the first
    /// call; `Terminal` is absorbing and later reasons are dropped.
    pub fn terminate(&mut self, reason: TerminalReason) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.phase = SessionPhase::Terminal(reason);
        info!(%reason, "session ended");
        true
    }
}
