//! Single-task driver tying the session core to a transport.
//!
//! One task owns all session state. User gestures arrive as typed
//! [`Command`]s on a channel; everything the surrounding shell needs to
//! know leaves as typed [`Notice`]s. The liveness poll, the countdown
//! timer, and command handling are multiplexed with `select!`, so no two
//! handlers ever run concurrently against the shared state.

use crate::config::{ClientConfig, EntryMode};
use crate::games::{Rules, Side};
use crate::gate;
use crate::monitor::{ConnectionMonitor, FailureVerdict, LivenessVerdict};
use crate::net::Transport;
use crate::readiness::ReadyAck;
use crate::reconcile::{Applied, StatusReconciler};
use crate::session::{Session, SessionPhase, TerminalReason};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::{debug, info, instrument, warn};

/// A user gesture, already translated into one typed action.
#[derive(Debug)]
pub enum Command<R: Rules> {
    /// Place a piece during setup.
    Place(R::Placement),
    /// Commit readiness.
    Ready,
    /// Submit a move.
    Move(R::Target),
    /// Leave the session.
    Leave,
}

/// What the surrounding shell needs to know, one message per fact.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice<R: Rules> {
    /// The session phase changed.
    Phase(SessionPhase),
    /// One countdown tick elapsed; zero means play begins now.
    CountdownTick(u8),
    /// The server accepted a placement.
    PlacementAccepted {
        /// Pieces placed so far.
        placed: u8,
        /// Pieces required before readiness.
        required: u8,
    },
    /// A placement was refused, locally or by the server.
    PlacementRejected {
        /// User-displayable reason.
        reason: String,
    },
    /// Local readiness is committed; waiting on the opponent.
    ReadyCommitted,
    /// A readiness commit was refused.
    ReadyRejected {
        /// User-displayable reason.
        reason: String,
    },
    /// The opponent committed readiness.
    OpponentReady,
    /// An accepted move was applied to the board.
    MoveApplied {
        /// Whose move it was.
        side: Side,
        /// Where it landed.
        target: R::Target,
    },
    /// A move was refused, locally or by the server.
    MoveRejected {
        /// User-displayable reason.
        reason: String,
    },
    /// A transport-level failure, distinct from an application rejection.
    NetworkError {
        /// What went wrong.
        detail: String,
    },
    /// The session ended. Emitted exactly once per session.
    Ended(TerminalReason),
}

/// Drives one session from construction to `Terminal`.
pub struct Orchestrator<R: Rules, T: Transport<R>> {
    session: Session<R>,
    reconciler: StatusReconciler<R>,
    monitor: ConnectionMonitor,
    transport: T,
    notices: mpsc::UnboundedSender<Notice<R>>,
    poll_period: Duration,
    countdown_period: Duration,
    entry: EntryMode,
}

impl<R: Rules, T: Transport<R>> Orchestrator<R, T> {
    /// Creates a driver for a fresh session.
    pub fn new(
        config: &ClientConfig,
        transport: T,
        notices: mpsc::UnboundedSender<Notice<R>>,
    ) -> Self {
        Self {
            session: Session::new(*config.countdown_ticks()),
            reconciler: StatusReconciler::new(),
            monitor: ConnectionMonitor::new(*config.max_poll_failures()),
            transport,
            notices,
            poll_period: Duration::from_millis(*config.poll_interval_ms()),
            countdown_period: Duration::from_millis(*config.countdown_tick_ms()),
            entry: *config.entry(),
        }
    }

    /// Runs the session to completion, returning how it ended.
    #[instrument(skip_all, fields(entry = ?self.entry))]
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command<R>>,
    ) -> Result<TerminalReason> {
        info!("session orchestration starting");

        if self.entry == EntryMode::Immediate {
            self.start_immediately().await;
        }

        let mut poll = interval(self.poll_period);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut countdown: Option<Interval> = None;

        let reason = loop {
            if let SessionPhase::Terminal(reason) = self.session.phase() {
                break reason;
            }

            // Arm the countdown timer on entry into Countdown and disarm it
            // the moment the phase moves on (remote start preempts it).
            match self.session.phase() {
                SessionPhase::Countdown { .. } => {
                    if countdown.is_none() {
                        countdown = Some(interval_at(
                            Instant::now() + self.countdown_period,
                            self.countdown_period,
                        ));
                        self.notify(Notice::Phase(self.session.phase()));
                    }
                }
                _ => countdown = None,
            }

            tokio::select! {
                _ = poll.tick() => {
                    self.poll_once().await;
                }
                _ = tick_opt(&mut countdown), if countdown.is_some() => {
                    if let Some(remaining) = self.session.countdown_tick() {
                        self.notify(Notice::CountdownTick(remaining));
                        if remaining == 0 {
                            countdown = None;
                            self.notify(Notice::Phase(self.session.phase()));
                        }
                    }
                }
                maybe_command = commands.recv() => {
                    match maybe_command {
                        Some(command) => self.handle_command(command).await,
                        None => {
                            debug!("command channel closed, leaving session");
                            self.leave().await;
                        }
                    }
                }
            }
        };

        self.notify(Notice::Ended(reason));
        info!(%reason, "session orchestration finished");
        Ok(reason)
    }

    async fn start_immediately(&mut self) {
        match self.transport.start_session().await {
            Ok(response) if response.success => {
                if self
                    .reconciler
                    .note_session_start(&mut self.session, response.first_player)
                {
                    self.notify(Notice::Phase(self.session.phase()));
                }
            }
            Ok(_) => {
                warn!("server refused session start, waiting for polled start event");
            }
            Err(error) => {
                warn!(%error, "session start failed, waiting for polled start event");
                self.notify(Notice::NetworkError {
                    detail: error.to_string(),
                });
            }
        }
    }

    async fn handle_command(&mut self, command: Command<R>) {
        if self.session.is_terminal() {
            debug!(?command, "command after session end ignored");
            return;
        }
        match command {
            Command::Place(placement) => self.handle_place(placement).await,
            Command::Ready => self.handle_ready().await,
            Command::Move(target) => self.handle_move(target).await,
            Command::Leave => self.leave().await,
        }
    }

    async fn handle_place(&mut self, placement: R::Placement) {
        if self.session.phase() != SessionPhase::Setup {
            self.notify(Notice::PlacementRejected {
                reason: "setup is already over".to_string(),
            });
            return;
        }
        if let Err(rejection) = R::check_placement(self.session.board(), &placement) {
            debug!(%rejection, "placement gated locally");
            self.notify(Notice::PlacementRejected {
                reason: rejection.to_string(),
            });
            return;
        }
        match self.transport.place_piece(&placement).await {
            Ok(response) if response.success => {
                self.session.accept_placement(&placement);
                self.notify(Notice::PlacementAccepted {
                    placed: self.session.placements_done(),
                    required: R::placements_required(),
                });
            }
            Ok(response) => {
                self.notify(Notice::PlacementRejected {
                    reason: response
                        .message
                        .unwrap_or_else(|| "server refused the placement".to_string()),
                });
            }
            Err(error) => self.report_network_error(error),
        }
    }

    async fn handle_ready(&mut self) {
        if self.session.phase() != SessionPhase::Setup {
            debug!("readiness already committed or session underway, ignoring");
            return;
        }
        if !self.session.setup_complete() {
            self.notify(Notice::ReadyRejected {
                reason: format!(
                    "place all pieces first ({}/{})",
                    self.session.placements_done(),
                    R::placements_required()
                ),
            });
            return;
        }
        match self.transport.commit_ready().await {
            Ok(response) if response.success => {
                if self.session.commit_local_ready() == ReadyAck::Accepted {
                    self.notify(Notice::ReadyCommitted);
                }
                if response.both_ready
                    && self.reconciler.note_remote_ready(&mut self.session)
                {
                    self.notify(Notice::OpponentReady);
                }
            }
            Ok(response) => {
                self.notify(Notice::ReadyRejected {
                    reason: response
                        .message
                        .unwrap_or_else(|| "server refused readiness".to_string()),
                });
            }
            Err(error) => self.report_network_error(error),
        }
    }

    async fn handle_move(&mut self, target: R::Target) {
        if let Err(rejection) = gate::evaluate(&self.session, target) {
            debug!(%rejection, ?target, "move gated locally");
            self.notify(Notice::MoveRejected {
                reason: rejection.to_string(),
            });
            return;
        }
        match self.transport.submit_move(target).await {
            Ok(response) if response.valid => {
                self.session.apply_move(Side::Local, target);
                self.notify(Notice::MoveApplied {
                    side: Side::Local,
                    target,
                });
                if let Some(advisory) = &response.next_constraint {
                    debug!(?advisory, "server sent advisory constraint");
                }
                if let Some(outcome) = response.outcome() {
                    self.session.terminate(outcome.terminal_reason());
                }
            }
            Ok(response) => {
                // The gate let it through but the server's state diverged;
                // the server wins and local state stays untouched.
                self.notify(Notice::MoveRejected {
                    reason: response
                        .message
                        .unwrap_or_else(|| "server refused the move".to_string()),
                });
            }
            Err(error) => self.report_network_error(error),
        }
    }

    async fn leave(&mut self) {
        self.transport.leave_session().await;
        self.session.terminate(TerminalReason::Left);
    }

    async fn poll_once(&mut self) {
        match self.transport.poll_liveness().await {
            Ok(response) => {
                let connected = response.connected;
                match self.monitor.record_success(connected) {
                    LivenessVerdict::OpponentGone => {
                        self.session.terminate(TerminalReason::OpponentLeft);
                    }
                    LivenessVerdict::Healthy => {
                        let events = response
                            .into_events()
                            .into_iter()
                            .filter_map(|raw| raw.decode::<R::Target>())
                            .collect();
                        let applied = self.reconciler.apply_snapshot(&mut self.session, events);
                        for item in applied {
                            self.announce(item);
                        }
                    }
                }
            }
            Err(error) => {
                warn!(%error, "liveness poll failed");
                if self.monitor.record_failure() == FailureVerdict::GaveUp {
                    self.session.terminate(TerminalReason::ConnectionLost);
                }
            }
        }
    }

    fn announce(&self, item: Applied<R::Target>) {
        match item {
            Applied::RemoteReady => self.notify(Notice::OpponentReady),
            Applied::Started { .. } => self.notify(Notice::Phase(self.session.phase())),
            Applied::Move(target) => self.notify(Notice::MoveApplied {
                side: Side::Remote,
                target,
            }),
            // The run loop emits the single Ended notice.
            Applied::Finished(_) => {}
        }
    }

    fn report_network_error(&self, error: anyhow::Error) {
        self.notify(Notice::NetworkError {
            detail: error.to_string(),
        });
    }

    fn notify(&self, notice: Notice<R>) {
        if self.notices.send(notice).is_err() {
            debug!("shell gone, notice dropped");
        }
    }
}

async fn tick_opt(countdown: &mut Option<Interval>) {
    match countdown {
        Some(timer) => {
            timer.tick().await;
        }
        // Unreachable behind the select! guard; never resolve just in case.
        None => std::future::pending().await,
    }
}
