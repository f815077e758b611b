//! Turnwise - client-side session synchronization for turn-based
//! two-player board games.
//!
//! The crate tracks whose turn it is, which moves are currently legal, and
//! how local state reconciles with an authoritative remote game server that
//! is polled rather than pushed to. Two variants share one core: a
//! grid-combat game with ship placement and shot exchange, and a nine-board
//! tic-tac-toe with a recursive move constraint.
//!
//! # Architecture
//!
//! - **Session**: the local phase model (setup, ready, countdown, active,
//!   terminal) owning the board mirror and turn state
//! - **Gate**: client-side move legality pre-filter, to avoid doomed
//!   requests; the server's verdict stays authoritative
//! - **Reconciler**: idempotent application of polled server events behind
//!   a dedup ledger
//! - **Monitor**: liveness tracking and disconnect detection on the shared
//!   polling tick
//! - **Orchestrator**: the single async task tying the above to a transport
//!
//! # Example
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use turnwise::games::nineboard::Nineboard;
//! use turnwise::net::HttpTransport;
//! use turnwise::orchestrator::Orchestrator;
//! use turnwise::{ClientConfig, EntryMode};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::new("http://127.0.0.1:5000").with_entry(EntryMode::Immediate);
//! let transport = HttpTransport::new(config.server_url().clone());
//! let (_command_tx, command_rx) = mpsc::unbounded_channel();
//! let (notice_tx, _notice_rx) = mpsc::unbounded_channel();
//!
//! let orchestrator = Orchestrator::<Nineboard, _>::new(&config, transport, notice_tx);
//! let _reason = orchestrator.run(command_rx).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod games;
pub mod gate;
pub mod monitor;
pub mod net;
pub mod orchestrator;
pub mod readiness;
pub mod reconcile;
pub mod session;
pub mod shell;

// Crate-level exports - configuration
pub use config::{ClientConfig, ConfigError, EntryMode};

// Crate-level exports - variant seam
pub use games::{Constraint, NoPlacement, PlacementRejection, Rules, Side};

// Crate-level exports - session core
pub use gate::Rejection;
pub use monitor::{ConnectionMonitor, ConnectionState, FailureVerdict, LivenessVerdict};
pub use readiness::{ReadinessCoordinator, ReadyAck};
pub use reconcile::{Applied, GameOutcome, RemoteEvent, StatusReconciler};
pub use session::{Session, SessionPhase, TerminalReason};

// Crate-level exports - transport seam
pub use net::{HttpTransport, Transport};
