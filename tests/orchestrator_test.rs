//! End-to-end orchestrator tests against a scripted transport.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use turnwise::games::Rules;
use turnwise::games::battleship::{Battleship, Coord, Orientation, ShipKind, ShipPlacement};
use turnwise::games::nineboard::{NestedCoord, Nineboard, Spot};
use turnwise::net::{
    LivenessResponse, MoveResponse, PlaceResponse, ReadyResponse, StartResponse, Transport,
};
use turnwise::orchestrator::{Command, Notice, Orchestrator};
use turnwise::{ClientConfig, EntryMode, SessionPhase, Side, TerminalReason};

enum PollScript {
    Respond(LivenessResponse),
    Fail,
}

#[derive(Default)]
struct Inner {
    polls: Mutex<VecDeque<PollScript>>,
    moves: Mutex<VecDeque<MoveResponse>>,
    fail_when_empty: AtomicBool,
    both_ready: AtomicBool,
    left: AtomicBool,
}

#[derive(Clone, Default)]
struct MockTransport {
    inner: Arc<Inner>,
}

impl MockTransport {
    fn queue_poll_ok(&self, body: serde_json::Value) {
        let response = serde_json::from_value(body).expect("test liveness body");
        self.inner
            .polls
            .lock()
            .unwrap()
            .push_back(PollScript::Respond(response));
    }

    fn queue_poll_failure(&self) {
        self.inner
            .polls
            .lock()
            .unwrap()
            .push_back(PollScript::Fail);
    }

    fn fail_when_empty(&self) {
        self.inner.fail_when_empty.store(true, Ordering::SeqCst);
    }

    fn queue_move(&self, response: MoveResponse) {
        self.inner.moves.lock().unwrap().push_back(response);
    }

    fn set_both_ready(&self) {
        self.inner.both_ready.store(true, Ordering::SeqCst);
    }

    fn left(&self) -> bool {
        self.inner.left.load(Ordering::SeqCst)
    }
}

fn plain_move_response() -> MoveResponse {
    MoveResponse {
        valid: true,
        game_over: false,
        won: None,
        is_draw: false,
        next_constraint: None,
        message: None,
    }
}

#[async_trait]
impl<R: Rules> Transport<R> for MockTransport {
    async fn place_piece(&self, _placement: &R::Placement) -> Result<PlaceResponse> {
        Ok(PlaceResponse {
            success: true,
            message: None,
        })
    }

    async fn submit_move(&self, _target: R::Target) -> Result<MoveResponse> {
        Ok(self
            .inner
            .moves
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(plain_move_response))
    }

    async fn commit_ready(&self) -> Result<ReadyResponse> {
        Ok(ReadyResponse {
            success: true,
            both_ready: self.inner.both_ready.load(Ordering::SeqCst),
            message: None,
        })
    }

    async fn start_session(&self) -> Result<StartResponse> {
        Ok(StartResponse {
            success: true,
            first_player: true,
        })
    }

    async fn poll_liveness(&self) -> Result<LivenessResponse> {
        match self.inner.polls.lock().unwrap().pop_front() {
            Some(PollScript::Respond(response)) => Ok(response),
            Some(PollScript::Fail) => Err(anyhow!("socket dropped")),
            None if self.inner.fail_when_empty.load(Ordering::SeqCst) => {
                Err(anyhow!("socket dropped"))
            }
            None => Ok(LivenessResponse {
                connected: true,
                status: None,
            }),
        }
    }

    async fn leave_session(&self) {
        self.inner.left.store(true, Ordering::SeqCst);
    }
}

async fn wait_for<R, F>(rx: &mut mpsc::UnboundedReceiver<Notice<R>>, mut matching: F) -> Notice<R>
where
    R: Rules,
    F: FnMut(&Notice<R>) -> bool,
{
    loop {
        let notice = tokio::time::timeout(Duration::from_secs(300), rx.recv())
            .await
            .expect("timed out waiting for a notice")
            .expect("notice channel closed");
        if matching(&notice) {
            return notice;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn battleship_handshake_countdown_and_win() {
    let transport = MockTransport::default();
    transport.queue_poll_ok(json!({"connected": true}));
    transport.queue_poll_ok(json!({
        "connected": true,
        "status": {"type": "PLAYER_READY"}
    }));
    transport.queue_poll_ok(json!({
        "connected": true,
        "status": {"type": "GAME_START", "first_player": true}
    }));
    transport.queue_move(MoveResponse {
        valid: true,
        game_over: true,
        won: Some(true),
        is_draw: false,
        next_constraint: None,
        message: None,
    });

    let config = ClientConfig::new("http://mock");
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::<Battleship, _>::new(&config, transport.clone(), notice_tx);
    let driver = tokio::spawn(orchestrator.run(command_rx));

    for (row, ship) in ShipKind::fleet().enumerate() {
        command_tx
            .send(Command::Place(ShipPlacement::new(
                ship,
                0,
                row as u8,
                Orientation::Horizontal,
            )))
            .unwrap();
    }
    command_tx.send(Command::Ready).unwrap();

    for expected in 1..=5u8 {
        let notice = wait_for(&mut notice_rx, |n| {
            matches!(n, Notice::PlacementAccepted { .. })
        })
        .await;
        assert_eq!(
            notice,
            Notice::PlacementAccepted {
                placed: expected,
                required: 5
            }
        );
    }

    wait_for(&mut notice_rx, |n| matches!(n, Notice::ReadyCommitted)).await;
    wait_for(&mut notice_rx, |n| matches!(n, Notice::OpponentReady)).await;
    wait_for(&mut notice_rx, |n| {
        matches!(n, Notice::Phase(SessionPhase::Countdown { .. }))
    })
    .await;
    wait_for(&mut notice_rx, |n| {
        matches!(n, Notice::Phase(SessionPhase::Active))
    })
    .await;

    command_tx.send(Command::Move(Coord::new(5, 5))).unwrap();
    let applied = wait_for(&mut notice_rx, |n| matches!(n, Notice::MoveApplied { .. })).await;
    assert_eq!(
        applied,
        Notice::MoveApplied {
            side: Side::Local,
            target: Coord::new(5, 5)
        }
    );

    let ended = wait_for(&mut notice_rx, |n| matches!(n, Notice::Ended(_))).await;
    assert_eq!(ended, Notice::Ended(TerminalReason::Won));
    assert_eq!(driver.await.unwrap().unwrap(), TerminalReason::Won);
}

#[tokio::test(start_paused = true)]
async fn opponent_departure_ends_the_session_once() {
    let transport = MockTransport::default();
    transport.queue_poll_ok(json!({"connected": true}));
    transport.queue_poll_ok(json!({"connected": false}));

    let config = ClientConfig::new("http://mock");
    let (_command_tx, command_rx) = mpsc::unbounded_channel::<Command<Battleship>>();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::<Battleship, _>::new(&config, transport, notice_tx);
    let driver = tokio::spawn(orchestrator.run(command_rx));

    let mut ended = Vec::new();
    while let Some(notice) = notice_rx.recv().await {
        if let Notice::Ended(reason) = notice {
            ended.push(reason);
        }
    }
    assert_eq!(ended, vec![TerminalReason::OpponentLeft]);
    assert_eq!(driver.await.unwrap().unwrap(), TerminalReason::OpponentLeft);
}

#[tokio::test(start_paused = true)]
async fn repeated_poll_failures_lose_the_connection() {
    let transport = MockTransport::default();
    transport.fail_when_empty();

    let config = ClientConfig::new("http://mock");
    let (_command_tx, command_rx) = mpsc::unbounded_channel::<Command<Battleship>>();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::<Battleship, _>::new(&config, transport, notice_tx);
    let driver = tokio::spawn(orchestrator.run(command_rx));

    let ended = wait_for(&mut notice_rx, |n| matches!(n, Notice::Ended(_))).await;
    assert_eq!(ended, Notice::Ended(TerminalReason::ConnectionLost));
    assert_eq!(
        driver.await.unwrap().unwrap(),
        TerminalReason::ConnectionLost
    );
}

#[tokio::test(start_paused = true)]
async fn single_poll_failure_is_survivable() {
    let transport = MockTransport::default();
    transport.queue_poll_ok(json!({"connected": true}));
    // One failure sandwiched between healthy polls.
    transport.queue_poll_failure();
    transport.queue_poll_ok(json!({"connected": true, "status": {"type": "GAME_START", "first_player": true}}));

    let config = ClientConfig::new("http://mock");
    let (command_tx, command_rx) = mpsc::unbounded_channel::<Command<Nineboard>>();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::<Nineboard, _>::new(&config, transport, notice_tx);
    let driver = tokio::spawn(orchestrator.run(command_rx));

    // The session survives the glitch and still reaches play.
    wait_for(&mut notice_rx, |n| {
        matches!(n, Notice::Phase(SessionPhase::Active))
    })
    .await;

    drop(command_tx);
    assert_eq!(driver.await.unwrap().unwrap(), TerminalReason::Left);
}

#[tokio::test(start_paused = true)]
async fn immediate_entry_starts_at_load_and_leave_is_announced() {
    let transport = MockTransport::default();

    let config = ClientConfig::new("http://mock").with_entry(EntryMode::Immediate);
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::<Nineboard, _>::new(&config, transport.clone(), notice_tx);
    let driver = tokio::spawn(orchestrator.run(command_rx));

    wait_for(&mut notice_rx, |n| {
        matches!(n, Notice::Phase(SessionPhase::Active))
    })
    .await;

    let target = NestedCoord::new(Spot::new(0, 0), Spot::new(1, 1));
    command_tx.send(Command::Move(target)).unwrap();
    let applied = wait_for(&mut notice_rx, |n| matches!(n, Notice::MoveApplied { .. })).await;
    assert_eq!(
        applied,
        Notice::MoveApplied {
            side: Side::Local,
            target
        }
    );

    drop(command_tx);
    let ended = wait_for(&mut notice_rx, |n| matches!(n, Notice::Ended(_))).await;
    assert_eq!(ended, Notice::Ended(TerminalReason::Left));
    assert_eq!(driver.await.unwrap().unwrap(), TerminalReason::Left);
    assert!(transport.left());
}

#[tokio::test(start_paused = true)]
async fn both_ready_response_dedups_the_polled_event() {
    let transport = MockTransport::default();
    transport.set_both_ready();
    // The server also redelivers the same fact on the polling path.
    transport.queue_poll_ok(json!({
        "connected": true,
        "status": {"type": "PLAYER_READY"}
    }));

    let config = ClientConfig::new("http://mock");
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::<Nineboard, _>::new(&config, transport, notice_tx);
    let driver = tokio::spawn(orchestrator.run(command_rx));

    command_tx.send(Command::Ready).unwrap();

    let mut opponent_ready = 0;
    loop {
        let notice = tokio::time::timeout(Duration::from_secs(300), notice_rx.recv())
            .await
            .expect("timed out waiting for a notice")
            .expect("notice channel closed");
        match notice {
            Notice::OpponentReady => opponent_ready += 1,
            Notice::Phase(SessionPhase::Active) => break,
            _ => {}
        }
    }
    assert_eq!(opponent_ready, 1);

    drop(command_tx);
    assert_eq!(driver.await.unwrap().unwrap(), TerminalReason::Left);
}
