//! Reconciler tests: idempotence, deferral, and anomaly handling.

use turnwise::games::nineboard::{NestedCoord, Nineboard, Spot};
use turnwise::{
    Applied, GameOutcome, RemoteEvent, Session, SessionPhase, Side, StatusReconciler,
    TerminalReason,
};

fn target(br: u8, bc: u8, cr: u8, cc: u8) -> NestedCoord {
    NestedCoord::new(Spot::new(br, bc), Spot::new(cr, cc))
}

#[test]
fn snapshot_applies_exactly_once() {
    let mut session = Session::<Nineboard>::new(3);
    let mut reconciler = StatusReconciler::new();

    let events = vec![
        RemoteEvent::SessionStart { local_first: false },
        RemoteEvent::OpponentMove {
            seq: 1,
            target: target(0, 0, 1, 1),
        },
    ];

    let applied = reconciler.apply_snapshot(&mut session, events.clone());
    assert_eq!(applied.len(), 2);
    assert_eq!(session.phase(), SessionPhase::Active);
    assert_eq!(session.turn_owner(), Some(Side::Local));

    // Redelivering the identical snapshot must change nothing.
    let again = reconciler.apply_snapshot(&mut session, events);
    assert!(again.is_empty());
    assert_eq!(session.turn_owner(), Some(Side::Local));
}

#[test]
fn move_onto_an_occupied_cell_is_dropped() {
    let mut session = Session::<Nineboard>::new(3);
    let mut reconciler = StatusReconciler::new();

    reconciler.apply_snapshot(
        &mut session,
        vec![
            RemoteEvent::SessionStart { local_first: false },
            RemoteEvent::OpponentMove {
                seq: 1,
                target: target(0, 0, 1, 1),
            },
        ],
    );
    assert_eq!(session.turn_owner(), Some(Side::Local));

    // An impossible event: a second move onto the same cell. It must be
    // ignored rather than corrupt the board or flip the turn.
    let applied = reconciler.apply_snapshot(
        &mut session,
        vec![RemoteEvent::OpponentMove {
            seq: 2,
            target: target(0, 0, 1, 1),
        }],
    );
    assert!(applied.is_empty());
    assert_eq!(session.turn_owner(), Some(Side::Local));
}

#[test]
fn move_before_start_is_deferred_not_lost() {
    let mut session = Session::<Nineboard>::new(3);
    let mut reconciler = StatusReconciler::new();

    let the_move = RemoteEvent::OpponentMove {
        seq: 1,
        target: target(2, 2, 0, 0),
    };

    // Arrives before any start signal: dropped without entering the ledger.
    let applied = reconciler.apply_snapshot(&mut session, vec![the_move]);
    assert!(applied.is_empty());

    // The next poll redelivers it after the start; now it applies.
    let applied = reconciler.apply_snapshot(
        &mut session,
        vec![RemoteEvent::SessionStart { local_first: true }, the_move],
    );
    assert_eq!(
        applied,
        vec![
            Applied::Started { local_first: true },
            Applied::Move(target(2, 2, 0, 0)),
        ]
    );
}

#[test]
fn opponent_departure_terminates_once() {
    let mut session = Session::<Nineboard>::new(3);
    let mut reconciler = StatusReconciler::new();

    let applied = reconciler.apply_snapshot(&mut session, vec![RemoteEvent::OpponentLeft]);
    assert_eq!(applied, vec![Applied::Finished(TerminalReason::OpponentLeft)]);

    let again = reconciler.apply_snapshot(&mut session, vec![RemoteEvent::OpponentLeft]);
    assert!(again.is_empty());
}

#[test]
fn game_over_event_maps_to_terminal() {
    let mut session = Session::<Nineboard>::new(3);
    let mut reconciler = StatusReconciler::new();
    reconciler.apply_snapshot(
        &mut session,
        vec![RemoteEvent::SessionStart { local_first: true }],
    );

    let applied = reconciler.apply_snapshot(
        &mut session,
        vec![RemoteEvent::GameOver {
            outcome: GameOutcome::Draw,
        }],
    );
    assert_eq!(applied, vec![Applied::Finished(TerminalReason::Draw)]);
    assert_eq!(session.phase(), SessionPhase::Terminal(TerminalReason::Draw));
}

#[test]
fn out_of_band_ready_dedups_the_polled_event() {
    let mut session = Session::<Nineboard>::new(3);
    let mut reconciler = StatusReconciler::new();

    // Learned from the commit-ready response first.
    assert!(reconciler.note_remote_ready(&mut session));
    assert!(!reconciler.note_remote_ready(&mut session));

    // The same fact on the polling path is a duplicate.
    let applied = reconciler.apply_snapshot(&mut session, vec![RemoteEvent::OpponentReady]);
    assert!(applied.is_empty());
}

#[test]
fn nothing_applies_after_terminal() {
    let mut session = Session::<Nineboard>::new(3);
    let mut reconciler = StatusReconciler::new();
    session.terminate(TerminalReason::ConnectionLost);

    let applied = reconciler.apply_snapshot(
        &mut session,
        vec![
            RemoteEvent::SessionStart { local_first: true },
            RemoteEvent::OpponentMove {
                seq: 1,
                target: target(0, 0, 0, 0),
            },
        ],
    );
    assert!(applied.is_empty());
    assert_eq!(
        session.phase(),
        SessionPhase::Terminal(TerminalReason::ConnectionLost)
    );
}
