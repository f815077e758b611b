//! Board and constraint tests for the nine-board variant.

use turnwise::games::nineboard::{Board, Closure, Mark, NestedCoord, Nineboard, Spot};
use turnwise::{Constraint, Rules, Side};

fn target(br: u8, bc: u8, cr: u8, cc: u8) -> NestedCoord {
    NestedCoord::new(Spot::new(br, bc), Spot::new(cr, cc))
}

fn started_board() -> Board {
    let mut board = Board::new();
    board.assign_marks(true);
    board
}

#[test]
fn marks_follow_the_opening_assignment() {
    let mut board = Board::new();
    board.assign_marks(false);
    assert_eq!(board.local_mark(), Some(Mark::O));

    Nineboard::apply_move(&mut board, target(0, 0, 0, 0), Side::Remote);
    assert_eq!(board.sub(Spot::new(0, 0)).cell(Spot::new(0, 0)), Some(Mark::X));
}

#[test]
fn constraint_follows_the_cell_just_played() {
    let mut board = started_board();
    let first = target(0, 0, 1, 1);
    Nineboard::apply_move(&mut board, first, Side::Local);
    assert_eq!(
        Nineboard::constraint_after(&board, first),
        Constraint::Within(Spot::new(1, 1))
    );
}

#[test]
fn sub_board_closes_on_a_win_line() {
    let mut board = started_board();
    Nineboard::apply_move(&mut board, target(0, 0, 0, 0), Side::Local);
    Nineboard::apply_move(&mut board, target(0, 0, 1, 1), Side::Local);
    Nineboard::apply_move(&mut board, target(0, 0, 2, 2), Side::Local);

    let sub = board.sub(Spot::new(0, 0));
    assert_eq!(sub.closure(), Closure::Won(Mark::X));
    assert!(sub.is_closed());

    // Closed means immutable for the rest of the session.
    Nineboard::apply_move(&mut board, target(0, 0, 0, 1), Side::Remote);
    assert!(board.sub(Spot::new(0, 0)).cell(Spot::new(0, 1)).is_none());
}

#[test]
fn sub_board_closes_as_draw_when_full() {
    let mut board = started_board();
    // X X O / O O X / X X O across sub-board (1, 1): no line for either mark.
    let x_cells = [(0, 0), (0, 1), (1, 2), (2, 0), (2, 1)];
    let o_cells = [(0, 2), (1, 0), (1, 1), (2, 2)];
    for (row, col) in x_cells {
        Nineboard::apply_move(&mut board, target(1, 1, row, col), Side::Local);
    }
    for (row, col) in o_cells {
        Nineboard::apply_move(&mut board, target(1, 1, row, col), Side::Remote);
    }

    let sub = board.sub(Spot::new(1, 1));
    assert!(sub.is_full());
    assert_eq!(sub.closure(), Closure::Draw);
}

#[test]
fn constraint_collapses_when_the_destination_is_closed() {
    let mut board = started_board();
    Nineboard::apply_move(&mut board, target(0, 0, 0, 0), Side::Local);
    Nineboard::apply_move(&mut board, target(0, 0, 1, 1), Side::Local);
    Nineboard::apply_move(&mut board, target(0, 0, 2, 2), Side::Local);
    assert!(board.sub(Spot::new(0, 0)).is_closed());

    // A move whose cell addresses the closed board releases the constraint.
    let reply = target(2, 2, 0, 0);
    Nineboard::apply_move(&mut board, reply, Side::Remote);
    assert_eq!(
        Nineboard::constraint_after(&board, reply),
        Constraint::Anywhere
    );

    // A move addressing an open board keeps it.
    let onward = target(2, 2, 1, 0);
    Nineboard::apply_move(&mut board, onward, Side::Local);
    assert_eq!(
        Nineboard::constraint_after(&board, onward),
        Constraint::Within(Spot::new(1, 0))
    );
}

#[test]
fn cell_openness_tracks_occupancy_and_bounds() {
    let mut board = started_board();
    let spot = target(1, 2, 0, 1);
    assert!(Nineboard::cell_open(&board, spot));

    Nineboard::apply_move(&mut board, spot, Side::Local);
    assert!(!Nineboard::cell_open(&board, spot));

    // Malformed coordinates are never "open".
    assert!(!Nineboard::cell_open(&board, target(7, 0, 0, 0)));
    assert!(!Nineboard::cell_open(&board, target(0, 0, 0, 9)));
}
