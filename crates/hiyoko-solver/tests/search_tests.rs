use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use hiyoko_core::{Board, Color};
use hiyoko_solver::{Solver, VerdictTable};

fn bare_solver() -> Solver {
    Solver::new(None, false, Arc::new(AtomicBool::new(false)))
}

fn warm_solver() -> Solver {
    let table = VerdictTable::in_memory().expect("anonymous mapping");
    Solver::new(Some(table), false, Arc::new(AtomicBool::new(false)))
}

#[test]
fn the_opening_is_undecided_at_shallow_depth() {
    let mut solver = warm_solver();
    let board = Board::start();
    for depth in 1..=5 {
        assert_eq!(solver.solve(&board, depth).expect("finishes"), 0);
    }
}

#[test]
fn an_attacked_lion_escapes_when_it_can() {
    // The Gote Giraffe on square 7 eyes the Sente Lion on square 4, but
    // square 1 is out of its reach: the Lion steps back and the game
    // stays open.
    let board = Board::parse("C   L  g   l", Color::Sente).expect("parses");
    let mut solver = bare_solver();
    assert_eq!(solver.solve(&board, 1).expect("finishes"), 0);
    assert_eq!(solver.solve(&board, 2).expect("finishes"), 0);
}

#[test]
fn a_safe_arrival_on_the_far_rank_wins() {
    // The Sente Lion steps from square 6 onto square 9; the Gote Lion on
    // square 11 cannot reach it within its one granted reply, so the
    // arrival survives. The reply extension makes this visible even at
    // depth one.
    let board = Board::parse("      L    l", Color::Sente).expect("parses");
    let mut solver = warm_solver();
    for depth in 1..=4 {
        assert_eq!(solver.solve(&board, depth).expect("finishes"), 1);
    }
}

#[test]
fn deepening_reuses_the_recorded_verdicts() {
    let board = Board::parse("L      C  l", Color::Sente).expect("parses");
    let mut solver = warm_solver();

    for depth in 1..=8 {
        assert_eq!(solver.solve(&board, depth).expect("finishes"), 1);
    }
    let table = solver.into_table().expect("table kept");
    assert_eq!(table.wins(), 1);
    assert!(table.matches() >= 7);
}

#[test]
fn both_perspectives_solve_symmetrically() {
    // The opening is symmetric under the flip, so Gote to move in the
    // mirrored string faces the same game.
    let sente = Board::start();
    let gote = Board::parse(hiyoko_core::START_POSITION, Color::Gote).expect("parses");
    let mut solver = bare_solver();
    for depth in 1..=4 {
        assert_eq!(
            solver.solve(&sente, depth).expect("finishes"),
            solver.solve(&gote, depth).expect("finishes")
        );
    }
}
