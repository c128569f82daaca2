use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hiyoko_core::Board;

use crate::table::VerdictTable;

const CHECK_INTERVAL_NODES: u64 = 1 << 16;

/// The search was asked to stop; unwinds to the driver, which flushes the
/// table and exits.
#[derive(Debug, Clone, Copy)]
pub struct Interrupted;

/// Depth-limited negamax over win/loss verdicts: +1 the mover wins, -1 the
/// mover loses, 0 undecided within the budget. Verdicts and searched depths
/// are shared through the verdict table, so deeper runs reuse earlier work.
pub struct Solver {
    table: Option<VerdictTable>,
    verbose: bool,
    stop: Arc<AtomicBool>,
    nodes: u64,
}

impl Solver {
    pub fn new(table: Option<VerdictTable>, verbose: bool, stop: Arc<AtomicBool>) -> Self {
        Self {
            table,
            verbose,
            stop,
            nodes: 0,
        }
    }

    pub fn table(&self) -> Option<&VerdictTable> {
        self.table.as_ref()
    }

    pub fn into_table(self) -> Option<VerdictTable> {
        self.table
    }

    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn solve(&mut self, board: &Board, depth: i32) -> Result<i32, Interrupted> {
        self.search(board, depth)
    }

    fn search(&mut self, board: &Board, depth: i32) -> Result<i32, Interrupted> {
        if board.verdict() != 0 {
            return Ok(board.verdict());
        }

        let budget = depth + board.extension();
        let key = board.key();
        if let (Some(table), Some(key)) = (self.table.as_mut(), key) {
            if let Some(verdict) = table.probe(key, budget) {
                return Ok(verdict);
            }
        }
        if budget <= 0 {
            return Ok(0);
        }
        self.bump_nodes()?;

        // No move at all is a loss; an undecided child lifts this to 0.
        let mut best = -1;
        for (mv, child) in board.children() {
            let score = -self.search(&child, depth - 1 + board.extension())?;
            if score > best {
                best = score;
                if self.verbose && score > 0 {
                    println!("{}{} wins\n", board, mv.describe(board.turn()));
                }
            }
            if best > 0 {
                break;
            }
        }

        if let (Some(table), Some(key)) = (self.table.as_mut(), key) {
            table.enter(key, budget, best);
            if self.verbose {
                println!("{key:#x}\n{board}");
            }
        }
        Ok(best)
    }

    fn bump_nodes(&mut self) -> Result<(), Interrupted> {
        self.nodes += 1;
        if self.nodes.is_multiple_of(CHECK_INTERVAL_NODES) && self.stop.load(Ordering::Relaxed) {
            return Err(Interrupted);
        }
        Ok(())
    }
}
