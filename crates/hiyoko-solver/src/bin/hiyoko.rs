use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use hiyoko_core::{Board, Color, KEY_SPACE, START_POSITION};
use hiyoko_solver::{scan, tally, ScanOptions, Solver, SweepError, VerdictTable};

/// Dōbutsu shōgi endgame solver: enumerate, verify, and solve positions
/// over a dense verdict table.
#[derive(Debug, Parser)]
#[command(name = "hiyoko", version)]
struct Cli {
    /// 18-character board string: 12 grid cells from the mover's back rank,
    /// then up to 6 hand slots.
    #[arg(short = 'b', default_value = START_POSITION)]
    board: String,

    /// Sweep the key range, verify every decode re-encodes to its key, and
    /// stamp the legal entries.
    #[arg(short = 'c')]
    check: bool,

    /// Search the start position with iterative deepening up to this depth.
    #[arg(short = 'd')]
    depth: Option<i32>,

    /// Clear win/loss verdicts from the table, keeping legality.
    #[arg(short = 'e')]
    empty: bool,

    /// File backing the verdict table; without it the table lives in memory.
    #[arg(short = 'f')]
    file: Option<PathBuf>,

    /// Gote is the side to move in the start position.
    #[arg(short = 'g')]
    gote: bool,

    /// Count the legal entries and their win/loss breakdown.
    #[arg(short = 'n')]
    count: bool,

    /// Print every legal position met during the sweep.
    #[arg(short = 'p')]
    print: bool,

    /// First key of the sweep, decimal or 0x-hex; forced even.
    #[arg(short = 's', value_parser = parse_key)]
    start: Option<u64>,

    /// One past the last key of the sweep, decimal or 0x-hex.
    #[arg(short = 't', value_parser = parse_key)]
    stop: Option<u64>,

    /// Print positions as their verdicts are recorded.
    #[arg(short = 'v')]
    verbose: bool,
}

fn parse_key(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|err| format!("invalid key bound {s:?}: {err}"))
}

fn main() -> ExitCode {
    let mut cli = Cli::parse();

    let start = cli.start.unwrap_or(0) & !1;
    let stop = cli.stop.unwrap_or(KEY_SPACE).min(KEY_SPACE);
    let turn = if cli.gote { Color::Gote } else { Color::Sente };

    let table = match &cli.file {
        Some(path) => VerdictTable::file_backed(path),
        None => VerdictTable::in_memory(),
    };
    let mut table = match table {
        Ok(table) => Some(table),
        Err(err) => {
            eprintln!("no verdict table: {err}");
            cli.check = false;
            cli.empty = false;
            cli.count = false;
            None
        }
    };

    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let interrupt = Arc::clone(&interrupt);
        if let Err(err) = ctrlc::set_handler(move || interrupt.store(true, Ordering::SeqCst)) {
            eprintln!("cannot install the interrupt handler: {err}");
        }
    }

    let clock = Instant::now();

    if cli.check || cli.print {
        let options = ScanOptions {
            start,
            stop,
            print: cli.print,
            check: cli.check,
        };
        match scan(options, table.as_mut(), &interrupt) {
            Ok(legal) => {
                let span = (stop - start) / 2;
                println!(
                    "{legal} positions ({:.3}%)",
                    100.0 * legal as f64 / span.max(1) as f64
                );
            }
            Err(SweepError::Interrupted) => return interrupted(table),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(depth) = cli.depth {
        let board = match Board::parse(&cli.board, turn) {
            Ok(board) => board,
            Err(err) => {
                eprintln!("bad board string: {err}");
                return ExitCode::FAILURE;
            }
        };
        let mut solver = Solver::new(table.take(), cli.verbose, Arc::clone(&interrupt));
        for d in 1..=depth {
            println!("depth {d}");
            if solver.solve(&board, d).is_err() {
                return interrupted(solver.into_table());
            }
            if let Some(table) = solver.table() {
                println!(
                    "{} wins, {} losses, {} queries, {} matches",
                    table.wins(),
                    table.losses(),
                    table.queries(),
                    table.matches()
                );
            }
        }
        table = solver.into_table();
    }

    if cli.count || cli.empty {
        if let Some(active) = table.as_mut() {
            match tally(active, start, stop, cli.empty, &interrupt) {
                Ok(result) => {
                    let span = (stop - start) / 2;
                    println!(
                        "{} positions ({:.3}%), {} wins, {} losses",
                        result.legal,
                        100.0 * result.legal as f64 / span.max(1) as f64,
                        result.won,
                        result.lost
                    );
                }
                Err(_) => return interrupted(table),
            }
        }
    }

    println!("{}s", clock.elapsed().as_secs());
    ExitCode::SUCCESS
}

fn interrupted(table: Option<VerdictTable>) -> ExitCode {
    if let Some(table) = table {
        let _ = table.flush();
    }
    println!();
    println!("got ^C, exiting ...");
    ExitCode::FAILURE
}
