use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use hiyoko_core::decode;

use crate::search::Interrupted;
use crate::table::{VerdictTable, LEGAL, LOSS, WIN};

/// Progress cadence: one update per 2^21 keys.
const PROGRESS_MASK: u64 = (1 << 21) - 1;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("key {key:#x} re-encoded as {reencoded:?}")]
    RoundTrip { key: u64, reencoded: Option<u64> },
    #[error("interrupted")]
    Interrupted,
}

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub start: u64,
    pub stop: u64,
    pub print: bool,
    pub check: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub legal: u64,
    pub won: u64,
    pub lost: u64,
}

/// Walks the even keys of `[start, stop)`, decoding each. Counts the legal
/// positions, optionally prints them, and in check mode verifies the
/// round trip and stamps the LEGAL bit, failing fast on the first mismatch.
pub fn scan(
    options: ScanOptions,
    mut table: Option<&mut VerdictTable>,
    interrupt: &AtomicBool,
) -> Result<u64, SweepError> {
    let bar = progress_bar(options.start, options.stop);
    let mut legal = 0u64;

    let mut key = options.start;
    while key < options.stop {
        if key & PROGRESS_MASK == 0 {
            bar.set_position(key - options.start);
            if interrupt.load(Ordering::Relaxed) {
                bar.abandon();
                return Err(SweepError::Interrupted);
            }
        }

        if let Some(board) = decode(key) {
            legal += 1;
            if options.print {
                bar.suspend(|| println!("{key:#x}\n{board}"));
            }
            if options.check {
                let reencoded = board.key();
                if reencoded != Some(key) {
                    bar.abandon();
                    return Err(SweepError::RoundTrip { key, reencoded });
                }
                if let Some(table) = table.as_deref_mut() {
                    table.mark_legal(key);
                }
            }
        }

        key += 2;
    }

    bar.finish_and_clear();
    Ok(legal)
}

/// Counts the LEGAL entries of `[start, stop)` and their verdict breakdown;
/// with `clear` set, verdicts and depths are wiped while legality stays.
pub fn tally(
    table: &mut VerdictTable,
    start: u64,
    stop: u64,
    clear: bool,
    interrupt: &AtomicBool,
) -> Result<Tally, Interrupted> {
    let bar = progress_bar(start, stop);
    let mut tally = Tally::default();

    let mut key = start;
    while key < stop {
        if key & PROGRESS_MASK == 0 {
            bar.set_position(key - start);
            if interrupt.load(Ordering::Relaxed) {
                bar.abandon();
                return Err(Interrupted);
            }
        }

        let entry = table.entry(key);
        if entry & LEGAL != 0 {
            tally.legal += 1;
            if entry & WIN != 0 {
                tally.won += 1;
            }
            if entry & LOSS != 0 {
                tally.lost += 1;
            }
            if clear && entry != LEGAL {
                table.clear_verdict(key);
            }
        }

        key += 2;
    }

    bar.finish_and_clear();
    Ok(tally)
}

fn progress_bar(start: u64, stop: u64) -> ProgressBar {
    let bar = ProgressBar::new(stop.saturating_sub(start));
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan}] {percent}% {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
