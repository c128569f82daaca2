use std::fs::OpenOptions;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use memmap2::{MmapMut, MmapOptions};
use thiserror::Error;

use hiyoko_core::KEY_SPACE;

pub const LEGAL: u8 = 0x01;
pub const WIN: u8 = 0x02;
pub const LOSS: u8 = 0x04;

const FLAGS: u8 = LEGAL | WIN | LOSS;
const DEPTH_SHIFT: u8 = 3;
/// Five depth bits, storing depth/2: searches beyond 62 plies clamp.
const DEPTH_CAP: u8 = 0x1f;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot map the verdict table: {0}")]
    Map(#[from] io::Error),
}

/// One byte of verdict per key over the whole key space, backed by an
/// anonymous mapping or by a shared file mapping that persists across runs.
/// Pages are only committed where the table is actually written.
pub struct VerdictTable {
    map: MmapMut,
    persistent: bool,
    won: u64,
    lost: u64,
    queried: u64,
    matched: u64,
}

impl VerdictTable {
    pub fn in_memory() -> Result<Self, TableError> {
        let map = MmapOptions::new().len(KEY_SPACE as usize).map_anon()?;
        Ok(Self::wrap(map, false))
    }

    pub fn file_backed(path: &Path) -> Result<Self, TableError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        // Grow the file sparsely to its full size; the byte past the end
        // marks a complete table.
        file.seek(SeekFrom::Start(KEY_SPACE))?;
        file.write_all(&[0xff])?;
        let map = unsafe { MmapOptions::new().len(KEY_SPACE as usize).map_mut(&file)? };
        Ok(Self::wrap(map, true))
    }

    fn wrap(map: MmapMut, persistent: bool) -> Self {
        Self {
            map,
            persistent,
            won: 0,
            lost: 0,
            queried: 0,
            matched: 0,
        }
    }

    pub const fn len(&self) -> u64 {
        KEY_SPACE
    }

    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Records a verdict and the depth it was found at. The depth field is
    /// overwritten, the flag bits accumulate.
    pub fn enter(&mut self, key: u64, depth: i32, verdict: i32) {
        if key >= KEY_SPACE {
            return;
        }
        let mark = match verdict {
            v if v > 0 => WIN,
            v if v < 0 => LOSS,
            _ => 0,
        };
        let cell = &mut self.map[key as usize];
        if mark != 0 && *cell & mark == 0 {
            if mark == WIN {
                self.won += 1;
            } else {
                self.lost += 1;
            }
        }
        *cell = (*cell & FLAGS) | mark | (stored_depth(depth) << DEPTH_SHIFT);
    }

    /// Asks whether the search can stop here: `Some(±1)` for a recorded
    /// verdict, `Some(0)` when the entry was already searched at least this
    /// deep. Otherwise the stored depth is raised to the request and `None`
    /// says to keep searching.
    pub fn probe(&mut self, key: u64, depth: i32) -> Option<i32> {
        self.queried += 1;
        if key >= KEY_SPACE {
            return None;
        }
        let cell = &mut self.map[key as usize];
        let verdict = if *cell & (WIN | LOSS) != 0 {
            if *cell & WIN != 0 {
                1
            } else {
                -1
            }
        } else if i32::from(*cell >> DEPTH_SHIFT) * 2 >= depth {
            0
        } else {
            *cell = (*cell & FLAGS) | (stored_depth(depth) << DEPTH_SHIFT);
            return None;
        };
        self.matched += 1;
        Some(verdict)
    }

    pub fn mark_legal(&mut self, key: u64) {
        if key < KEY_SPACE {
            self.map[key as usize] |= LEGAL;
        }
    }

    /// Drops the verdict and depth, keeping only legality.
    pub fn clear_verdict(&mut self, key: u64) {
        if key < KEY_SPACE {
            self.map[key as usize] &= LEGAL;
        }
    }

    pub fn entry(&self, key: u64) -> u8 {
        if key < KEY_SPACE {
            self.map[key as usize]
        } else {
            0
        }
    }

    pub fn flush(&self) -> io::Result<()> {
        if self.persistent {
            self.map.flush()
        } else {
            Ok(())
        }
    }

    pub const fn wins(&self) -> u64 {
        self.won
    }

    pub const fn losses(&self) -> u64 {
        self.lost
    }

    pub const fn queries(&self) -> u64 {
        self.queried
    }

    pub const fn matches(&self) -> u64 {
        self.matched
    }
}

impl Drop for VerdictTable {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

fn stored_depth(depth: i32) -> u8 {
    (depth.max(0) / 2).min(i32::from(DEPTH_CAP)) as u8
}
