use std::fmt;

use thiserror::Error;

use crate::movegen::Move;
use crate::types::{Animal, Color, Piece};

pub const HEIGHT: usize = 4;
pub const WIDTH: usize = 3;
pub const SQUARES: usize = HEIGHT * WIDTH;
pub const HAND_SLOTS: usize = 6;
pub const SLOTS: usize = SQUARES + HAND_SLOTS;

/// The standard opening, mover's back rank first: Elephant-Lion-Giraffe,
/// a Chick in front of each Lion, empty hands.
pub const START_POSITION: &str = "ELG C  c gle      ";

pub type Cell = Option<Piece>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid piece character {0:?}")]
    InvalidPiece(char),
}

/// A single game state, stored from the mover's perspective: the side to move
/// plays upward and its pieces are Sente-coded, whichever real player it is.
/// Slots 0..12 are the grid (row-major from the mover's back rank), slots
/// 12..18 the shared pool of captured pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) cells: [Cell; SLOTS],
    turn: Color,
    verdict: i32,
    extension: i32,
}

impl Board {
    pub fn empty(turn: Color) -> Self {
        Self {
            cells: [None; SLOTS],
            turn,
            verdict: 0,
            extension: 0,
        }
    }

    /// Parses an 18-character board string: 12 grid cells then up to 6 hand
    /// slots, space for empty, piece letters with the owner in the case.
    /// Shorter strings leave the remaining cells empty; extra characters are
    /// ignored.
    pub fn parse(s: &str, turn: Color) -> Result<Self, ParseError> {
        let mut board = Self::empty(turn);
        for (slot, code) in s.chars().take(SLOTS).enumerate() {
            if code == ' ' {
                continue;
            }
            board.cells[slot] =
                Some(Piece::from_code(code).ok_or(ParseError::InvalidPiece(code))?);
        }
        board.verdict = surviving_lion_verdict(&board.cells);
        Ok(board)
    }

    pub fn start() -> Self {
        Self::parse(START_POSITION, Color::Sente).expect("start position string is valid")
    }

    pub const fn turn(&self) -> Color {
        self.turn
    }

    /// +1 when the side to move has already won, -1 when it has already lost,
    /// 0 while the game is open.
    pub const fn verdict(&self) -> i32 {
        self.verdict
    }

    /// Extra plies granted to the reply after a Lion stepped onto the far
    /// rank: the arrival only wins if the Lion survives one more move.
    pub const fn extension(&self) -> i32 {
        self.extension
    }

    pub fn cell(&self, slot: usize) -> Cell {
        self.cells[slot]
    }

    pub fn grid(&self) -> &[Cell] {
        &self.cells[..SQUARES]
    }

    pub fn hand(&self) -> &[Cell] {
        &self.cells[SQUARES..]
    }

    /// The cells as the real Sente player sees them, with real owners.
    pub(crate) fn sente_view(&self) -> [Cell; SLOTS] {
        match self.turn {
            Color::Sente => self.cells,
            Color::Gote => flipped_cells(&self.cells),
        }
    }

    pub(crate) fn from_sente_view(cells: [Cell; SLOTS], turn: Color) -> Self {
        let cells = match turn {
            Color::Sente => cells,
            Color::Gote => flipped_cells(&cells),
        };
        Self {
            cells,
            turn,
            verdict: 0,
            extension: 0,
        }
    }

    /// The same position with the hand in canonical slot order.
    pub fn canonical(&self) -> Self {
        let mut board = *self;
        sort_hand(&mut board.cells);
        board
    }

    /// Builds the successor for a legal move of the Sente-coded side.
    /// The result is presented from the new mover's perspective, with the
    /// hand in canonical order so the drop dedup sees duplicates adjacent.
    pub fn apply(&self, mv: Move) -> Self {
        let mut cells = self.cells;
        let from = mv.from as usize;
        let to = mv.to as usize;
        let mut verdict = 0;
        let mut extension = 0;

        if let Some(captured) = cells[to] {
            if captured.animal == Animal::Lion {
                // The new side to move has just lost its Lion.
                verdict = -1;
            }
            if let Some(slot) = (SQUARES..SLOTS).find(|&slot| cells[slot].is_none()) {
                cells[slot] = Some(captured.flipped().demoted());
            }
        }

        cells[to] = cells[from].take();

        if to >= SQUARES - WIDTH {
            if let Some(piece) = cells[to] {
                if piece.animal == Animal::Chick {
                    cells[to] = Some(piece.promoted());
                }
                if piece.animal == Animal::Lion {
                    extension = 2;
                }
            }
        }

        let mut cells = flipped_cells(&cells);
        sort_hand(&mut cells);
        if verdict == 0 {
            verdict = surviving_lion_verdict(&cells);
        }

        Self {
            cells,
            turn: self.turn.opposite(),
            verdict,
            extension,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::start()
    }
}

/// Rotates the grid 180 degrees and hands every piece to the other player,
/// presenting the position from the opposite perspective. Hand slots keep
/// their order.
pub(crate) fn flipped_cells(cells: &[Cell; SLOTS]) -> [Cell; SLOTS] {
    let mut out = [None; SLOTS];
    for square in 0..SQUARES {
        out[square] = cells[SQUARES - 1 - square].map(Piece::flipped);
    }
    for slot in SQUARES..SLOTS {
        out[slot] = cells[slot].map(Piece::flipped);
    }
    out
}

/// Canonical hand order: descending animal kind, empty slots last. The sort
/// is stable and keyed on the kind alone, matching the decoder's back-fill.
pub(crate) fn sort_hand(cells: &mut [Cell; SLOTS]) {
    cells[SQUARES..].sort_by(|a, b| match (a, b) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some(_), None) => std::cmp::Ordering::Less,
        (Some(a), Some(b)) => b.animal.cmp(&a.animal),
    });
}

/// A Sente-coded Lion on the far rank belongs to the side to move: its
/// advance survived the opponent's reply, which decides the game.
fn surviving_lion_verdict(cells: &[Cell; SLOTS]) -> i32 {
    for square in SQUARES - WIDTH..SQUARES {
        if cells[square] == Some(Piece::new(Animal::Lion, Color::Sente)) {
            return 1;
        }
    }
    0
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            match self.turn {
                Color::Sente => " 321",
                Color::Gote => " 123",
            }
        )?;
        for row in (0..HEIGHT).rev() {
            write!(f, "|")?;
            for col in 0..WIDTH {
                match self.cells[row * WIDTH + col] {
                    Some(piece) => write!(f, "{}", piece.code())?,
                    None => write!(f, " ")?,
                }
            }
            let rank = match self.turn {
                Color::Sente => HEIGHT - row,
                Color::Gote => row + 1,
            };
            writeln!(f, "|{rank}")?;
        }
        let hand: String = self.cells[SQUARES..]
            .iter()
            .flatten()
            .map(|piece| piece.code())
            .collect();
        if !hand.is_empty() {
            writeln!(f, "{hand}")?;
        }
        if self.verdict > 0 {
            writeln!(f, "is won")?;
        } else if self.verdict < 0 {
            writeln!(f, "is lost")?;
        }
        Ok(())
    }
}
