use arrayvec::ArrayVec;

use crate::board::{Board, HEIGHT, SLOTS, SQUARES, WIDTH};
use crate::types::{Animal, Color};

/// King-neighborhood steps in scan order, `(rank, file)` deltas with the
/// mover playing toward increasing ranks.
pub const DIRS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Which of the eight steps each animal may take, indexed by `Animal`.
/// The Hen moves like a gold general: everything but the rear diagonals.
pub const ANIMAL_STEPS: [[bool; 8]; 5] = [
    // Chick: forward only.
    [false, false, false, false, false, false, true, false],
    // Hen
    [false, true, false, true, true, true, true, true],
    // Elephant: diagonals.
    [true, false, true, false, false, true, false, true],
    // Giraffe: orthogonals.
    [false, true, false, true, true, false, true, false],
    // Lion
    [true, true, true, true, true, true, true, true],
];

/// A move of the Sente-coded side: `from` is a grid square or a hand slot
/// (a drop when `from >= 12`), `to` is always a grid square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: u8,
    pub to: u8,
}

impl Move {
    pub const fn is_drop(self) -> bool {
        self.from as usize >= SQUARES
    }

    /// Renders the move in the real board coordinates of the given player,
    /// file then rank; drops show only the destination.
    pub fn describe(self, turn: Color) -> String {
        let coords = |slot: usize| match turn {
            Color::Sente => (
                WIDTH - (SQUARES - 1 - slot) % WIDTH,
                (SQUARES - 1 - slot) / WIDTH + 1,
            ),
            Color::Gote => (slot % WIDTH + 1, slot / WIDTH + 1),
        };
        let (to_file, to_rank) = coords(self.to as usize);
        if self.is_drop() {
            format!("*{to_file}{to_rank}")
        } else {
            let (from_file, from_rank) = coords(self.from as usize);
            format!("{from_file}{from_rank}->{to_file}{to_rank}")
        }
    }
}

pub type MoveList = ArrayVec<Move, 128>;

/// Lazily enumerates every legal move of the side to move: board pieces walk
/// their step table, hand pieces drop onto any empty square. Sources are
/// visited in slot order; a hand slot holding the same piece as the previous
/// one is skipped, since its drops would be duplicates.
#[derive(Debug, Clone)]
pub struct Moves<'a> {
    board: &'a Board,
    slot: usize,
    step: usize,
}

impl<'a> Moves<'a> {
    fn source_piece(&self, slot: usize) -> Option<Animal> {
        let piece = self.board.cells[slot]?;
        if !piece.is_sente() {
            return None;
        }
        if slot > SQUARES && self.board.cells[slot - 1] == Some(piece) {
            return None;
        }
        Some(piece.animal)
    }

    fn step_target(&self, from: usize, animal: Animal, step: usize) -> Option<u8> {
        if !ANIMAL_STEPS[animal as usize][step] {
            return None;
        }
        let (dr, dc) = DIRS[step];
        let row = (from / WIDTH) as i8 + dr;
        let col = (from % WIDTH) as i8 + dc;
        if !(0..HEIGHT as i8).contains(&row) || !(0..WIDTH as i8).contains(&col) {
            return None;
        }
        let to = row as usize * WIDTH + col as usize;
        match self.board.cells[to] {
            Some(piece) if piece.is_sente() => None,
            _ => Some(to as u8),
        }
    }
}

impl<'a> Iterator for Moves<'a> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        while self.slot < SLOTS {
            let Some(animal) = self.source_piece(self.slot) else {
                self.slot += 1;
                self.step = 0;
                continue;
            };
            if self.slot < SQUARES {
                while self.step < DIRS.len() {
                    let step = self.step;
                    self.step += 1;
                    if let Some(to) = self.step_target(self.slot, animal, step) {
                        return Some(Move {
                            from: self.slot as u8,
                            to,
                        });
                    }
                }
            } else {
                while self.step < SQUARES {
                    let to = self.step;
                    self.step += 1;
                    if self.board.cells[to].is_none() {
                        return Some(Move {
                            from: self.slot as u8,
                            to: to as u8,
                        });
                    }
                }
            }
            self.slot += 1;
            self.step = 0;
        }
        None
    }
}

impl Board {
    pub fn moves(&self) -> Moves<'_> {
        Moves {
            board: self,
            slot: 0,
            step: 0,
        }
    }

    pub fn move_list(&self) -> MoveList {
        self.moves().collect()
    }

    pub fn children(&self) -> impl Iterator<Item = (Move, Board)> + '_ {
        self.moves().map(move |mv| (mv, self.apply(mv)))
    }
}
