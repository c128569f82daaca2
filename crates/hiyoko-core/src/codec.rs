use crate::board::{sort_hand, Board, Cell, SLOTS, SQUARES};
use crate::lions::{pair_index, pair_squares, LION_PLACEMENTS};
use crate::types::{Animal, Color, Piece};

/// Size of the key space: a 6-bit Lion-pair index above 29 payload bits
/// (1 turn bit, two bits per non-Lion square, one ownership bit per non-Lion
/// piece, one promotion bit per Chick).
pub const KEY_SPACE: u64 = (LION_PLACEMENTS as u64) << 29;

/// Maps a position to its key. `None` when the position lies outside the
/// enumerated set: a Lion missing from the grid, the Lions adjacent, or a
/// Lion already on the far rank.
pub fn encode(board: &Board) -> Option<u64> {
    let mut cells = board.sente_view();
    sort_hand(&mut cells);

    let sente_lion = find_lion(&cells, Color::Sente)?;
    let gote_lion = find_lion(&cells, Color::Gote)?;
    let mut key = u64::from(pair_index(sente_lion, gote_lion)?);

    // One promotion bit per Chick or Hen, hand slots first.
    for piece in cells.iter().rev().flatten() {
        if matches!(piece.animal, Animal::Chick | Animal::Hen) {
            key = key << 1 | u64::from(piece.animal == Animal::Hen);
        }
    }

    // One ownership bit per non-Lion piece.
    for piece in cells.iter().rev().flatten() {
        if piece.animal != Animal::Lion {
            key = key << 1 | u64::from(piece.color == Color::Gote);
        }
    }

    // Two bits per non-Lion square; Hens code as Chicks, their promotion is
    // already recorded.
    for cell in cells[..SQUARES].iter().rev() {
        match cell {
            Some(piece) if piece.animal == Animal::Lion => {}
            Some(piece) => key = key << 2 | square_code(piece.animal),
            None => key <<= 2,
        }
    }

    key = key << 1 | u64::from(board.turn() == Color::Gote);
    Some(key)
}

/// Rebuilds the position for a key. `None` when the key is out of range or
/// decodes to a structurally impossible board: more than two of an animal,
/// or a promoted Chick in hand.
pub fn decode(key: u64) -> Option<Board> {
    if key >= KEY_SPACE {
        return None;
    }

    let mut cells: [Cell; SLOTS] = [None; SLOTS];
    let (sente_lion, gote_lion) = pair_squares((key >> 29) as u8);
    cells[sente_lion as usize] = Some(Piece::new(Animal::Lion, Color::Sente));
    cells[gote_lion as usize] = Some(Piece::new(Animal::Lion, Color::Gote));

    let mut key = key;
    let turn = if key & 1 == 1 { Color::Gote } else { Color::Sente };
    key >>= 1;

    // Pieces on the ten open squares, Sente-owned until the ownership bits
    // say otherwise.
    let mut counts = [0u8; 4];
    for square in 0..SQUARES {
        if cells[square].is_some() {
            continue;
        }
        let code = (key & 0x03) as usize;
        key >>= 2;
        if code != 0 {
            cells[square] = Some(Piece::new(animal_for(code), Color::Sente));
            counts[code] += 1;
            if counts[code] > 2 {
                return None;
            }
        }
    }

    // The rest of the inventory waits in hand, highest kind first.
    let mut kind = 3;
    for slot in SQUARES..SLOTS {
        while kind > 0 && counts[kind] >= 2 {
            kind -= 1;
        }
        if kind == 0 {
            break;
        }
        cells[slot] = Some(Piece::new(animal_for(kind), Color::Sente));
        counts[kind] += 1;
    }

    for cell in cells.iter_mut() {
        if let Some(piece) = cell {
            if piece.animal != Animal::Lion {
                if key & 1 == 1 {
                    *piece = piece.flipped();
                }
                key >>= 1;
            }
        }
    }

    for (slot, cell) in cells.iter_mut().enumerate() {
        if let Some(piece) = cell {
            if piece.animal == Animal::Chick {
                if key & 1 == 1 {
                    if slot >= SQUARES {
                        // A Chick in hand cannot carry a promotion.
                        return None;
                    }
                    *piece = piece.promoted();
                }
                key >>= 1;
            }
        }
    }

    Some(Board::from_sente_view(cells, turn))
}

impl Board {
    /// The position's key, when it has one.
    pub fn key(&self) -> Option<u64> {
        encode(self)
    }
}

fn find_lion(cells: &[Cell; SLOTS], color: Color) -> Option<usize> {
    let lion = Piece::new(Animal::Lion, color);
    cells[..SQUARES].iter().position(|&cell| cell == Some(lion))
}

const fn square_code(animal: Animal) -> u64 {
    match animal {
        Animal::Chick | Animal::Hen => 1,
        Animal::Elephant => 2,
        Animal::Giraffe => 3,
        Animal::Lion => 0,
    }
}

const fn animal_for(code: usize) -> Animal {
    match code {
        1 => Animal::Chick,
        2 => Animal::Elephant,
        _ => Animal::Giraffe,
    }
}
