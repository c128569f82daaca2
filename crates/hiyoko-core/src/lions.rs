use std::sync::LazyLock;

use crate::board::SQUARES;

pub const LION_PLACEMENTS: usize = 39;

const NO_PAIR: u8 = u8::MAX;

/// Every legal `(sente_square, gote_square)` placement of the two Lions:
/// never adjacent (kings may not touch), the Sente Lion never on Gote's back
/// rank and vice versa (those positions are already decided).
pub const LION_PAIRS: [(u8, u8); LION_PLACEMENTS] = [
    (0, 5),
    (0, 6),
    (0, 7),
    (0, 8),
    (0, 9),
    (0, 10),
    (0, 11),
    (1, 6),
    (1, 7),
    (1, 8),
    (1, 9),
    (1, 10),
    (1, 11),
    (2, 3),
    (2, 6),
    (2, 7),
    (2, 8),
    (2, 9),
    (2, 10),
    (2, 11),
    (3, 5),
    (3, 8),
    (3, 9),
    (3, 10),
    (3, 11),
    (4, 9),
    (4, 10),
    (4, 11),
    (5, 3),
    (5, 6),
    (5, 9),
    (5, 10),
    (5, 11),
    (6, 5),
    (6, 8),
    (6, 11),
    (8, 3),
    (8, 6),
    (8, 9),
];

static PAIR_INDEX: LazyLock<[[u8; SQUARES]; SQUARES]> = LazyLock::new(|| {
    let mut grid = [[NO_PAIR; SQUARES]; SQUARES];
    for (index, &(sente, gote)) in LION_PAIRS.iter().enumerate() {
        grid[sente as usize][gote as usize] = index as u8;
    }
    grid
});

pub fn pair_index(sente: usize, gote: usize) -> Option<u8> {
    match PAIR_INDEX[sente][gote] {
        NO_PAIR => None,
        index => Some(index),
    }
}

pub const fn pair_squares(index: u8) -> (u8, u8) {
    LION_PAIRS[index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::WIDTH;

    fn adjacent(a: usize, b: usize) -> bool {
        let (ar, ac) = (a / WIDTH, a % WIDTH);
        let (br, bc) = (b / WIDTH, b % WIDTH);
        ar.abs_diff(br) <= 1 && ac.abs_diff(bc) <= 1
    }

    #[test]
    fn table_is_exactly_the_nonadjacent_nonfinal_placements() {
        let mut derived = Vec::new();
        for sente in 0..SQUARES - WIDTH {
            for gote in WIDTH..SQUARES {
                if !adjacent(sente, gote) {
                    derived.push((sente as u8, gote as u8));
                }
            }
        }
        assert_eq!(derived.len(), LION_PLACEMENTS);
        assert_eq!(derived, LION_PAIRS.to_vec());
    }

    #[test]
    fn pair_index_inverts_pair_squares() {
        for index in 0..LION_PLACEMENTS as u8 {
            let (sente, gote) = pair_squares(index);
            assert_eq!(pair_index(sente as usize, gote as usize), Some(index));
        }
    }

    #[test]
    fn adjacent_and_final_rank_placements_are_rejected() {
        assert_eq!(pair_index(0, 1), None);
        assert_eq!(pair_index(0, 4), None);
        assert_eq!(pair_index(7, 11), None);
        // Sente Lion on Gote's back rank is a decided game, not a placement.
        assert_eq!(pair_index(9, 3), None);
        assert_eq!(pair_index(11, 0), None);
    }
}
