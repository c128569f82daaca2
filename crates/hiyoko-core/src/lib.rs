pub mod board;
pub mod codec;
pub mod lions;
pub mod movegen;
pub mod types;

pub use board::{
    Board, Cell, ParseError, HAND_SLOTS, HEIGHT, SLOTS, SQUARES, START_POSITION, WIDTH,
};
pub use codec::{decode, encode, KEY_SPACE};
pub use lions::{pair_index, pair_squares, LION_PAIRS, LION_PLACEMENTS};
pub use movegen::{Move, MoveList, Moves, ANIMAL_STEPS, DIRS};
pub use types::{Animal, Color, Piece};
