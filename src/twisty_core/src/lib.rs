#![warn(clippy::pedantic)]

//! Pieces, stickers, moves and move sequences of N×N cubes and the Skewb.
//!
//! Everything here is pure data plus in-place mutation of an owned puzzle state; lookup tables are
//! built lazily on first use and shared read-only afterwards.

mod algorithm;
mod cancellation;
mod commutator;
mod coordinate;
mod direction;
mod error;
mod face;
mod letter_scheme;
mod moves;
mod parser;
mod part;
mod skewb;
mod skewb_notation;
mod span;
mod state;
mod sticker_cycle;

pub use algorithm::Algorithm;
pub use commutator::Commutator;
pub use coordinate::Coordinate;
pub use direction::{CubeDirection, Direction, SkewbDirection};
pub use error::{CubeError, ParseError};
pub use face::Face;
pub use letter_scheme::LetterScheme;
pub use moves::{Metric, Move, Rotation, SkewbMove};
pub use parser::{parse_algorithm, parse_commutator, parse_move};
pub use part::{ALPHABET_SIZE, Part, PartCycle, PartKind};
pub use skewb::{SkewbCoordinate, SkewbState};
pub use skewb_notation::SkewbNotation;
pub use span::Span;
pub use state::{CubeState, PuzzleState};
pub use sticker_cycle::StickerCycles;

/// The smallest cube size the engine models.
pub const MIN_CUBE_SIZE: usize = 2;

/// Checks that `size` is a cube size the engine can work with.
///
/// # Errors
///
/// Returns [`CubeError::InvalidCubeSize`] for sizes below [`MIN_CUBE_SIZE`].
pub fn check_cube_size(size: usize) -> Result<(), CubeError> {
    if size < MIN_CUBE_SIZE {
        return Err(CubeError::InvalidCubeSize(size));
    }

    Ok(())
}
