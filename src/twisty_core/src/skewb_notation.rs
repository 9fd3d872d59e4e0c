use std::{fmt, str::FromStr};

use itertools::Itertools;

use crate::{
    Algorithm, CubeError, Face, Move, ParseError, Part, PartKind, Rotation,
    cancellation::num_tail_rotations, parser::parse_skewb_algorithm,
};

use Face::{B, D, F, L, R, U};

/// A way of naming Skewb turns where each letter turns around one corner.
///
/// A notation only needs to name one of every two diagonally opposite corners: a turn around the
/// other one is the same as a turn around the named one plus a rotation of the whole puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkewbNotation {
    name: &'static str,
    moves: &'static [(char, [Face; 3])],
}

impl SkewbNotation {
    pub const FIXED_CORNER: SkewbNotation = SkewbNotation {
        name: "fixed corner",
        moves: &[('U', [U, L, B]), ('R', [D, R, B]), ('L', [D, F, L]), ('B', [D, B, L])],
    };

    pub const SARAH: SkewbNotation = SkewbNotation {
        name: "sarah",
        moves: &[('F', [U, R, F]), ('R', [U, B, R]), ('B', [U, L, B]), ('L', [U, F, L])],
    };

    pub const RUBIKS: SkewbNotation = SkewbNotation {
        name: "rubiks",
        moves: &[
            ('F', [U, R, F]),
            ('R', [U, B, R]),
            ('B', [U, L, B]),
            ('L', [U, F, L]),
            ('f', [D, F, R]),
            ('r', [D, R, B]),
            ('b', [D, B, L]),
            ('l', [D, L, F]),
        ],
    };

    pub const ALL: [SkewbNotation; 3] = [
        SkewbNotation::FIXED_CORNER,
        SkewbNotation::SARAH,
        SkewbNotation::RUBIKS,
    ];

    /// A notation with custom letters.
    ///
    /// # Errors
    ///
    /// Fails if a letter is used twice, the faces don't form a corner, or some corner can't be
    /// turned with this notation.
    pub fn new(name: &'static str, moves: &'static [(char, [Face; 3])]) -> Result<SkewbNotation, CubeError> {
        if let Some(letter) = moves.iter().map(|(letter, _)| letter).duplicates().next() {
            return Err(CubeError::Unsupported(format!(
                "using the letter `{letter}` twice in a Skewb notation"
            )));
        }

        for (_, faces) in moves {
            Part::corner_between(*faces)?;
        }

        let notation = SkewbNotation { name, moves };
        notation.check_coverage()?;
        Ok(notation)
    }

    pub fn name(self) -> &'static str {
        self.name
    }

    /// The move letters in the order the notation lists them.
    pub fn letters(self) -> impl Iterator<Item = char> {
        self.moves.iter().map(|&(letter, _)| letter)
    }

    /// The corner that `letter` turns around.
    pub fn corner(self, letter: char) -> Option<Part> {
        self.moves
            .iter()
            .find(|&&(candidate, _)| candidate == letter)
            .and_then(|&(_, faces)| Part::corner_between(faces).ok())
    }

    fn letter_for(self, corner: Part) -> Option<char> {
        self.letters()
            .find(|&letter| self.corner(letter).is_some_and(|named| named.turned_equals(corner)))
    }

    /// # Errors
    ///
    /// Returns [`CubeError::UncoveredCorner`] if neither a corner nor its diagonal opposite has a
    /// letter.
    pub fn check_coverage(self) -> Result<(), CubeError> {
        for corner in Part::all(PartKind::Corner) {
            if self.letter_for(corner).is_none() && self.letter_for(diagonal_opposite(corner)).is_none() {
                return Err(CubeError::UncoveredCorner(corner, self.name));
            }
        }

        Ok(())
    }

    /// Parses letters of this notation together with rotations, e.g. `F R' B x`. A trailing `'`
    /// or `2` turns backward, a trailing `2'` forward.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] at the first token that isn't a move of this notation.
    pub fn parse_algorithm(self, source: &str) -> Result<Algorithm, ParseError> {
        parse_skewb_algorithm(source, |letter| self.corner(letter))
    }

    /// Writes a Skewb algorithm in this notation. Turns around corners without a letter become
    /// turns of the opposite corner; the rotation that makes up for that is carried through the
    /// rest of the algorithm and written at the end.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::WrongPuzzle`] if the algorithm contains cube moves.
    pub fn algorithm_to_string(self, algorithm: &Algorithm) -> Result<String, CubeError> {
        let (body, tail) = algorithm
            .moves()
            .split_at(algorithm.len() - num_tail_rotations(algorithm));

        let mut reversed_rotations: Vec<Rotation> = Vec::new();
        let mut words = Vec::new();

        for &mv in body {
            let mv = reversed_rotations
                .iter()
                .fold(mv, |mv, rotation| mv.rotate_by(rotation.inverse()));

            match mv {
                Move::Rotation(rotation) => words.push(rotation.to_string()),
                Move::Skewb(turn) => {
                    let corner = turn.axis_corner();
                    let letter = if let Some(letter) = self.letter_for(corner) {
                        letter
                    } else {
                        let letter = self
                            .letter_for(diagonal_opposite(corner))
                            .ok_or(CubeError::UncoveredCorner(corner, self.name))?;

                        let compensation = Rotation::around_corner(corner, turn.direction());
                        reversed_rotations.extend(compensation.moves().iter().rev().filter_map(
                            |mv| match mv {
                                Move::Rotation(rotation) => Some(*rotation),
                                _ => None,
                            },
                        ));
                        letter
                    };

                    words.push(format!("{letter}{}", turn.direction().name()));
                }
                _ => return Err(CubeError::WrongPuzzle { mv, puzzle: "Skewb" }),
            }
        }

        let rotations = reversed_rotations
            .into_iter()
            .rev()
            .map(Move::Rotation)
            .chain(tail.iter().copied())
            .collect::<Algorithm>()
            .cancelled(3)?;

        if !rotations.is_empty() {
            words.push(rotations.to_string());
        }

        Ok(words.join(" "))
    }
}

fn diagonal_opposite(corner: Part) -> Part {
    let faces = match corner.faces() {
        &[a, b, c] => [a, b, c],
        _ => unreachable!("corners have three faces"),
    };

    Part::corner_between(faces.map(Face::opposite))
        .unwrap_or_else(|_| unreachable!("opposite faces keep their axes apart"))
}

impl fmt::Display for SkewbNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for SkewbNotation {
    type Err = CubeError;

    /// Accepts the names case-insensitively, with `_`, `-` or a space between words.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace(['_', '-'], " ");

        SkewbNotation::ALL
            .into_iter()
            .find(|notation| notation.name == normalized)
            .ok_or_else(|| CubeError::Unsupported(format!("the Skewb notation `{s}`")))
    }
}
