use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, Mul},
    str::FromStr,
};

use itertools::Itertools;

use crate::{CubeError, Face, Metric, Move, ParseError, PuzzleState, Rotation};

/// An ordered sequence of moves.
///
/// Concatenation never cancels anything; use [`Algorithm::cancelled`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Algorithm {
    moves: Vec<Move>,
}

impl Algorithm {
    pub const EMPTY: Algorithm = Algorithm { moves: Vec::new() };

    pub fn new(moves: Vec<Move>) -> Algorithm {
        Algorithm { moves }
    }

    pub fn from_move(mv: Move) -> Algorithm {
        Algorithm { moves: vec![mv] }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn into_moves(self) -> Vec<Move> {
        self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Undoes this algorithm: the moves in reverse order, each one inverted.
    #[must_use]
    pub fn inverse(&self) -> Algorithm {
        self.moves.iter().rev().map(|mv| mv.inverse()).collect()
    }

    /// The algorithm that does after `rotation` what this one does before it, e.g. `R U` rotated
    /// by `y` is `F U`.
    #[must_use]
    pub fn rotate_by(&self, rotation: Rotation) -> Algorithm {
        if rotation.direction().is_zero() {
            return self.clone();
        }

        self.moves.iter().map(|mv| mv.rotate_by(rotation)).collect()
    }

    /// Mirrors every move in the plane orthogonal to the axis of `normal`, e.g. `R U F` mirrored
    /// with normal `R` is `L' U' F'`.
    #[must_use]
    pub fn mirror(&self, normal: Face) -> Algorithm {
        self.moves.iter().map(|mv| mv.mirror(normal)).collect()
    }

    /// The sum of the move counts of all moves, without cancelling anything.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Unsupported`] if a move means nothing on this cube size.
    pub fn move_count(&self, size: usize, metric: Metric) -> Result<usize, CubeError> {
        self.moves
            .iter()
            .map(|mv| mv.move_count(size, metric))
            .sum()
    }

    pub fn starts_with(&self, prefix: &Algorithm) -> bool {
        self.moves.starts_with(&prefix.moves)
    }

    pub fn ends_with(&self, suffix: &Algorithm) -> bool {
        self.moves.ends_with(&suffix.moves)
    }

    pub(crate) fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Applies every move in order.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if some move can't be applied to this state, e.g. a slice that the
    /// cube doesn't have. Moves before the failing one stay applied.
    pub fn apply_to<S: PuzzleState + ?Sized>(&self, state: &mut S) -> Result<(), CubeError> {
        for &mv in &self.moves {
            state.apply_move(mv)?;
        }

        Ok(())
    }
}

impl PartialOrd for Algorithm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shorter algorithms come first.
impl Ord for Algorithm {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.moves.cmp(&other.moves))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.moves.iter().join(" "))
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_algorithm(s)
    }
}

impl FromIterator<Move> for Algorithm {
    fn from_iter<T: IntoIterator<Item = Move>>(iter: T) -> Self {
        Algorithm::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Algorithm {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl Add for Algorithm {
    type Output = Algorithm;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.moves.extend(rhs.moves);
        self
    }
}

impl Add<&Algorithm> for &Algorithm {
    type Output = Algorithm;

    fn add(self, rhs: &Algorithm) -> Self::Output {
        self.moves.iter().chain(&rhs.moves).copied().collect()
    }
}

/// Repeats the algorithm.
impl Mul<usize> for &Algorithm {
    type Output = Algorithm;

    fn mul(self, rhs: usize) -> Self::Output {
        Algorithm::new(self.moves.repeat(rhs))
    }
}

impl Mul<usize> for Algorithm {
    type Output = Algorithm;

    fn mul(self, rhs: usize) -> Self::Output {
        &self * rhs
    }
}
