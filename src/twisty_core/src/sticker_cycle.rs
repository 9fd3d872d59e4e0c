use std::{fmt, hash::Hash};

use itertools::Itertools;

use crate::{Coordinate, CubeError, PuzzleState};

/// Disjoint cycles of sticker positions that are applied together. In each cycle the sticker at
/// position `i` moves to position `i + 1` and the last one to the first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StickerCycles<C = Coordinate> {
    cycles: Vec<Vec<C>>,
}

impl<C: Copy + Eq + Hash + fmt::Display> StickerCycles<C> {
    /// # Errors
    ///
    /// Returns [`CubeError::RepeatedSticker`] if a position appears twice, within one cycle or
    /// across cycles.
    pub fn new(cycles: Vec<Vec<C>>) -> Result<StickerCycles<C>, CubeError> {
        if let Some(repeated) = cycles.iter().flatten().duplicates().next() {
            return Err(CubeError::RepeatedSticker(repeated.to_string()));
        }

        Ok(StickerCycles { cycles })
    }

    pub fn cycles(&self) -> &[Vec<C>] {
        &self.cycles
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.iter().all(|cycle| cycle.len() < 2)
    }

    #[must_use]
    pub fn inverse(&self) -> StickerCycles<C> {
        StickerCycles {
            cycles: self
                .cycles
                .iter()
                .map(|cycle| cycle.iter().rev().copied().collect())
                .collect(),
        }
    }

    /// Applies all cycles `times` times.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if a position doesn't exist on the state.
    pub fn apply_to<S>(&self, state: &mut S, times: usize) -> Result<(), CubeError>
    where
        S: PuzzleState<Coordinate = C> + ?Sized,
    {
        for _ in 0..times {
            for cycle in &self.cycles {
                state.apply_sticker_cycle(cycle)?;
            }
        }

        Ok(())
    }
}

impl<C: fmt::Display> fmt::Display for StickerCycles<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cycles = self
            .cycles
            .iter()
            .map(|cycle| format!("({})", cycle.iter().join(" ")))
            .join(" ");

        f.write_str(&cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CubeState, Face};

    fn coordinate(face: Face, x: i64, y: i64) -> Coordinate {
        Coordinate::new(face, 3, x, y).unwrap()
    }

    #[test_log::test]
    fn rejects_repeated_stickers() {
        let a = coordinate(Face::U, 0, 0);
        let b = coordinate(Face::F, 0, 0);

        assert!(StickerCycles::new(vec![vec![a, b]]).is_ok());
        assert_eq!(
            StickerCycles::new(vec![vec![a, b], vec![b, coordinate(Face::R, 0, 0)]]),
            Err(CubeError::RepeatedSticker(b.to_string()))
        );
        assert!(StickerCycles::new(vec![vec![a, b, a]]).is_err());
    }

    #[test_log::test]
    fn applies_and_inverts() {
        let a = coordinate(Face::U, 0, 0);
        let b = coordinate(Face::F, 0, 0);
        let c = coordinate(Face::R, 1, 1);
        let cycles = StickerCycles::new(vec![vec![a, b, c]]).unwrap();

        let mut state = CubeState::solved(3).unwrap();
        cycles.apply_to(&mut state, 1).unwrap();
        assert_eq!(state.get(b), Ok(Face::U));
        assert_eq!(state.get(c), Ok(Face::F));
        assert_eq!(state.get(a), Ok(Face::R));

        cycles.inverse().apply_to(&mut state, 1).unwrap();
        assert!(state.is_solved());

        cycles.apply_to(&mut state, 3).unwrap();
        assert!(state.is_solved());
        assert_eq!(cycles.to_string(), "(U(0, 0) F(0, 0) R(1, 1))");
    }
}
