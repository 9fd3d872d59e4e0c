use std::{fmt, hash::Hash};

use itertools::Itertools;
use log::debug;
use memoize::memoize;

use crate::{
    Algorithm, Coordinate, CubeDirection, CubeError, Face, Move, Part, PartCycle, Rotation,
    StickerCycles, check_cube_size,
};

/// A puzzle whose stickers can be read, written and permuted.
pub trait PuzzleState: Clone + Eq + fmt::Display {
    type Coordinate: Copy + Eq + Hash + fmt::Display;

    /// # Errors
    ///
    /// Returns a [`CubeError`] if the position doesn't exist on this puzzle.
    fn get(&self, coordinate: Self::Coordinate) -> Result<Face, CubeError>;

    /// # Errors
    ///
    /// Returns a [`CubeError`] if the position doesn't exist on this puzzle.
    fn set(&mut self, coordinate: Self::Coordinate, color: Face) -> Result<(), CubeError>;

    /// Moves the sticker at `cycle[i]` to `cycle[i + 1]` and the last one to the first.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if a position doesn't exist on this puzzle.
    fn apply_sticker_cycle(&mut self, cycle: &[Self::Coordinate]) -> Result<(), CubeError> {
        let Some(&last) = cycle.last() else {
            return Ok(());
        };

        let mut carried = self.get(last)?;
        for &coordinate in cycle {
            let next = self.get(coordinate)?;
            self.set(coordinate, carried)?;
            carried = next;
        }

        Ok(())
    }

    /// # Errors
    ///
    /// Returns a [`CubeError`] if the rotation can't be applied.
    fn apply_rotation(&mut self, rotation: Rotation) -> Result<(), CubeError>;

    /// # Errors
    ///
    /// Returns a [`CubeError`] if the move is for another puzzle or doesn't fit this one.
    fn apply_move(&mut self, mv: Move) -> Result<(), CubeError>;

    /// # Errors
    ///
    /// Returns a [`CubeError`] if a move is for another puzzle or doesn't fit this one.
    fn apply_algorithm(&mut self, algorithm: &Algorithm) -> Result<(), CubeError> {
        algorithm.apply_to(self)
    }

    /// Applies the algorithm, hands the state to `inspect` and undoes the algorithm again.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if the algorithm can't be applied.
    fn with_applied<T>(
        &mut self,
        algorithm: &Algorithm,
        inspect: impl FnOnce(&Self) -> T,
    ) -> Result<T, CubeError> {
        let moves = algorithm.moves();
        for (applied, &mv) in moves.iter().enumerate() {
            if let Err(e) = self.apply_move(mv) {
                debug!("Undoing the {applied} moves before {mv}, which failed: {e}");
                Algorithm::new(moves[..applied].to_vec()).inverse().apply_to(self)?;
                return Err(e);
            }
        }

        let result = inspect(self);
        self.apply_algorithm(&algorithm.inverse())?;

        Ok(result)
    }

    /// Whether every face shows a single color.
    fn is_solved(&self) -> bool;
}

/// The stickers of an N×N cube. Each sticker holds the face symbol of the color it shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CubeState {
    size: usize,
    stickers: Vec<Face>,
}

impl CubeState {
    /// A solved cube where every sticker shows the color of its face.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidCubeSize`] for unsupported sizes.
    pub fn solved(size: usize) -> Result<CubeState, CubeError> {
        check_cube_size(size)?;

        Ok(CubeState {
            size,
            stickers: Face::ALL
                .into_iter()
                .flat_map(|face| std::iter::repeat_n(face, size * size))
                .collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, coordinate: Coordinate) -> Result<usize, CubeError> {
        if coordinate.size() != self.size {
            return Err(CubeError::SizeMismatch {
                coordinate: coordinate.size(),
                state: self.size,
            });
        }

        let [x, y] = coordinate.coordinates();
        Ok((coordinate.face().index() * self.size + x) * self.size + y)
    }

    /// Cycles the pieces: the first piece moves to the place of the second one and so on.
    ///
    /// # Errors
    ///
    /// Fails on fewer than 2 parts, mixed kinds, repeated parts or an incarnation that the
    /// cube doesn't have.
    pub fn apply_piece_cycle(&mut self, parts: &[Part], incarnation: usize) -> Result<(), CubeError> {
        let cycle = PartCycle::new(parts.to_vec())?;
        self.apply_part_cycle(&cycle, incarnation)
    }

    /// # Errors
    ///
    /// Fails if the cube has no such incarnation of the parts.
    pub fn apply_part_cycle(&mut self, cycle: &PartCycle, incarnation: usize) -> Result<(), CubeError> {
        cycle.kind().check_incarnation(self.size, incarnation)?;

        let positions = cycle
            .parts()
            .iter()
            .map(|&part| Coordinate::solved_positions(part, self.size, incarnation))
            .collect::<Result<Vec<_>, _>>()?;

        let sticker_cycles: Vec<Vec<Coordinate>> = (0..cycle.kind().sticker_count())
            .map(|sticker| positions.iter().map(|stickers| stickers[sticker]).collect())
            .collect();

        StickerCycles::new(sticker_cycles)?.apply_to(self, 1)
    }

    /// The stickers of `face` as seen from outside, row by row, with `up` at the top and `right`
    /// to the right.
    fn face_grid(&self, face: Face, up: Face, right: Face) -> Result<Vec<Vec<Face>>, CubeError> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| {
                        let coordinate = Coordinate::from_face_distances(
                            face,
                            self.size,
                            [(up, row), (right.opposite(), col)],
                        )?;
                        self.get(coordinate)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

impl PuzzleState for CubeState {
    type Coordinate = Coordinate;

    fn get(&self, coordinate: Coordinate) -> Result<Face, CubeError> {
        Ok(self.stickers[self.index(coordinate)?])
    }

    fn set(&mut self, coordinate: Coordinate, color: Face) -> Result<(), CubeError> {
        let index = self.index(coordinate)?;
        self.stickers[index] = color;
        Ok(())
    }

    fn apply_rotation(&mut self, rotation: Rotation) -> Result<(), CubeError> {
        self.apply_move(Move::Rotation(rotation))
    }

    fn apply_move(&mut self, mv: Move) -> Result<(), CubeError> {
        if let Move::Skewb(_) = mv {
            return Err(CubeError::WrongPuzzle { mv, puzzle: "cube" });
        }

        let mv = mv.decide_meaning(self.size)?;
        let Some((_, direction)) = mv.axis() else {
            return Ok(());
        };

        if direction.is_zero() {
            return Ok(());
        }

        let quarter_turn = mv.with_direction(CubeDirection::FORWARD);
        quarter_turn_cycles(quarter_turn, self.size)?.apply_to(self, usize::from(direction.value()))
    }

    fn is_solved(&self) -> bool {
        self.stickers
            .chunks(self.size * self.size)
            .all(|face| face.iter().all_equal())
    }
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = net_rows(self.size, |face, up, right| self.face_grid(face, up, right))
            .map_err(|_| fmt::Error)?;
        write!(f, "{}", rows.iter().join("\n"))
    }
}

/// Lays the faces out as an unfolded cube: U on top, L F R B in the middle and D at the bottom.
/// `face_grid(face, up, right)` renders one face of `size` rows with `up` above it.
pub(crate) fn net_rows(
    size: usize,
    face_grid: impl Fn(Face, Face, Face) -> Result<Vec<Vec<Face>>, CubeError>,
) -> Result<Vec<String>, CubeError> {
    use Face::{B, D, F, L, R, U};

    let render = |face, up, right| -> Result<Vec<String>, CubeError> {
        Ok(face_grid(face, up, right)?
            .into_iter()
            .map(|row| row.iter().map(|face| face.name()).collect())
            .collect())
    };

    let indent = " ".repeat(size + 1);
    let top = render(U, B, R)?;
    let middle = [render(L, U, F)?, render(F, U, R)?, render(R, U, B)?, render(B, U, L)?];
    let bottom = render(D, F, R)?;

    let mut rows = top.iter().map(|row| format!("{indent}{row}")).collect_vec();
    rows.extend((0..size).map(|i| middle.iter().map(|face| &face[i]).join(" ")));
    rows.extend(bottom.iter().map(|row| format!("{indent}{row}")));

    Ok(rows)
}

fn face_cycles(face: Face, size: usize) -> Result<Vec<Vec<Coordinate>>, CubeError> {
    let neighbors = face.neighbors();

    (0..size / 2)
        .cartesian_product(0..size.div_ceil(2))
        .map(|(a, b)| {
            (0..4)
                .map(|i| {
                    Coordinate::from_face_distances(
                        face,
                        size,
                        [(neighbors[i], a), (neighbors[(i + 1) % 4], b)],
                    )
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

// The stickers on the four neighbor faces that lie `depth` layers away from `face`.
fn ring_cycles(face: Face, size: usize, depth: usize) -> Result<Vec<Vec<Coordinate>>, CubeError> {
    let neighbors = face.neighbors();

    (0..size)
        .map(|t| {
            (0..4)
                .map(|i| {
                    Coordinate::from_face_distances(
                        neighbors[i],
                        size,
                        [(face, depth), (neighbors[(i + 1) % 4], t)],
                    )
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

fn reversed(cycles: Vec<Vec<Coordinate>>) -> Vec<Vec<Coordinate>> {
    cycles
        .into_iter()
        .map(|mut cycle| {
            cycle.reverse();
            cycle
        })
        .collect()
}

fn rings(face: Face, size: usize, depths: std::ops::Range<usize>) -> Result<Vec<Vec<Coordinate>>, CubeError> {
    depths
        .map(|depth| ring_cycles(face, size, depth))
        .flatten_ok()
        .collect()
}

/// The sticker cycles of a quarter turn of a resolved cube move or rotation.
#[memoize(SharedCache)]
fn quarter_turn_cycles(mv: Move, size: usize) -> Result<StickerCycles, CubeError> {
    debug!("Computing the sticker cycles of {mv} on the {size}x{size} cube");

    let cycles = match mv.decide_meaning(size)? {
        Move::Rotation(rotation) => {
            let face = rotation.axis_face();
            let mut cycles = face_cycles(face, size)?;
            cycles.extend(rings(face, size, 0..size)?);
            cycles.extend(reversed(face_cycles(face.opposite(), size)?));
            cycles
        }
        Move::Fat {
            axis_face, width, ..
        } => {
            if width == 0 || width > size {
                return Err(CubeError::InvalidWidth { width, size });
            }

            let mut cycles = face_cycles(axis_face, size)?;
            cycles.extend(rings(axis_face, size, 0..width)?);
            if width == size {
                cycles.extend(reversed(face_cycles(axis_face.opposite(), size)?));
            }
            cycles
        }
        Move::Slice {
            axis_face,
            slice_index,
            ..
        }
        | Move::InnerMSlice {
            axis_face,
            slice_index,
            ..
        } => {
            crate::moves::check_slice_index(slice_index, size)?;
            ring_cycles(axis_face, size, slice_index)?
        }
        Move::FatMSlice { axis_face, .. } => {
            if size < 3 {
                return Err(CubeError::Unsupported(format!("the move {mv} on a {size}x{size} cube")));
            }
            rings(axis_face, size, 1..size - 1)?
        }
        Move::MaybeFatMaybeSlice { .. } | Move::MaybeMSlice { .. } => {
            unreachable!("the meaning was decided above")
        }
        Move::Skewb(_) => return Err(CubeError::WrongPuzzle { mv, puzzle: "cube" }),
    };

    StickerCycles::new(cycles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PartKind, parse_algorithm, parse_move};

    fn apply(size: usize, algorithm: &str) -> CubeState {
        let mut state = CubeState::solved(size).unwrap();
        state.apply_algorithm(&parse_algorithm(algorithm).unwrap()).unwrap();
        state
    }

    fn sticker(state: &CubeState, face: Face, x: i64, y: i64) -> Face {
        state
            .get(Coordinate::new(face, state.size(), x, y).unwrap())
            .unwrap()
    }

    #[test_log::test]
    fn solved_state() {
        let state = CubeState::solved(3).unwrap();
        assert!(state.is_solved());
        assert_eq!(sticker(&state, Face::R, 1, 2), Face::R);
        assert!(CubeState::solved(1).is_err());
    }

    #[test_log::test]
    fn quarter_turns_restore() {
        for size in 2..=5 {
            for face in Face::ALL {
                let mv = Move::outer(face, CubeDirection::FORWARD);
                let mut state = CubeState::solved(size).unwrap();

                state.apply_move(mv).unwrap();
                assert_ne!(state, CubeState::solved(size).unwrap());

                for _ in 0..3 {
                    state.apply_move(mv).unwrap();
                }
                assert_eq!(state, CubeState::solved(size).unwrap(), "{mv} on {size}x{size}");
            }
        }
    }

    #[test_log::test]
    fn face_turn_directions() {
        // U moves the front stickers to the left face.
        let state = apply(3, "U");
        assert_eq!(sticker(&state, Face::L, 0, 1), Face::F);
        assert_eq!(sticker(&state, Face::F, 0, 1), Face::R);
        assert_eq!(sticker(&state, Face::F, 1, 1), Face::F);

        // R moves the front stickers up.
        let state = apply(3, "R");
        assert_eq!(sticker(&state, Face::U, 1, 0), Face::F);
        assert_eq!(sticker(&state, Face::B, 1, 0), Face::U);
        assert_eq!(sticker(&state, Face::U, 1, 2), Face::U);
    }

    #[test_log::test]
    fn rotations_keep_faces_solved() {
        for rotation in ["x", "y'", "z2"] {
            let state = apply(4, rotation);
            assert!(state.is_solved());
            assert_ne!(state, CubeState::solved(4).unwrap());
        }

        let state = apply(3, "x");
        assert_eq!(sticker(&state, Face::U, 1, 1), Face::F);
        assert_eq!(sticker(&state, Face::B, 1, 1), Face::U);

        assert_eq!(apply(3, "x"), apply(3, "R M' L'"));
        assert_eq!(apply(4, "y"), apply(4, "4Uw"));
    }

    #[test_log::test]
    fn moves_agree_with_their_layers() {
        assert_eq!(apply(3, "Rw"), apply(3, "R M'"));
        assert_eq!(apply(3, "r"), apply(3, "Rw"));
        assert_eq!(apply(4, "Rw"), apply(4, "R r"));
        assert_eq!(apply(4, "M"), apply(4, "2l 2r'"));
        assert_eq!(apply(5, "3Rw"), apply(5, "R r M'"));
        assert_eq!(apply(4, "2r"), apply(4, "l'"));
        assert_eq!(apply(4, "3Rw"), apply(4, "x L"));
    }

    #[test_log::test]
    fn commutator_has_order_six() {
        let mut state = CubeState::solved(3).unwrap();
        let sexy = parse_algorithm("R U R' U'").unwrap();

        for _ in 0..5 {
            state.apply_algorithm(&sexy).unwrap();
            assert_ne!(state, CubeState::solved(3).unwrap());
        }

        state.apply_algorithm(&sexy).unwrap();
        assert_eq!(state, CubeState::solved(3).unwrap());
    }

    #[test_log::test]
    fn swapped_moves_have_the_same_effect() {
        let pairs = [("x", "U"), ("U", "x"), ("R", "L'"), ("y2", "3Rw"), ("z", "M")];

        for (a, b) in pairs {
            let (a, b) = (parse_move(a).unwrap(), parse_move(b).unwrap());
            let (c, d) = a.swap(b).unwrap();

            assert_eq!(
                apply(4, &format!("{a} {b}")),
                apply(4, &format!("{c} {d}")),
                "{a} {b} -> {c} {d}"
            );
        }
    }

    #[test_log::test]
    fn rotation_to_moves_colors() {
        for from in Face::ALL {
            for to in Face::ALL {
                let mut state = CubeState::solved(3).unwrap();
                state.apply_algorithm(&from.rotation_to(to)).unwrap();

                let center = Coordinate::new(to, 3, 1, 1).unwrap();
                assert_eq!(state.get(center), Ok(from), "{from} -> {to}");
            }
        }
    }

    #[test_log::test]
    fn piece_cycles() {
        let uf = Part::parse(PartKind::Edge, "UF").unwrap();
        let ur = Part::parse(PartKind::Edge, "UR").unwrap();
        let ub = Part::parse(PartKind::Edge, "UB").unwrap();

        let mut state = CubeState::solved(3).unwrap();
        state.apply_piece_cycle(&[uf, ur, ub], 0).unwrap();

        let ur_sticker = Coordinate::solved_position(ur, 3, 0).unwrap();
        let ur_side = Coordinate::solved_positions(ur, 3, 0).unwrap()[1];
        assert_eq!(state.get(ur_sticker), Ok(Face::U));
        assert_eq!(state.get(ur_side), Ok(Face::F));

        state.apply_piece_cycle(&[ub, ur, uf], 0).unwrap();
        assert_eq!(state, CubeState::solved(3).unwrap());

        let fu = Part::parse(PartKind::Edge, "FU").unwrap();
        assert!(state.apply_piece_cycle(&[uf, fu], 0).is_err());
        assert!(state.apply_piece_cycle(&[uf], 0).is_err());
        assert!(state.apply_piece_cycle(&[uf, ur], 1).is_err());

        let wing = Part::parse(PartKind::Wing, "UF").unwrap();
        assert!(state.apply_piece_cycle(&[uf, wing], 0).is_err());
        assert!(state.apply_piece_cycle(&[wing, Part::parse(PartKind::Wing, "UR").unwrap()], 0).is_err());
    }

    #[test_log::test]
    fn piece_cycle_matches_algorithm() {
        // The U perm cycles three edges of the top layer.
        let mut by_pieces = CubeState::solved(3).unwrap();
        let edges = ["UF", "UL", "UR"].map(|name| Part::parse(PartKind::Edge, name).unwrap());
        by_pieces.apply_piece_cycle(&edges, 0).unwrap();

        let by_moves = apply(3, "R2 U R U R' U' R' U' R' U R'");
        let by_moves_inverse = apply(3, "R U' R U R U R U' R' U' R2");
        assert!(by_pieces == by_moves || by_pieces == by_moves_inverse);
    }

    #[test_log::test]
    fn preview_restores_the_state() {
        let mut state = apply(3, "R U");
        let before = state.clone();

        let solved = state
            .with_applied(&parse_algorithm("U' R'").unwrap(), CubeState::is_solved)
            .unwrap();

        assert!(solved);
        assert_eq!(state, before);
    }

    #[test_log::test]
    fn failed_preview_restores_the_state() {
        let mut state = CubeState::solved(3).unwrap();

        let result = state.with_applied(&parse_algorithm("R U 2r F").unwrap(), CubeState::is_solved);

        assert_eq!(result, Err(CubeError::InvalidSliceIndex { index: 2, size: 3 }));
        assert!(state.is_solved());

        let mut state = apply(4, "F");
        let before = state.clone();
        assert!(state.with_applied(&parse_algorithm("R 5Rw").unwrap(), |_| ()).is_err());
        assert_eq!(state, before);
    }

    #[test_log::test]
    fn wrong_inputs() {
        let mut state = CubeState::solved(3).unwrap();
        assert!(state.apply_move(parse_move("4Rw").unwrap()).is_err());
        assert!(state.apply_move(parse_move("2r").unwrap()).is_err());
        assert!(
            state
                .get(Coordinate::new(Face::U, 4, 0, 0).unwrap())
                .is_err()
        );

        let mut small = CubeState::solved(2).unwrap();
        assert!(small.apply_move(parse_move("u").unwrap()).is_err());
        assert!(small.apply_move(parse_move("M").unwrap()).is_err());
    }

    #[test_log::test]
    fn net() {
        let state = CubeState::solved(2).unwrap();
        assert_eq!(state.to_string(), "   UU\n   UU\nLL FF RR BB\nLL FF RR BB\n   DD\n   DD");
    }
}
