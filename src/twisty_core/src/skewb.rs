use std::{fmt, sync::LazyLock};

use fxhash::FxHashMap;
use itertools::Itertools;
use log::debug;

use crate::{
    CubeError, Face, Move, Part, PartKind, PuzzleState, Rotation, SkewbDirection, SkewbMove,
    StickerCycles, state::net_rows,
};

const STICKERS_PER_FACE: usize = 5;

/// A sticker of the Skewb: the center of a face or one of the four corner stickers around it.
///
/// Index 0 is the center. Corner stickers are numbered by the sides of the face's two coordinate
/// axes they lie on, so `1 + 2 * a + b` where `a` and `b` are 0 towards U, F or R and 1 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SkewbCoordinate {
    face: Face,
    index: u8,
}

impl SkewbCoordinate {
    pub fn center(face: Face) -> SkewbCoordinate {
        SkewbCoordinate { face, index: 0 }
    }

    /// The sticker of `corner` that lies on its primary face.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidPart`] if `corner` is not a corner.
    pub fn for_corner(corner: Part) -> Result<SkewbCoordinate, CubeError> {
        match (corner.kind(), corner.faces()) {
            (PartKind::Corner, &[face, a, b]) => Ok(SkewbCoordinate::corner_sticker(face, [a, b])),
            _ => Err(CubeError::InvalidPart {
                kind: PartKind::Corner,
                faces: corner.to_string(),
            }),
        }
    }

    // The sticker on `face` of the corner that also touches the two `others`.
    fn corner_sticker(face: Face, others: [Face; 2]) -> SkewbCoordinate {
        let side = |axis: Face| {
            let neighbor = others
                .into_iter()
                .find(|other| other.same_axis(axis))
                .unwrap_or_else(|| unreachable!("the faces of a corner lie on three axes"));
            u8::from(!neighbor.close_to_smaller_indices())
        };

        let [a, b] = face.coordinate_faces();
        SkewbCoordinate {
            face,
            index: 1 + 2 * side(a) + side(b),
        }
    }

    /// All 30 stickers, face by face.
    #[allow(clippy::cast_possible_truncation)]
    pub fn all() -> impl Iterator<Item = SkewbCoordinate> {
        Face::ALL
            .into_iter()
            .cartesian_product(0..STICKERS_PER_FACE)
            .map(|(face, index)| SkewbCoordinate {
                face,
                index: index as u8,
            })
    }

    pub fn face(self) -> Face {
        self.face
    }

    pub fn index(self) -> usize {
        usize::from(self.index)
    }

    pub fn is_center(self) -> bool {
        self.index == 0
    }

    /// The corner this sticker belongs to, turned so that the sticker's face comes first. `None`
    /// for centers.
    pub fn corner(self) -> Option<Part> {
        let faces = self.corner_faces()?;
        let corner = Part::corner_between(faces)
            .and_then(|corner| corner.rotate_face_up(self.face))
            .unwrap_or_else(|_| unreachable!("corner stickers touch three axes"));

        Some(corner)
    }

    fn corner_faces(self) -> Option<[Face; 3]> {
        if self.is_center() {
            return None;
        }

        let bits = self.index - 1;
        let [a, b] = self.face.coordinate_faces();
        let side = |face: Face, far: bool| if far { face.opposite() } else { face };

        Some([self.face, side(a, bits & 2 != 0), side(b, bits & 1 != 0)])
    }

    /// Where this sticker ends up after turning the whole puzzle.
    #[must_use]
    pub fn rotate_by(self, rotation: Rotation) -> SkewbCoordinate {
        match self.corner_faces() {
            None => SkewbCoordinate::center(rotation.apply_to_face(self.face)),
            Some(faces) => {
                let [face, a, b] = faces.map(|face| rotation.apply_to_face(face));
                SkewbCoordinate::corner_sticker(face, [a, b])
            }
        }
    }

    fn position(self) -> usize {
        self.face.index() * STICKERS_PER_FACE + self.index()
    }
}

impl fmt::Display for SkewbCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.corner() {
            Some(corner) => write!(f, "{corner}"),
            None => write!(f, "{}", self.face),
        }
    }
}

/// The stickers moved by a clockwise turn around each corner, keyed by the corner as a
/// [`SkewbMove`] names it.
static TURN_CYCLES: LazyLock<FxHashMap<Part, StickerCycles<SkewbCoordinate>>> = LazyLock::new(|| {
    let turns: FxHashMap<_, _> = Part::all(PartKind::Corner)
        .filter_map(|corner| SkewbMove::new(corner, SkewbDirection::FORWARD).ok())
        .map(|mv| (mv.axis_corner(), turn_cycles(mv.axis_corner())))
        .collect();

    debug!("Built the Skewb turn table with {} elements", turns.len());
    turns
});

fn turn_cycles(corner: Part) -> StickerCycles<SkewbCoordinate> {
    let faces = match corner.faces() {
        &[a, b, c] => [a, b, c],
        _ => unreachable!("corners have three faces"),
    };
    let sticker = |[face, a, b]: [Face; 3]| SkewbCoordinate::corner_sticker(face, [a, b]);
    let rotated = |faces: [Face; 3], r: usize| [faces[r], faces[(r + 1) % 3], faces[(r + 2) % 3]];

    // The three neighbors sharing two faces with the corner, ordered so that a clockwise turn
    // moves each one onto the next.
    let adjacent = [0, 1, 2].map(|i| [faces[i].opposite(), faces[(i + 2) % 3], faces[(i + 1) % 3]]);

    let mut cycles = vec![
        (0..3).map(|r| sticker(rotated(faces, r))).collect_vec(),
        faces.iter().map(|&face| SkewbCoordinate::center(face)).collect_vec(),
    ];
    cycles.extend((0..3).map(|r| {
        adjacent
            .iter()
            .map(|&corner| sticker(rotated(corner, r)))
            .collect_vec()
    }));

    StickerCycles::new(cycles)
        .unwrap_or_else(|err| unreachable!("a corner turn moves every sticker once: {err}"))
}

/// The stickers of a Skewb. Each sticker holds the face symbol of the color it shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SkewbState {
    stickers: [Face; 6 * STICKERS_PER_FACE],
}

impl SkewbState {
    pub fn solved() -> SkewbState {
        SkewbState {
            stickers: std::array::from_fn(|i| Face::ALL[i / STICKERS_PER_FACE]),
        }
    }

    fn sticker(&self, coordinate: SkewbCoordinate) -> Face {
        self.stickers[coordinate.position()]
    }

    /// Whether the face at `face` shows one color and every neighbor face continues it with two
    /// equal corner stickers. The layer may have any color, not necessarily the one of `face`.
    pub fn layer_at_face_solved(&self, face: Face) -> bool {
        let face_solved = (0..STICKERS_PER_FACE)
            .map(|index| self.stickers[face.index() * STICKERS_PER_FACE + index])
            .all_equal();

        let neighbors = face.neighbors();
        face_solved
            && (0..4).all(|i| {
                let [neighbor, side] = [neighbors[i], neighbors[(i + 1) % 4]];
                self.sticker(SkewbCoordinate::corner_sticker(neighbor, [face, side]))
                    == self.sticker(SkewbCoordinate::corner_sticker(neighbor, [face, side.opposite()]))
            })
    }

    /// The colors of all solved layers, in the order of the faces they are found at.
    pub fn solved_layers(&self) -> Vec<Face> {
        Face::ALL
            .into_iter()
            .filter(|&face| self.layer_at_face_solved(face))
            .map(|face| self.sticker(SkewbCoordinate::center(face)))
            .collect()
    }

    pub fn any_layer_solved(&self) -> bool {
        Face::ALL
            .into_iter()
            .any(|face| self.layer_at_face_solved(face))
    }

    fn face_grid(&self, face: Face, up: Face, right: Face) -> Vec<Vec<Face>> {
        let center = self.sticker(SkewbCoordinate::center(face));

        (0..3)
            .map(|row| {
                (0..3)
                    .map(|col| {
                        if row == 1 || col == 1 {
                            return center;
                        }

                        let vertical = if row == 0 { up } else { up.opposite() };
                        let horizontal = if col == 0 { right.opposite() } else { right };
                        self.sticker(SkewbCoordinate::corner_sticker(face, [vertical, horizontal]))
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for SkewbState {
    fn default() -> Self {
        SkewbState::solved()
    }
}

impl PuzzleState for SkewbState {
    type Coordinate = SkewbCoordinate;

    fn get(&self, coordinate: SkewbCoordinate) -> Result<Face, CubeError> {
        Ok(self.sticker(coordinate))
    }

    fn set(&mut self, coordinate: SkewbCoordinate, color: Face) -> Result<(), CubeError> {
        self.stickers[coordinate.position()] = color;
        Ok(())
    }

    fn apply_rotation(&mut self, rotation: Rotation) -> Result<(), CubeError> {
        let before = self.stickers;
        for coordinate in SkewbCoordinate::all() {
            self.stickers[coordinate.rotate_by(rotation).position()] = before[coordinate.position()];
        }

        Ok(())
    }

    fn apply_move(&mut self, mv: Move) -> Result<(), CubeError> {
        match mv {
            Move::Rotation(rotation) => self.apply_rotation(rotation),
            Move::Skewb(turn) => {
                let cycles = TURN_CYCLES
                    .get(&turn.axis_corner())
                    .unwrap_or_else(|| unreachable!("every corner has a turn"));
                cycles.apply_to(self, usize::from(turn.direction().value()))
            }
            _ => Err(CubeError::WrongPuzzle { mv, puzzle: "Skewb" }),
        }
    }

    fn is_solved(&self) -> bool {
        self.stickers
            .chunks(STICKERS_PER_FACE)
            .all(|face| face.iter().all_equal())
    }
}

impl fmt::Display for SkewbState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = net_rows(3, |face, up, right| Ok(self.face_grid(face, up, right)))
            .map_err(|_| fmt::Error)?;
        write!(f, "{}", rows.iter().join("\n"))
    }
}
