use std::fmt;

use itertools::Itertools;
use memoize::memoize;

use crate::{CubeError, Face, Part, PartKind, check_cube_size};

/// The position of one sticker on an N×N cube.
///
/// `x` counts the distance from the first of the face's [`Face::coordinate_faces`] and `y` from the
/// second one, so both grow away from U, F and R.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    face: Face,
    size: usize,
    coordinates: [usize; 2],
}

// Wings don't have rotations, so on these faces the base position has to be transposed to land in
// the right one of the two wing orbits.
const TRANSPOSED_WING_FACES: [Face; 3] = [Face::U, Face::R, Face::B];

impl Coordinate {
    /// Creates a coordinate from signed values, where negative values count from the far side.
    ///
    /// # Errors
    ///
    /// Fails if the size is unsupported or a value lies outside `-size..size`.
    pub fn new(face: Face, size: usize, x: i64, y: i64) -> Result<Coordinate, CubeError> {
        check_cube_size(size)?;

        Ok(Coordinate {
            face,
            size,
            coordinates: [canonicalize(x, size)?, canonicalize(y, size)?],
        })
    }

    /// # Errors
    ///
    /// Fails if a value is not below `size`.
    pub fn from_indices(face: Face, size: usize, coordinates: [usize; 2]) -> Result<Coordinate, CubeError> {
        check_cube_size(size)?;

        if let Some(&value) = coordinates.iter().find(|&&value| value >= size) {
            return Err(CubeError::CoordinateOutOfRange {
                value: i64::try_from(value).unwrap_or(i64::MAX),
                size,
            });
        }

        Ok(Coordinate {
            face,
            size,
            coordinates,
        })
    }

    /// The sticker on `face` that lies `distance` layers away from each of two neighbor faces of
    /// different axes.
    ///
    /// # Errors
    ///
    /// Fails if the neighbors don't cover both coordinates of `face` or a distance is too big.
    pub fn from_face_distances(
        face: Face,
        size: usize,
        distances: [(Face, usize); 2],
    ) -> Result<Coordinate, CubeError> {
        let mut coordinates = [None; 2];

        for (neighbor, distance) in distances {
            let index = face.coordinate_index_close_to(neighbor)?;
            if distance >= size {
                return Err(CubeError::CoordinateOutOfRange {
                    value: i64::try_from(distance).unwrap_or(i64::MAX),
                    size,
                });
            }

            coordinates[index] = Some(if neighbor.close_to_smaller_indices() {
                distance
            } else {
                size - 1 - distance
            });
        }

        match coordinates {
            [Some(x), Some(y)] => Coordinate::from_indices(face, size, [x, y]),
            _ => Err(CubeError::SameAxis(distances[0].0, distances[1].0)),
        }
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn x(&self) -> usize {
        self.coordinates[0]
    }

    pub fn y(&self) -> usize {
        self.coordinates[1]
    }

    pub fn coordinates(&self) -> [usize; 2] {
        self.coordinates
    }

    pub fn middle(size: usize) -> usize {
        size / 2
    }

    /// The same sticker position after turning its face by a quarter.
    #[must_use]
    pub fn rotate(&self) -> Coordinate {
        let [x, y] = self.coordinates;

        Coordinate {
            coordinates: [y, self.size - 1 - x],
            ..*self
        }
    }

    /// The four positions of this sticker's orbit under turns of its face, starting with itself.
    pub fn rotations(&self) -> [Coordinate; 4] {
        let mut current = *self;

        [(); 4].map(|()| {
            let rotation = current;
            current = current.rotate();
            rotation
        })
    }

    /// Neighbor faces this sticker is in the closer half to, for each coordinate that doesn't
    /// sit exactly in the middle.
    pub fn close_neighbor_faces(&self) -> Vec<Face> {
        let half = self.size / 2;

        self.face
            .coordinate_faces()
            .into_iter()
            .zip(self.coordinates)
            .filter_map(|(neighbor, value)| {
                if value < half {
                    Some(neighbor)
                } else if value >= self.size - half {
                    Some(neighbor.opposite())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Whether this sticker lies on the edge shared with `to`.
    pub fn can_jump_to(&self, to: Face) -> bool {
        let Ok(index) = self.face.coordinate_index_close_to(to) else {
            return false;
        };

        let value = self.coordinates[index];
        if to.close_to_smaller_indices() {
            value == 0
        } else {
            value == self.size - 1
        }
    }

    /// The sticker on `to` that touches this one across their shared edge.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidJump`] if this sticker is not on that edge.
    pub fn jump_to_neighbor(&self, to: Face) -> Result<Coordinate, CubeError> {
        if !self.can_jump_to(to) {
            return Err(CubeError::InvalidJump { from: *self, to });
        }

        let from_index = self.face.coordinate_index_close_to(to)?;
        let to_index = to.coordinate_index_close_to(self.face)?;
        let kept = self.coordinates[1 - from_index];

        let mut coordinates = [0; 2];
        coordinates[to_index] = if self.face.close_to_smaller_indices() {
            0
        } else {
            self.size - 1
        };
        coordinates[1 - to_index] = kept;

        Ok(Coordinate {
            face: to,
            size: self.size,
            coordinates,
        })
    }

    /// Where the first sticker of `part` sits on a solved cube.
    ///
    /// # Errors
    ///
    /// Fails if the part has no such incarnation on a cube of this size.
    pub fn solved_position(part: Part, size: usize, incarnation: usize) -> Result<Coordinate, CubeError> {
        Ok(solved_positions(part, size, incarnation)?[0])
    }

    /// Where all stickers of `part` sit on a solved cube, in the order of the part's faces.
    ///
    /// # Errors
    ///
    /// Fails if the part has no such incarnation on a cube of this size.
    pub fn solved_positions(part: Part, size: usize, incarnation: usize) -> Result<Vec<Coordinate>, CubeError> {
        solved_positions(part, size, incarnation)
    }
}

fn canonicalize(value: i64, size: usize) -> Result<usize, CubeError> {
    let out_of_range = || CubeError::CoordinateOutOfRange { value, size };
    let signed_size = i64::try_from(size).map_err(|_| out_of_range())?;

    if value < -signed_size || value >= signed_size {
        return Err(out_of_range());
    }

    let value = if value < 0 { signed_size + value } else { value };
    usize::try_from(value).map_err(|_| out_of_range())
}

/// One base index for the sticker of a `kind` piece on `face`, before searching the rotation that
/// puts it next to the right neighbors.
fn base_index_on_face(kind: PartKind, face: Face, size: usize, incarnation: usize) -> [usize; 2] {
    let middle = Coordinate::middle(size);

    match kind {
        PartKind::Face => [middle, middle],
        PartKind::Edge => [0, 1],
        PartKind::Midge => [0, middle],
        PartKind::Wing => {
            if TRANSPOSED_WING_FACES.contains(&face) {
                [1 + incarnation, 0]
            } else {
                [0, 1 + incarnation]
            }
        }
        PartKind::Corner => [0, 0],
        PartKind::XCenter => [1 + incarnation, 1 + incarnation],
        PartKind::TCenter => [1 + incarnation, middle],
    }
}

#[memoize(SharedCache)]
fn solved_positions(part: Part, size: usize, incarnation: usize) -> Result<Vec<Coordinate>, CubeError> {
    check_cube_size(size)?;
    part.kind().check_incarnation(size, incarnation)?;

    let neighborhood = part.corresponding_part().faces();

    (0..part.kind().sticker_count())
        .map(|i| {
            let face = neighborhood[i];
            let mut base = base_index_on_face(part.kind(), face, size, incarnation);
            if i > 0 {
                base.reverse();
            }

            let base = Coordinate::from_indices(face, size, base)?;
            let expected = neighborhood
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &face)| face)
                .sorted()
                .collect_vec();

            base.rotations()
                .into_iter()
                .find(|rotation| rotation.close_neighbor_faces().into_iter().sorted().eq(expected.iter().copied()))
                .ok_or(CubeError::NoSolvedPosition { part, base })
        })
        .collect()
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.face, self.x(), self.y())
    }
}
