use std::{fmt, str::FromStr, sync::LazyLock};

use crate::{Algorithm, CubeDirection, CubeError, Move, Rotation};

/// One of the six face symbols. The discriminant is the face index; opposite faces have indices
/// adding up to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Face {
    U,
    F,
    R,
    L,
    B,
    D,
}

/// Clockwise order of the faces around the URF corner. Every valid corner is an even
/// permutation of this once the faces are mapped onto U, F and R.
const CHIRALITY: [Face; 3] = [Face::U, Face::R, Face::F];

static NEIGHBORS: LazyLock<[[Face; 4]; 6]> = LazyLock::new(|| Face::ALL.map(Face::compute_neighbors));

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [U, F, R, L, B, D];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            assert!(v[i] as usize + v[5 - i] as usize == 5);
            i += 1;
        }

        v
    };

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Face {
        Self::ALL[5 - self as usize]
    }

    /// 0 for the U/D axis, 1 for F/B and 2 for R/L
    pub const fn axis_priority(self) -> usize {
        let i = self as usize;
        if i < 5 - i { i } else { 5 - i }
    }

    /// Whether this is one of U, F and R, the faces that coordinates count from.
    pub const fn close_to_smaller_indices(self) -> bool {
        (self as usize) < 3
    }

    pub fn same_axis(self, other: Face) -> bool {
        self.axis_priority() == other.axis_priority()
    }

    pub fn canonical_axis_face(self) -> Face {
        if self.close_to_smaller_indices() {
            self
        } else {
            self.opposite()
        }
    }

    pub fn name(self) -> char {
        match self {
            Face::U => 'U',
            Face::F => 'F',
            Face::R => 'R',
            Face::L => 'L',
            Face::B => 'B',
            Face::D => 'D',
        }
    }

    /// Parses a face letter, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownFace`] if `c` is not one of `UFRLBD`.
    pub fn from_char(c: char) -> Result<Face, CubeError> {
        Face::ALL
            .into_iter()
            .find(|face| face.name() == c.to_ascii_uppercase())
            .ok_or(CubeError::UnknownFace(c))
    }

    /// The four adjacent faces in clockwise order when looking at this face.
    pub fn neighbors(self) -> [Face; 4] {
        NEIGHBORS[self.index()]
    }

    /// The two faces that the coordinates on this face measure their distance from, i.e. the
    /// U/F/R faces not on this face's axis, in face order.
    pub fn coordinate_faces(self) -> [Face; 2] {
        let mut faces = [Face::U, Face::F, Face::R]
            .into_iter()
            .filter(|face| !face.same_axis(self));

        match (faces.next(), faces.next()) {
            (Some(a), Some(b)) => [a, b],
            _ => unreachable!("every axis misses exactly two canonical faces"),
        }
    }

    /// Which of the two coordinates on this face measures the distance to the axis of `to`.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::SameAxis`] if `to` is this face or its opposite.
    pub fn coordinate_index_close_to(self, to: Face) -> Result<usize, CubeError> {
        if self.same_axis(to) {
            return Err(CubeError::SameAxis(self, to));
        }

        Ok(if self.axis_priority() < to.axis_priority() {
            to.axis_priority() - 1
        } else {
            to.axis_priority()
        })
    }

    /// The position this face ends up at after turning the whole puzzle around `axis`.
    pub fn rotated_by(self, axis: Face, direction: CubeDirection) -> Face {
        if self.same_axis(axis) {
            return self;
        }

        let neighbors = axis.neighbors();
        let index = neighbors
            .iter()
            .position(|&face| face == self)
            .unwrap_or_else(|| unreachable!("{self} is adjacent to {axis}"));

        neighbors[(index + usize::from(direction.value())) % neighbors.len()]
    }

    /// A whole-puzzle rotation that moves this face to the position of `other`. Empty if the
    /// faces are equal.
    pub fn rotation_to(self, other: Face) -> Algorithm {
        if self == other {
            return Algorithm::EMPTY;
        }

        // There can be several solutions; take the first canonical axis that works.
        let axis = [Face::U, Face::F, Face::R]
            .into_iter()
            .find(|axis| !axis.same_axis(self) && !axis.same_axis(other))
            .unwrap_or_else(|| unreachable!("two axes leave a third one"));

        let direction = CubeDirection::NON_ZERO
            .into_iter()
            .find(|&direction| self.rotated_by(axis, direction) == other)
            .unwrap_or_else(|| unreachable!("{other} lies on the ring around {axis}"));

        Algorithm::from_move(Move::Rotation(Rotation::new(axis, direction)))
    }

    fn compute_neighbors(self) -> [Face; 4] {
        let [a, b] = self.coordinate_faces();
        let (first, second) = if valid_chirality(&[self, a, b]) {
            (a, b)
        } else {
            (b, a)
        };

        [first, second, first.opposite(), second.opposite()]
    }
}

/// Whether three faces from pairwise different axes appear in clockwise order around their corner.
pub(crate) fn valid_chirality(faces: &[Face; 3]) -> bool {
    let mut canonical = faces.map(Face::canonical_axis_face);
    let swaps = faces
        .iter()
        .filter(|face| !face.close_to_smaller_indices())
        .count();

    // Each face replaced by its opposite mirrors the corner once.
    if swaps % 2 == 1 {
        canonical.reverse();
    }

    (0..3).any(|shift| {
        let mut rotated = canonical;
        rotated.rotate_left(shift);
        rotated == CHIRALITY
    })
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Face {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Face::from_char(c),
            (Some(c), Some(_)) | (None, Some(c)) => Err(CubeError::UnknownFace(c)),
            (None, None) => Err(CubeError::Unsupported("an empty face name".to_owned())),
        }
    }
}
