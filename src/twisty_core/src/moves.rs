use std::{fmt, str::FromStr};

use crate::{Algorithm, CubeDirection, CubeError, Face, Part, PartKind, SkewbDirection};

/// Rotation letters indexed by axis priority
const AXES: [char; 3] = ['y', 'z', 'x'];

/// The faces whose middle layers have a letter of their own
const SLICE_NAMES: [(Face, char); 3] = [(Face::L, 'M'), (Face::D, 'E'), (Face::F, 'S')];

/// Ways of counting the length of an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    /// Quarter turns; half turns and inner layers count double
    Qtm,
    /// Half turns count once, inner layers twice
    #[default]
    Htm,
    /// Every turn of any block counts once
    Stm,
    /// Half turns count double, inner layers once
    Sqtm,
    /// Same as sqtm
    Qstm,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Qtm,
        Metric::Htm,
        Metric::Stm,
        Metric::Sqtm,
        Metric::Qstm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Qtm => "qtm",
            Metric::Htm => "htm",
            Metric::Stm => "stm",
            Metric::Sqtm => "sqtm",
            Metric::Qstm => "qstm",
        }
    }

    fn count(self, slice_factor: usize, direction_factor: usize) -> usize {
        match self {
            Metric::Qtm => slice_factor * direction_factor,
            Metric::Htm => slice_factor,
            Metric::Stm => 1,
            Metric::Sqtm | Metric::Qstm => direction_factor,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CubeError::Unsupported(format!("the move metric `{s}`")))
    }
}

/// A whole-puzzle rotation around the axis through `axis_face`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rotation {
    axis_face: Face,
    direction: CubeDirection,
}

impl Rotation {
    pub const fn new(axis_face: Face, direction: CubeDirection) -> Rotation {
        Rotation {
            axis_face,
            direction,
        }
    }

    /// The nine non-trivial rotations around the U, F and R axes.
    pub fn canonical() -> impl Iterator<Item = Rotation> {
        [Face::U, Face::F, Face::R].into_iter().flat_map(|face| {
            CubeDirection::NON_ZERO
                .into_iter()
                .map(move |direction| Rotation::new(face, direction))
        })
    }

    pub fn axis_face(self) -> Face {
        self.axis_face
    }

    pub fn direction(self) -> CubeDirection {
        self.direction
    }

    #[must_use]
    pub fn inverse(self) -> Rotation {
        Rotation::new(self.axis_face, self.direction.inverse())
    }

    /// The same rotation expressed around the opposite face.
    #[must_use]
    pub fn alternative(self) -> Rotation {
        Rotation::new(self.axis_face.opposite(), self.direction.inverse())
    }

    /// The direction as seen from the U, F or R side of the axis.
    pub fn canonical_direction(self) -> CubeDirection {
        if self.axis_face.close_to_smaller_indices() {
            self.direction
        } else {
            self.direction.inverse()
        }
    }

    /// Where the sticker on `face` ends up.
    pub fn apply_to_face(self, face: Face) -> Face {
        face.rotated_by(self.axis_face, self.direction)
    }

    /// Rotations that turn the whole puzzle around the diagonal through `corner`, as far as a Skewb
    /// turn of that corner in `direction` would.
    pub fn around_corner(corner: Part, direction: SkewbDirection) -> Algorithm {
        if direction.is_zero() {
            return Algorithm::EMPTY;
        }

        let faces = corner.faces();
        let cube_direction = direction.to_cube_direction();

        Algorithm::new(vec![
            Move::Rotation(Rotation::new(
                faces[usize::from(direction.value())],
                cube_direction,
            )),
            Move::Rotation(Rotation::new(faces[0], cube_direction)),
        ])
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            AXES[self.axis_face.axis_priority()],
            self.canonical_direction().name()
        )
    }
}

/// A Skewb turn around one of the eight corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SkewbMove {
    axis_corner: Part,
    direction: SkewbDirection,
}

impl SkewbMove {
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidPart`] if `axis_corner` is not a corner.
    pub fn new(axis_corner: Part, direction: SkewbDirection) -> Result<SkewbMove, CubeError> {
        if axis_corner.kind() != PartKind::Corner {
            return Err(CubeError::InvalidPart {
                kind: PartKind::Corner,
                faces: axis_corner.to_string(),
            });
        }

        Ok(SkewbMove {
            axis_corner: canonical_corner(axis_corner),
            direction,
        })
    }

    pub fn axis_corner(self) -> Part {
        self.axis_corner
    }

    pub fn direction(self) -> SkewbDirection {
        self.direction
    }

    #[must_use]
    pub fn inverse(self) -> SkewbMove {
        SkewbMove {
            direction: self.direction.inverse(),
            ..self
        }
    }

    #[must_use]
    pub fn rotate_by(self, rotation: Rotation) -> SkewbMove {
        let [a, b, c] = corner_faces(self.axis_corner);
        SkewbMove {
            axis_corner: corner_from_faces([a, b, c].map(|face| rotation.apply_to_face(face))),
            ..self
        }
    }

    #[must_use]
    pub fn mirror(self, normal: Face) -> SkewbMove {
        let faces = corner_faces(self.axis_corner)
            .map(|face| if face.same_axis(normal) { face.opposite() } else { face });

        SkewbMove {
            axis_corner: corner_from_faces(faces),
            direction: self.direction.inverse(),
        }
    }
}

fn corner_faces(corner: Part) -> [Face; 3] {
    match corner.faces() {
        &[a, b, c] => [a, b, c],
        _ => unreachable!("corners have three faces"),
    }
}

fn corner_from_faces(faces: [Face; 3]) -> Part {
    Part::corner_between(faces)
        .map(canonical_corner)
        .unwrap_or_else(|_| unreachable!("rotations and mirrors keep faces on different axes"))
}

// Skewb moves name their corner starting with the face of the smallest index.
fn canonical_corner(corner: Part) -> Part {
    corner
        .rotations()
        .into_iter()
        .min_by_key(|part| part.primary_face().index())
        .unwrap_or(corner)
}

/// A single move of a cube or Skewb.
///
/// The size-ambiguous variants only get a definite meaning once the cube size is known; see
/// [`Move::decide_meaning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Move {
    Rotation(Rotation),
    /// The `width` outer layers on the side of `axis_face`. Width 1 is a plain face turn.
    Fat {
        axis_face: Face,
        direction: CubeDirection,
        width: usize,
    },
    /// The single layer `slice_index` layers away from `axis_face`.
    Slice {
        axis_face: Face,
        direction: CubeDirection,
        slice_index: usize,
    },
    /// Every layer except the two outer ones.
    FatMSlice {
        axis_face: Face,
        direction: CubeDirection,
    },
    /// The one middle layer of an odd cube.
    InnerMSlice {
        axis_face: Face,
        direction: CubeDirection,
        slice_index: usize,
    },
    /// Written like `u`: a fat move of width 2 on the 3x3 and the first slice on bigger cubes.
    MaybeFatMaybeSlice {
        axis_face: Face,
        direction: CubeDirection,
    },
    /// Written like `M`: every inner layer on even cubes and the middle layer on odd ones.
    MaybeMSlice {
        axis_face: Face,
        direction: CubeDirection,
    },
    Skewb(SkewbMove),
}

impl Move {
    /// A plain face turn.
    pub const fn outer(axis_face: Face, direction: CubeDirection) -> Move {
        Move::Fat {
            axis_face,
            direction,
            width: 1,
        }
    }

    /// # Errors
    ///
    /// Returns [`CubeError::ZeroWidth`] if `width` is 0.
    pub fn fat(axis_face: Face, direction: CubeDirection, width: usize) -> Result<Move, CubeError> {
        if width == 0 {
            return Err(CubeError::ZeroWidth);
        }

        Ok(Move::Fat {
            axis_face,
            direction,
            width,
        })
    }

    /// # Errors
    ///
    /// Returns [`CubeError::OuterSlice`] if `slice_index` is 0.
    pub fn slice(axis_face: Face, direction: CubeDirection, slice_index: usize) -> Result<Move, CubeError> {
        if slice_index == 0 {
            return Err(CubeError::OuterSlice);
        }

        Ok(Move::Slice {
            axis_face,
            direction,
            slice_index,
        })
    }

    pub fn rotation(axis_face: Face, direction: CubeDirection) -> Move {
        Move::Rotation(Rotation::new(axis_face, direction))
    }

    /// The axis face and direction of everything but Skewb moves.
    pub fn axis(self) -> Option<(Face, CubeDirection)> {
        match self {
            Move::Rotation(rotation) => Some((rotation.axis_face, rotation.direction)),
            Move::Fat {
                axis_face,
                direction,
                ..
            }
            | Move::Slice {
                axis_face,
                direction,
                ..
            }
            | Move::FatMSlice {
                axis_face,
                direction,
            }
            | Move::InnerMSlice {
                axis_face,
                direction,
                ..
            }
            | Move::MaybeFatMaybeSlice {
                axis_face,
                direction,
            }
            | Move::MaybeMSlice {
                axis_face,
                direction,
            } => Some((axis_face, direction)),
            Move::Skewb(_) => None,
        }
    }

    /// The axis face of moves that turn some layers of a cube.
    pub fn cube_axis_face(self) -> Option<Face> {
        match self {
            Move::Rotation(_) | Move::Skewb(_) => None,
            _ => self.axis().map(|(face, _)| face),
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(self, Move::Rotation(_))
    }

    pub fn is_identity(self) -> bool {
        match self {
            Move::Skewb(skewb_move) => skewb_move.direction.is_zero(),
            _ => self.axis().is_some_and(|(_, direction)| direction.is_zero()),
        }
    }

    // Replaces axis face and direction, keeping widths and indices. Skewb moves stay untouched.
    fn map_axis(self, f: impl FnOnce(Face, CubeDirection) -> (Face, CubeDirection)) -> Move {
        match self {
            Move::Rotation(rotation) => {
                let (axis_face, direction) = f(rotation.axis_face, rotation.direction);
                Move::rotation(axis_face, direction)
            }
            Move::Fat {
                axis_face,
                direction,
                width,
            } => {
                let (axis_face, direction) = f(axis_face, direction);
                Move::Fat {
                    axis_face,
                    direction,
                    width,
                }
            }
            Move::Slice {
                axis_face,
                direction,
                slice_index,
            } => {
                let (axis_face, direction) = f(axis_face, direction);
                Move::Slice {
                    axis_face,
                    direction,
                    slice_index,
                }
            }
            Move::FatMSlice {
                axis_face,
                direction,
            } => {
                let (axis_face, direction) = f(axis_face, direction);
                Move::FatMSlice {
                    axis_face,
                    direction,
                }
            }
            Move::InnerMSlice {
                axis_face,
                direction,
                slice_index,
            } => {
                let (axis_face, direction) = f(axis_face, direction);
                Move::InnerMSlice {
                    axis_face,
                    direction,
                    slice_index,
                }
            }
            Move::MaybeFatMaybeSlice {
                axis_face,
                direction,
            } => {
                let (axis_face, direction) = f(axis_face, direction);
                Move::MaybeFatMaybeSlice {
                    axis_face,
                    direction,
                }
            }
            Move::MaybeMSlice {
                axis_face,
                direction,
            } => {
                let (axis_face, direction) = f(axis_face, direction);
                Move::MaybeMSlice {
                    axis_face,
                    direction,
                }
            }
            Move::Skewb(_) => self,
        }
    }

    /// The same move turning by `direction` instead. Skewb moves are returned unchanged.
    #[must_use]
    pub(crate) fn with_direction(self, direction: CubeDirection) -> Move {
        self.map_axis(|face, _| (face, direction))
    }

    /// Negates the direction; every other field stays the same.
    #[must_use]
    pub fn inverse(self) -> Move {
        match self {
            Move::Skewb(skewb_move) => Move::Skewb(skewb_move.inverse()),
            _ => self.map_axis(|face, direction| (face, direction.inverse())),
        }
    }

    /// Resolves `u`-style and `M`-style moves to the concrete move they mean on a cube of this
    /// size. Other moves are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Unsupported`] if the move means nothing on this size, like `u` on the
    /// 2x2 or `M` below the 3x3.
    pub fn decide_meaning(self, size: usize) -> Result<Move, CubeError> {
        match self {
            Move::MaybeFatMaybeSlice {
                axis_face,
                direction,
            } => match size {
                0..=2 => Err(CubeError::Unsupported(format!(
                    "the move {self} on a {size}x{size} cube"
                ))),
                3 => Ok(Move::Fat {
                    axis_face,
                    direction,
                    width: 2,
                }),
                _ => Ok(Move::Slice {
                    axis_face,
                    direction,
                    slice_index: 1,
                }),
            },
            Move::MaybeMSlice {
                axis_face,
                direction,
            } => {
                if size < 3 {
                    Err(CubeError::Unsupported(format!(
                        "the move {self} on a {size}x{size} cube"
                    )))
                } else if size % 2 == 0 {
                    Ok(Move::FatMSlice {
                        axis_face,
                        direction,
                    })
                } else {
                    Ok(Move::InnerMSlice {
                        axis_face,
                        direction,
                        slice_index: size / 2,
                    })
                }
            }
            _ => Ok(self),
        }
    }

    /// Whether the move turns inner layers only. Size-ambiguous moves have to be resolved first.
    pub fn is_slice_move(self) -> bool {
        matches!(
            self,
            Move::Slice { .. } | Move::FatMSlice { .. } | Move::InnerMSlice { .. }
        )
    }

    /// The number of moves this counts as in `metric`. Rotations and identities count 0.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Unsupported`] if the move means nothing on this cube size.
    pub fn move_count(self, size: usize, metric: Metric) -> Result<usize, CubeError> {
        if self.is_identity() || self.is_rotation() {
            return Ok(0);
        }

        let Move::Skewb(_) = self else {
            let decided = self.decide_meaning(size)?;
            let slice_factor = if decided.is_slice_move() { 2 } else { 1 };
            let direction_factor = match decided.axis() {
                Some((_, direction)) if direction.is_double() => 2,
                _ => 1,
            };

            return Ok(metric.count(slice_factor, direction_factor));
        };

        Ok(metric.count(1, 1))
    }

    /// Whether both moves have the same effect on a cube of this size, even if written
    /// differently.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if a move means nothing on this size or a slice index is out of
    /// range.
    pub fn equivalent(self, other: Move, size: usize) -> Result<bool, CubeError> {
        let this = self.decide_meaning(size)?;
        let other = other.decide_meaning(size)?;

        Ok(match (this, other) {
            (
                Move::FatMSlice {
                    axis_face,
                    direction,
                },
                slice,
            )
            | (
                slice,
                Move::FatMSlice {
                    axis_face,
                    direction,
                },
            ) if slice.as_slice().is_some() => {
                let Some((slice_face, slice_direction, slice_index)) = slice.as_slice() else {
                    return Ok(false);
                };

                size == 3
                    && slice_index == 1
                    && ((axis_face == slice_face && direction == slice_direction)
                        || (axis_face == slice_face.opposite()
                            && direction == slice_direction.inverse()))
            }
            (
                Move::FatMSlice {
                    axis_face: a,
                    direction: da,
                },
                Move::FatMSlice {
                    axis_face: b,
                    direction: db,
                },
            ) => (a == b && da == db) || (a == b.opposite() && da == db.inverse()),
            (Move::Rotation(a), Move::Rotation(b)) => a == b || a == b.alternative(),
            _ => match (this.as_slice(), other.as_slice()) {
                (Some(a), Some(b)) => simplified_slice(a, size)? == simplified_slice(b, size)?,
                _ => this == other,
            },
        })
    }

    /// Slice moves and inner M-slices as (axis face, direction, slice index).
    pub(crate) fn as_slice(self) -> Option<(Face, CubeDirection, usize)> {
        match self {
            Move::Slice {
                axis_face,
                direction,
                slice_index,
            }
            | Move::InnerMSlice {
                axis_face,
                direction,
                slice_index,
            } => Some((axis_face, direction, slice_index)),
            _ => None,
        }
    }

    /// Whether the two moves can be done in the other order without changing the result, which
    /// is the case if one of them is a rotation or they turn layers around the same axis.
    pub fn can_swap(self, other: Move) -> bool {
        if self.is_rotation() || other.is_rotation() {
            return true;
        }

        match (self.cube_axis_face(), other.cube_axis_face()) {
            (Some(a), Some(b)) => a.same_axis(b),
            _ => false,
        }
    }

    /// Returns moves `(c, d)` such that doing `c` then `d` equals doing `self` then `other`.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::CannotSwap`] if [`Move::can_swap`] is false.
    pub fn swap(self, other: Move) -> Result<(Move, Move), CubeError> {
        if !self.can_swap(other) {
            return Err(CubeError::CannotSwap(self, other));
        }

        Ok(match (self, other) {
            (Move::Rotation(rotation), _) => (other.rotate_by(rotation.inverse()), self),
            (_, Move::Rotation(rotation)) => (other, self.rotate_by(rotation)),
            _ => (other, self),
        })
    }

    /// The move that has the same effect after `rotation` as this one has before it. Moves around
    /// the rotation's axis stay the same.
    #[must_use]
    pub fn rotate_by(self, rotation: Rotation) -> Move {
        match self {
            Move::Skewb(skewb_move) => Move::Skewb(skewb_move.rotate_by(rotation)),
            _ => self.map_axis(|face, direction| (rotation.apply_to_face(face), direction)),
        }
    }

    /// The mirror image of this move in the plane orthogonal to the axis of `normal`.
    #[must_use]
    pub fn mirror(self, normal: Face) -> Move {
        match self {
            Move::Skewb(skewb_move) => Move::Skewb(skewb_move.mirror(normal)),
            _ => self.map_axis(|face, direction| {
                if face.same_axis(normal) {
                    (face.opposite(), direction.inverse())
                } else {
                    (face, direction.inverse())
                }
            }),
        }
    }
}

/// Moves a slice index past the middle to the opposite face so that equal layers compare equal.
pub(crate) fn simplified_slice(
    (axis_face, direction, slice_index): (Face, CubeDirection, usize),
    size: usize,
) -> Result<(Face, CubeDirection, usize), CubeError> {
    check_slice_index(slice_index, size)?;

    Ok(if slice_index >= size.div_ceil(2) {
        (axis_face.opposite(), direction.inverse(), size - 1 - slice_index)
    } else {
        (axis_face, direction, slice_index)
    })
}

/// The index of the slice as counted from `to`, which must be on the same axis.
pub(crate) fn translated_slice_index(
    (axis_face, _, slice_index): (Face, CubeDirection, usize),
    to: Face,
    size: usize,
) -> Result<usize, CubeError> {
    check_slice_index(slice_index, size)?;

    Ok(if axis_face == to {
        slice_index
    } else {
        size - 1 - slice_index
    })
}

pub(crate) fn check_slice_index(slice_index: usize, size: usize) -> Result<(), CubeError> {
    if slice_index == 0 || slice_index + 1 >= size {
        return Err(CubeError::InvalidSliceIndex {
            index: slice_index,
            size,
        });
    }

    Ok(())
}

/// The direction of a turn around `axis_face` as seen from `to`, which must be on the same axis.
pub(crate) fn translated_direction(axis_face: Face, direction: CubeDirection, to: Face) -> CubeDirection {
    if axis_face == to {
        direction
    } else {
        direction.inverse()
    }
}

fn fmt_m_slice(f: &mut fmt::Formatter<'_>, axis_face: Face, direction: CubeDirection) -> fmt::Result {
    let (name, direction) = SLICE_NAMES
        .iter()
        .find_map(|&(face, name)| {
            if face == axis_face {
                Some((name, direction))
            } else if face == axis_face.opposite() {
                Some((name, direction.inverse()))
            } else {
                None
            }
        })
        .unwrap_or_else(|| unreachable!("every axis has a slice name"));

    write!(f, "{name}{}", direction.name())
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Rotation(rotation) => write!(f, "{rotation}"),
            Move::Fat {
                axis_face,
                direction,
                width,
            } => {
                if width > 2 {
                    write!(f, "{width}")?;
                }
                write!(f, "{axis_face}")?;
                if width > 1 {
                    f.write_str("w")?;
                }
                f.write_str(direction.name())
            }
            Move::Slice {
                axis_face,
                direction,
                slice_index,
            } => write!(
                f,
                "{slice_index}{}{}",
                axis_face.name().to_ascii_lowercase(),
                direction.name()
            ),
            Move::FatMSlice {
                axis_face,
                direction,
            }
            | Move::InnerMSlice {
                axis_face,
                direction,
                ..
            }
            | Move::MaybeMSlice {
                axis_face,
                direction,
            } => fmt_m_slice(f, axis_face, direction),
            Move::MaybeFatMaybeSlice {
                axis_face,
                direction,
            } => write!(
                f,
                "{}{}",
                axis_face.name().to_ascii_lowercase(),
                direction.name()
            ),
            Move::Skewb(skewb_move) => {
                write!(f, "{}{}", skewb_move.axis_corner, skewb_move.direction.name())
            }
        }
    }
}

impl FromStr for Move {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_move(s)
    }
}
