use std::{fmt, sync::LazyLock};

use itertools::Itertools;
use log::debug;

use crate::{
    CubeError, Face,
    face::valid_chirality,
};

/// The number of letters available to name the pieces of one kind.
pub const ALPHABET_SIZE: usize = 24;

/// The kinds of pieces that can sit on an N×N cube. X- and T-centers are named after the corner
/// and the edge they lie next to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartKind {
    Face,
    Edge,
    Midge,
    Wing,
    Corner,
    XCenter,
    TCenter,
}

impl PartKind {
    pub const ALL: [Self; 7] = {
        use PartKind::*;
        let v = [Face, Edge, Midge, Wing, Corner, XCenter, TCenter];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// Number of face symbols naming a piece of this kind.
    pub const fn arity(self) -> usize {
        match self {
            PartKind::Face => 1,
            PartKind::Edge | PartKind::Midge | PartKind::Wing | PartKind::TCenter => 2,
            PartKind::Corner | PartKind::XCenter => 3,
        }
    }

    /// Number of stickers a piece of this kind carries.
    pub const fn sticker_count(self) -> usize {
        match self {
            PartKind::Face | PartKind::XCenter | PartKind::TCenter => 1,
            PartKind::Edge | PartKind::Midge | PartKind::Wing => 2,
            PartKind::Corner => 3,
        }
    }

    /// Whether turning the piece in place gives another member of the catalogue.
    pub const fn has_rotations(self) -> bool {
        matches!(self, PartKind::Edge | PartKind::Midge | PartKind::Corner)
    }

    /// The kind whose pieces name the neighborhood of a piece of this kind.
    pub const fn corresponding_kind(self) -> PartKind {
        match self {
            PartKind::Wing | PartKind::XCenter => PartKind::Corner,
            PartKind::TCenter => PartKind::Edge,
            other => other,
        }
    }

    /// How many physically distinct copies of this kind exist on a cube of `size`.
    pub const fn num_incarnations(self, size: usize) -> usize {
        let ring_count = (size / 2).saturating_sub(1);

        match self {
            PartKind::Face => size % 2,
            PartKind::Edge => (size == 3) as usize,
            PartKind::Midge => (size >= 5 && size % 2 == 1) as usize,
            PartKind::Wing | PartKind::XCenter => ring_count,
            PartKind::Corner => (size >= 2) as usize,
            PartKind::TCenter => {
                if size % 2 == 0 {
                    0
                } else {
                    ring_count
                }
            }
        }
    }

    /// Checks that a piece of this kind exists as `incarnation` on a cube of `size`.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidIncarnation`] otherwise.
    pub fn check_incarnation(self, size: usize, incarnation: usize) -> Result<(), CubeError> {
        if incarnation >= self.num_incarnations(size) {
            return Err(CubeError::InvalidIncarnation {
                kind: self,
                size,
                incarnation,
            });
        }

        Ok(())
    }

    fn is_valid(self, faces: &[Face]) -> bool {
        let edge_like = faces
            .iter()
            .tuple_combinations()
            .all(|(a, b)| !a.same_axis(*b));

        match faces {
            [_] => true,
            [_, _] => edge_like,
            [a, b, c] => edge_like && valid_chirality(&[*a, *b, *c]),
            _ => false,
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PartKind::Face => "face",
            PartKind::Edge => "edge",
            PartKind::Midge => "midge",
            PartKind::Wing => "wing",
            PartKind::Corner => "corner",
            PartKind::XCenter => "x-center",
            PartKind::TCenter => "t-center",
        })
    }
}

/// Enumerates the face symbol tuples of a kind in the order that defines piece indices.
pub fn generate(kind: PartKind) -> Vec<Vec<Face>> {
    Face::ALL
        .into_iter()
        .permutations(kind.arity())
        .filter(|faces| kind.is_valid(faces))
        .collect()
}

static CATALOGUES: LazyLock<Vec<Vec<Vec<Face>>>> = LazyLock::new(|| {
    PartKind::ALL
        .into_iter()
        .map(|kind| {
            let faces = generate(kind);
            assert!(
                faces.len() <= ALPHABET_SIZE,
                "the {kind} catalogue has {} elements",
                faces.len()
            );
            debug!("Built the {kind} catalogue with {} elements", faces.len());
            faces
        })
        .collect()
});

fn catalogue(kind: PartKind) -> &'static [Vec<Face>] {
    &CATALOGUES[kind as usize]
}

/// A piece (or the position of a piece) of some kind, identified by its index in the kind's
/// catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Part {
    kind: PartKind,
    index: u8,
}

impl Part {
    /// All pieces of a kind in index order.
    pub fn all(kind: PartKind) -> impl Iterator<Item = Part> {
        (0..catalogue(kind).len()).map(move |index| Part::from_index_unchecked(kind, index))
    }

    /// # Errors
    ///
    /// Returns [`CubeError::InvalidPart`] if the kind has no piece with this index.
    pub fn from_index(kind: PartKind, index: usize) -> Result<Part, CubeError> {
        if index >= catalogue(kind).len() {
            return Err(CubeError::InvalidPart {
                kind,
                faces: format!("#{index}"),
            });
        }

        Ok(Part::from_index_unchecked(kind, index))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_index_unchecked(kind: PartKind, index: usize) -> Part {
        Part {
            kind,
            index: index as u8,
        }
    }

    /// Looks a piece up by its exact face symbols.
    ///
    /// Wings additionally accept three faces: the two faces of the wing followed by the face of
    /// the corner it is closest to.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidPart`] if the faces don't name a piece of this kind.
    pub fn for_faces(kind: PartKind, faces: &[Face]) -> Result<Part, CubeError> {
        if let (PartKind::Wing, &[a, b, c]) = (kind, faces) {
            return Part::wing_next_to(a, b, c);
        }

        catalogue(kind)
            .iter()
            .position(|candidate| candidate == faces)
            .map(|index| Part::from_index_unchecked(kind, index))
            .ok_or_else(|| CubeError::InvalidPart {
                kind,
                faces: faces.iter().join(""),
            })
    }

    /// The corner between three faces of different axes, whatever order they are given in.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidPart`] if two faces share an axis.
    pub fn corner_between(faces: [Face; 3]) -> Result<Part, CubeError> {
        let [a, b, c] = faces;
        if valid_chirality(&faces) {
            Part::for_faces(PartKind::Corner, &[a, b, c])
        } else {
            Part::for_faces(PartKind::Corner, &[a, c, b])
        }
    }

    // The sticker of wing `ab` lies on `a` next to `b`; its mirror image is the wing `ba`. Which
    // one is meant follows from the chirality of the corner `abc`.
    fn wing_next_to(a: Face, b: Face, c: Face) -> Result<Part, CubeError> {
        let invalid = || CubeError::InvalidPart {
            kind: PartKind::Wing,
            faces: format!("{a}{b}{}", c.name().to_ascii_lowercase()),
        };

        if !PartKind::Corner.is_valid(&[a, b, c]) && !PartKind::Corner.is_valid(&[a, c, b]) {
            return Err(invalid());
        }

        let faces = if valid_chirality(&[a, b, c]) {
            [a, b]
        } else {
            [b, a]
        };

        Part::for_faces(PartKind::Wing, &faces).map_err(|_| invalid())
    }

    /// Parses a piece descriptor such as `UFR`, ignoring case. Wings also accept the three letter
    /// form like `UBl`.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if a letter is not a face or the faces don't name a piece.
    pub fn parse(kind: PartKind, descriptor: &str) -> Result<Part, CubeError> {
        let faces = descriptor
            .chars()
            .map(Face::from_char)
            .collect::<Result<Vec<_>, _>>()?;

        Part::for_faces(kind, &faces)
    }

    pub fn kind(self) -> PartKind {
        self.kind
    }

    pub fn index(self) -> usize {
        usize::from(self.index)
    }

    pub fn faces(self) -> &'static [Face] {
        &catalogue(self.kind)[self.index()]
    }

    /// The face the piece's first sticker lies on.
    pub fn primary_face(self) -> Face {
        self.faces()[0]
    }

    /// The piece whose faces describe where this one sits: the corner next to a wing or an
    /// X-center, the edge next to a T-center, and the piece itself otherwise.
    pub fn corresponding_part(self) -> Part {
        match self.kind {
            PartKind::Wing => {
                let [a, b] = [self.faces()[0], self.faces()[1]];
                Part::all(PartKind::Corner)
                    .find(|corner| corner.faces().starts_with(&[a, b]))
                    .unwrap_or_else(|| unreachable!("every wing touches a corner"))
            }
            PartKind::XCenter | PartKind::TCenter => {
                Part::from_index_unchecked(self.kind.corresponding_kind(), self.index())
            }
            _ => self,
        }
    }

    /// Cyclically shifts the face symbols left by `n`. Pieces without rotations stay the same.
    #[must_use]
    pub fn rotate_by(self, n: usize) -> Part {
        if !self.kind.has_rotations() {
            return self;
        }

        let mut faces = self.faces().to_vec();
        let len = faces.len();
        faces.rotate_left(n % len);

        Part::for_faces(self.kind, &faces)
            .unwrap_or_else(|_| unreachable!("rotations of valid pieces are valid"))
    }

    /// All distinct rotations, starting with the piece itself.
    pub fn rotations(self) -> Vec<Part> {
        (0..self.kind.arity())
            .map(|n| self.rotate_by(n))
            .unique()
            .collect()
    }

    pub fn turned_equals(self, other: Part) -> bool {
        self.kind == other.kind && self.rotations().contains(&other)
    }

    /// Reverses the face symbols.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Unsupported`] for corners and X-centers, which would change
    /// chirality.
    pub fn inverse(self) -> Result<Part, CubeError> {
        match self.kind {
            PartKind::Corner | PartKind::XCenter => Err(CubeError::Unsupported(format!(
                "inverting the {} {self}",
                self.kind
            ))),
            _ => {
                let faces = self.faces().iter().rev().copied().collect_vec();
                Part::for_faces(self.kind, &faces)
            }
        }
    }

    /// The same piece turned so that `face` comes first.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidPart`] if no rotation starts with `face`.
    pub fn rotate_face_up(self, face: Face) -> Result<Part, CubeError> {
        self.rotations()
            .into_iter()
            .find(|part| part.primary_face() == face)
            .ok_or_else(|| CubeError::InvalidPart {
                kind: self.kind,
                faces: format!("{self} turned to {face}"),
            })
    }

    /// Whether a piece's sticker lies on `face`.
    pub fn touches(self, face: Face) -> bool {
        self.corresponding_part().faces().contains(&face)
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let own_faces = self.faces().len();
        for (i, face) in self.corresponding_part().faces().iter().enumerate() {
            if i < own_faces {
                write!(f, "{}", face.name())?;
            } else {
                write!(f, "{}", face.name().to_ascii_lowercase())?;
            }
        }

        Ok(())
    }
}

/// At least two pieces of the same kind, no two of them the same piece turned differently. The
/// first piece moves to the place of the second and so on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartCycle {
    parts: Vec<Part>,
}

impl PartCycle {
    /// # Errors
    ///
    /// Fails on fewer than two parts, mixed kinds, or a piece repeated in any rotation.
    pub fn new(parts: Vec<Part>) -> Result<PartCycle, CubeError> {
        if parts.len() < 2 {
            return Err(CubeError::TooFewParts(parts.len()));
        }

        let kind = parts[0].kind();
        if let Some(other) = parts.iter().find(|part| part.kind() != kind) {
            return Err(CubeError::MixedPartKinds(kind, other.kind()));
        }

        for (a, b) in parts.iter().tuple_combinations() {
            if a.turned_equals(*b) {
                return Err(CubeError::RepeatedPart(*a, *b));
            }
        }

        Ok(PartCycle { parts })
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn kind(&self) -> PartKind {
        self.parts[0].kind()
    }

    /// The cycle moving the pieces the other way round.
    #[must_use]
    pub fn inverse(&self) -> PartCycle {
        PartCycle {
            parts: self.parts.iter().rev().copied().collect(),
        }
    }

    /// Turns every piece of the cycle by `n`.
    #[must_use]
    pub fn rotate_by(&self, n: usize) -> PartCycle {
        PartCycle {
            parts: self.parts.iter().map(|part| part.rotate_by(n)).collect(),
        }
    }
}

impl fmt::Display for PartCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wing(descriptor: &str) -> Part {
        Part::parse(PartKind::Wing, descriptor).unwrap()
    }

    #[test_log::test]
    fn catalogue_sizes() {
        let sizes = PartKind::ALL.map(|kind| Part::all(kind).count());
        assert_eq!(sizes, [6, 24, 24, 24, 24, 24, 24]);
    }

    #[test_log::test]
    fn first_pieces() {
        use Face::*;

        assert_eq!(Part::from_index(PartKind::Edge, 0).unwrap().faces(), &[U, F]);
        assert_eq!(Part::from_index(PartKind::Corner, 0).unwrap().faces(), &[U, F, L]);
        assert_eq!(Part::from_index(PartKind::Corner, 1).unwrap().faces(), &[U, R, F]);
        assert!(Part::from_index(PartKind::Edge, 24).is_err());
    }

    #[test_log::test]
    fn rejects_invalid_pieces() {
        assert!(Part::parse(PartKind::Edge, "UD").is_err());
        assert!(Part::parse(PartKind::Corner, "UFR").is_err());
        assert!(Part::parse(PartKind::Corner, "UFX").is_err());
        assert!(Part::parse(PartKind::Corner, "urf").is_ok());
    }

    #[test_log::test]
    fn corner_between_fixes_chirality() {
        use Face::*;

        let corner = Part::corner_between([U, F, R]).unwrap();
        assert_eq!(corner.faces(), &[U, R, F]);
        assert!(Part::corner_between([U, D, R]).is_err());
    }

    #[test_log::test]
    fn rotations() {
        let corner = Part::parse(PartKind::Corner, "URF").unwrap();
        assert_eq!(corner.rotate_by(1), Part::parse(PartKind::Corner, "RFU").unwrap());
        assert_eq!(corner.rotate_by(3), corner);
        assert_eq!(corner.rotations().len(), 3);
        assert!(corner.turned_equals(Part::parse(PartKind::Corner, "FUR").unwrap()));

        let edge = Part::parse(PartKind::Edge, "UF").unwrap();
        assert_eq!(edge.rotate_by(1), Part::parse(PartKind::Edge, "FU").unwrap());

        assert_eq!(wing("UFl").rotate_by(1), wing("UFl"));
        assert_eq!(wing("UFl").rotations().len(), 1);
    }

    #[test_log::test]
    fn inverse_is_an_involution() {
        for kind in [PartKind::Face, PartKind::Edge, PartKind::Wing, PartKind::TCenter] {
            for part in Part::all(kind) {
                assert_eq!(part.inverse().unwrap().inverse().unwrap(), part);
            }
        }

        let corner = Part::parse(PartKind::Corner, "URF").unwrap();
        assert!(matches!(corner.inverse(), Err(CubeError::Unsupported(_))));
    }

    #[test_log::test]
    fn wings_from_three_faces() {
        use Face::*;

        assert_eq!(wing("UBl").faces(), &[B, U]);
        assert_eq!(wing("UBr").faces(), &[U, B]);
        assert_eq!(wing("UFl").faces(), &[U, F]);
        assert_eq!(wing("UFr").faces(), &[F, U]);
        assert_eq!(wing("DBL").faces(), &[D, B]);
        assert_eq!(wing("URb").faces(), &[R, U]);
        assert_eq!(wing("FRu").faces(), &[R, F]);
        assert_eq!(wing("FRd").faces(), &[F, R]);
        assert!(Part::parse(PartKind::Wing, "UDl").is_err());
    }

    #[test_log::test]
    fn display_round_trips() {
        for kind in PartKind::ALL {
            for part in Part::all(kind) {
                assert_eq!(Part::parse(kind, &part.to_string()).unwrap(), part);
            }
        }

        assert_eq!(wing("UFl").to_string(), "UFl");
        assert_eq!(wing("UBl").to_string(), "BUl");
    }

    #[test_log::test]
    fn incarnations() {
        let counts = |kind: PartKind| (2..=7).map(|n| kind.num_incarnations(n)).collect_vec();

        assert_eq!(counts(PartKind::Edge), [0, 1, 0, 0, 0, 0]);
        assert_eq!(counts(PartKind::Midge), [0, 0, 0, 1, 0, 1]);
        assert_eq!(counts(PartKind::Wing), [0, 0, 1, 1, 2, 2]);
        assert_eq!(counts(PartKind::Corner), [1, 1, 1, 1, 1, 1]);
        assert_eq!(counts(PartKind::XCenter), [0, 0, 1, 1, 2, 2]);
        assert_eq!(counts(PartKind::TCenter), [0, 0, 0, 1, 0, 2]);
        assert_eq!(counts(PartKind::Face), [0, 1, 0, 1, 0, 1]);
    }

    #[test_log::test]
    fn part_cycles() {
        let corners = |names: &[&str]| {
            names
                .iter()
                .map(|name| Part::parse(PartKind::Corner, name).unwrap())
                .collect_vec()
        };

        assert!(PartCycle::new(corners(&["UFL", "URF", "UBR"])).is_ok());
        assert_eq!(
            PartCycle::new(corners(&["UFL"])),
            Err(CubeError::TooFewParts(1))
        );
        assert!(matches!(
            PartCycle::new(corners(&["URF", "FUR"])),
            Err(CubeError::RepeatedPart(..))
        ));

        let edge = Part::parse(PartKind::Edge, "UF").unwrap();
        assert!(matches!(
            PartCycle::new(vec![corners(&["URF"])[0], edge]),
            Err(CubeError::MixedPartKinds(PartKind::Corner, PartKind::Edge))
        ));

        let cycle = PartCycle::new(corners(&["UFL", "URF", "UBR"])).unwrap();
        assert_eq!(cycle.inverse().inverse(), cycle);
        assert_eq!(cycle.to_string(), "UFL URF UBR");
    }
}
