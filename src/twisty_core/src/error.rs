use thiserror::Error;

use crate::{Coordinate, Face, Move, Part, PartKind, Span};

/// Domain errors of the engine. Every variant names the value that was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CubeError {
    #[error("`{0}` is not a face symbol")]
    UnknownFace(char),
    #[error("{faces} is not a valid {kind}")]
    InvalidPart { kind: PartKind, faces: String },
    #[error("unsupported cube size {0}")]
    InvalidCubeSize(usize),
    #[error("a {kind} has no incarnation {incarnation} on a {size}x{size} cube")]
    InvalidIncarnation {
        kind: PartKind,
        size: usize,
        incarnation: usize,
    },
    #[error("coordinate value {value} is out of range for cube size {size}")]
    CoordinateOutOfRange { value: i64, size: usize },
    #[error("faces {0} and {1} lie on the same axis")]
    SameAxis(Face, Face),
    #[error("{from} does not touch face {to}")]
    InvalidJump { from: Coordinate, to: Face },
    #[error("a coordinate of a {coordinate}x{coordinate} cube was used on a {state}x{state} cube")]
    SizeMismatch { coordinate: usize, state: usize },
    #[error("a cycle needs at least 2 parts, got {0}")]
    TooFewParts(usize),
    #[error("cannot cycle a {0} together with a {1}")]
    MixedPartKinds(PartKind, PartKind),
    #[error("cannot cycle {0} together with its rotation {1}")]
    RepeatedPart(Part, Part),
    #[error("sticker {0} appears twice in the sticker cycles")]
    RepeatedSticker(String),
    #[error("no rotation of {base} is adjacent to the faces of {part}")]
    NoSolvedPosition { part: Part, base: Coordinate },
    #[error("a fat move must be at least 1 layer wide")]
    ZeroWidth,
    #[error("slice index 0 is an outer layer, not a slice")]
    OuterSlice,
    #[error("invalid width {width} for a fat move on a {size}x{size} cube")]
    InvalidWidth { width: usize, size: usize },
    #[error("invalid slice index {index} for a {size}x{size} cube")]
    InvalidSliceIndex { index: usize, size: usize },
    #[error("move {mv} cannot be applied to a {puzzle}")]
    WrongPuzzle { mv: Move, puzzle: &'static str },
    #[error("moves {0} and {1} cannot be swapped")]
    CannotSwap(Move, Move),
    #[error("turns around {0} cannot be written in {1} notation")]
    UncoveredCorner(Part, &'static str),
    #[error("letter `{0}` is not lowercase")]
    UncanonicalLetter(char),
    #[error("letter `{0}` appears twice in the alphabet")]
    RepeatedLetter(char),
    #[error("`{0}` is not a letter of the alphabet")]
    UnknownLetter(char),
    #[error("{0} is not supported")]
    Unsupported(String),
}

/// A notation string that could not be parsed. Displays the offending input with a caret under the
/// position where parsing stopped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}:\n{span}")]
pub struct ParseError {
    message: String,
    span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> ParseError {
        ParseError {
            message: message.into(),
            span,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Byte offset into the input at which parsing failed.
    pub fn offset(&self) -> usize {
        self.span.start()
    }
}
