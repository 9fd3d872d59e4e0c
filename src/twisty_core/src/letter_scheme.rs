use std::{fmt, str::FromStr};

use itertools::Itertools;
use log::trace;

use crate::{ALPHABET_SIZE, CubeError, Part, PartKind};

/// Names every piece of a kind with one letter, as used for memorizing blindfolded solves.
///
/// The letter of a piece is the letter at its catalogue index, so the same alphabet names the
/// pieces of every kind. Letters are matched ignoring case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LetterScheme {
    name: &'static str,
    alphabet: &'static [char],
    shoot_letters: &'static [char],
    buffers: &'static [(PartKind, &'static str)],
}

const A_TO_X: [char; ALPHABET_SIZE] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x',
];

impl LetterScheme {
    pub const BERNHARD: LetterScheme = LetterScheme {
        name: "bernhard",
        alphabet: &A_TO_X,
        shoot_letters: &['a', 'b', 'd', 'l', 'h', 't', 'p'],
        buffers: &[
            (PartKind::Corner, "ULB"),
            (PartKind::Edge, "UF"),
            (PartKind::Wing, "FU"),
            (PartKind::XCenter, "URF"),
            (PartKind::TCenter, "UF"),
        ],
    };

    pub const ALL: [LetterScheme; 1] = [LetterScheme::BERNHARD];

    /// A scheme with a custom alphabet.
    ///
    /// # Errors
    ///
    /// Fails if a letter is not lowercase, a letter is used twice, the alphabet has more letters
    /// than a kind can have pieces, or a buffer doesn't name a piece.
    pub fn new(
        name: &'static str,
        alphabet: &'static [char],
        shoot_letters: &'static [char],
        buffers: &'static [(PartKind, &'static str)],
    ) -> Result<LetterScheme, CubeError> {
        if let Some(&letter) = alphabet.iter().find(|&&letter| canonical(letter) != letter) {
            return Err(CubeError::UncanonicalLetter(letter));
        }

        if let Some(&letter) = alphabet.iter().duplicates().next() {
            return Err(CubeError::RepeatedLetter(letter));
        }

        if alphabet.len() > ALPHABET_SIZE {
            return Err(CubeError::Unsupported(format!(
                "an alphabet of {} letters",
                alphabet.len()
            )));
        }

        let scheme = LetterScheme {
            name,
            alphabet,
            shoot_letters,
            buffers,
        };

        if let Some(&letter) = shoot_letters.iter().find(|&&letter| !scheme.is_valid_letter(letter)) {
            return Err(CubeError::UnknownLetter(letter));
        }

        for &(kind, buffer) in buffers {
            Part::parse(kind, buffer)?;
        }

        Ok(scheme)
    }

    pub fn name(self) -> &'static str {
        self.name
    }

    pub fn alphabet(self) -> &'static [char] {
        self.alphabet
    }

    /// The letter of a piece, if the alphabet reaches its index.
    pub fn letter(self, part: Part) -> Option<char> {
        self.alphabet.get(part.index()).copied()
    }

    /// The piece of `kind` named by `letter`.
    pub fn for_letter(self, kind: PartKind, letter: char) -> Option<Part> {
        let letter = canonical(letter);
        Part::all(kind).find(|&part| self.letter(part) == Some(letter))
    }

    pub fn is_valid_letter(self, letter: char) -> bool {
        self.alphabet.contains(&canonical(letter))
    }

    /// Reads a piece from a single letter of this scheme, or from its face symbols otherwise. A
    /// single letter is read as a letter first, so `d` is never the face D.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if the text is neither a letter of a piece nor a piece descriptor.
    pub fn parse_part(self, kind: PartKind, text: &str) -> Result<Part, CubeError> {
        let lettered = text
            .parse::<char>()
            .ok()
            .filter(|&letter| self.is_valid_letter(letter))
            .and_then(|letter| self.for_letter(kind, letter));

        match lettered {
            Some(part) => {
                trace!("Read {text} as the letter of {part}");
                Ok(part)
            }
            None => Part::parse(kind, text),
        }
    }

    /// Same as [`LetterScheme::parse_part`]; buffers are written like any other piece.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if the text is neither a letter of a piece nor a piece descriptor.
    pub fn parse_buffer(self, kind: PartKind, text: &str) -> Result<Part, CubeError> {
        self.parse_part(kind, text)
    }

    /// The letters that pieces are shot to by default.
    pub fn shoot_letters(self) -> &'static [char] {
        self.shoot_letters
    }

    /// The piece that other pieces of `kind` are cycled through by default.
    pub fn default_buffer(self, kind: PartKind) -> Option<Part> {
        self.buffers
            .iter()
            .find(|(buffer_kind, _)| *buffer_kind == kind)
            .and_then(|&(kind, buffer)| Part::parse(kind, buffer).ok())
    }
}

fn canonical(letter: char) -> char {
    letter.to_ascii_lowercase()
}

impl fmt::Display for LetterScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for LetterScheme {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LetterScheme::ALL
            .into_iter()
            .find(|scheme| scheme.name.eq_ignore_ascii_case(s))
            .ok_or_else(|| CubeError::Unsupported(format!("the letter scheme `{s}`")))
    }
}
