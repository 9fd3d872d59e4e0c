use internment::ArcIntern;
use itertools::Itertools;
use pest::{
    Parser,
    error::{Error, ErrorVariant, InputLocation},
    iterators::Pair,
};
use pest_derive::Parser;

use crate::{
    Algorithm, Commutator, CubeDirection, CubeError, Face, Move, ParseError, Part, SkewbDirection,
    SkewbMove, Span,
};

#[derive(Parser)]
#[grammar = "./notation.pest"]
struct NotationParser;

/// The most moves a repeated trigger may expand to.
const MAX_TRIGGER_MOVES: usize = 1 << 16;

/// Parses a single cube move such as `R`, `3Fw'`, `2r`, `M2` or `y'`.
///
/// # Errors
///
/// Returns a [`ParseError`] pointing at the first character that doesn't fit.
pub fn parse_move(source: &str) -> Result<Move, ParseError> {
    let pair = parse_rule(Rule::move_only, source)?
        .into_inner()
        .next()
        .unwrap();

    build_move(pair)
}

/// Parses space separated moves with `(...)` triggers that may be repeated with `*N` or `N`.
///
/// # Errors
///
/// Returns a [`ParseError`] pointing at the first character that doesn't fit.
pub fn parse_algorithm(source: &str) -> Result<Algorithm, ParseError> {
    let pair = parse_rule(Rule::algorithm, source)?
        .into_inner()
        .next()
        .unwrap();

    build_moves(pair)
}

/// Parses `[A, B]`, `[S : C]` (or `[S ; C]`), `[A / B]` or a bare algorithm. The inner part of a
/// setup may itself be any of these.
///
/// # Errors
///
/// Returns a [`ParseError`] pointing at the first character that doesn't fit.
pub fn parse_commutator(source: &str) -> Result<Commutator, ParseError> {
    let pair = parse_rule(Rule::commutator_only, source)?
        .into_inner()
        .next()
        .unwrap();

    build_commutator(pair)
}

/// Parses Skewb moves, looking the letters up with `corner_for`, mixed with rotations.
pub(crate) fn parse_skewb_algorithm(
    source: &str,
    corner_for: impl Fn(char) -> Option<Part>,
) -> Result<Algorithm, ParseError> {
    let pair = parse_rule(Rule::skewb_algorithm, source)?
        .into_inner()
        .next()
        .unwrap();

    pair.into_inner()
        .map(|pair| match pair.as_rule() {
            Rule::skewb_move => build_skewb_move(pair, &corner_for),
            _ => build_move(pair),
        })
        .collect()
}

fn parse_rule(rule: Rule, source: &str) -> Result<Pair<'_, Rule>, ParseError> {
    let mut pairs = NotationParser::parse(rule, source).map_err(|err| grammar_error(source, &err))?;
    Ok(pairs.next().unwrap())
}

fn grammar_error(source: &str, err: &Error<Rule>) -> ParseError {
    let offset = match err.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };

    let message = match &err.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            format!("expected {}", positives.iter().map(describe).unique().join(" or "))
        }
        ErrorVariant::ParsingError { .. } => "unexpected input".to_owned(),
        ErrorVariant::CustomError { message } => message.clone(),
    };

    ParseError::new(message, Span::at(ArcIntern::from(source), offset))
}

fn describe(rule: &Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::fat_move
        | Rule::slice_move
        | Rule::outer_move
        | Rule::maybe_slice_move
        | Rule::m_slice_move
        | Rule::rotation
        | Rule::skewb_move => "a move",
        Rule::trigger => "a trigger",
        Rule::multiplier | Rule::count => "a number",
        Rule::direction | Rule::skewb_direction => "a direction",
        Rule::face | Rule::face_lower | Rule::axis | Rule::m_slice | Rule::skewb_letter => {
            "a move letter"
        }
        Rule::pure_tail => "`,`",
        Rule::setup_tail => "`:`",
        Rule::slash_tail => "`/`",
        Rule::commutator | Rule::commutator_only => "a commutator",
        _ => "something else",
    }
}

fn error_at(pair: &Pair<'_, Rule>, message: impl Into<String>) -> ParseError {
    ParseError::new(message, Span::from_span(pair.as_span()))
}

fn parse_count(pair: &Pair<'_, Rule>) -> Result<usize, ParseError> {
    pair.as_str()
        .parse()
        .map_err(|_| error_at(pair, format!("{} is too large", pair.as_str())))
}

fn cube_direction(name: &str) -> CubeDirection {
    match name {
        "2" | "2'" => CubeDirection::DOUBLE,
        "'" | "3" => CubeDirection::BACKWARD,
        _ => CubeDirection::FORWARD,
    }
}

fn letter(pair: &Pair<'_, Rule>) -> char {
    pair.as_str()
        .chars()
        .next()
        .unwrap_or_else(|| unreachable!("letters are one character long"))
}

fn face_for(pair: &Pair<'_, Rule>) -> Face {
    let face = match letter(pair) {
        'x' => Ok(Face::R),
        'y' => Ok(Face::U),
        'z' | 'S' => Ok(Face::F),
        'M' => Ok(Face::L),
        'E' => Ok(Face::D),
        c => Face::from_char(c),
    };

    face.unwrap_or_else(|_| unreachable!("the grammar only accepts move letters"))
}

fn build_move(pair: Pair<'_, Rule>) -> Result<Move, ParseError> {
    let rule = pair.as_rule();
    let mut count = None;
    let mut face = None;
    let mut direction = CubeDirection::FORWARD;

    for inner in pair.clone().into_inner() {
        match inner.as_rule() {
            Rule::count => count = Some(parse_count(&inner)?),
            Rule::direction => direction = cube_direction(inner.as_str()),
            _ => face = Some(face_for(&inner)),
        }
    }

    let face = face.unwrap_or_else(|| unreachable!("every move names its axis"));
    let invalid = |err: CubeError| error_at(&pair, err.to_string());

    match rule {
        Rule::rotation => Ok(Move::rotation(face, direction)),
        Rule::fat_move => Move::fat(face, direction, count.unwrap_or(2)).map_err(invalid),
        Rule::slice_move => Move::slice(face, direction, count.unwrap_or(1)).map_err(invalid),
        Rule::outer_move => Ok(Move::outer(face, direction)),
        Rule::maybe_slice_move => Ok(Move::MaybeFatMaybeSlice {
            axis_face: face,
            direction,
        }),
        Rule::m_slice_move => Ok(Move::MaybeMSlice {
            axis_face: face,
            direction,
        }),
        _ => unreachable!("not a move: {rule:?}"),
    }
}

fn build_skewb_move(
    pair: Pair<'_, Rule>,
    corner_for: &impl Fn(char) -> Option<Part>,
) -> Result<Move, ParseError> {
    let mut inner = pair.clone().into_inner();
    let letter_pair = inner.next().unwrap();
    let name = letter(&letter_pair);

    let direction = match inner.next().map(|pair| pair.as_str()) {
        Some("2" | "'") => SkewbDirection::BACKWARD,
        _ => SkewbDirection::FORWARD,
    };

    let corner = corner_for(name)
        .ok_or_else(|| error_at(&letter_pair, format!("`{name}` is not a move of this notation")))?;

    SkewbMove::new(corner, direction)
        .map(Move::Skewb)
        .map_err(|err| error_at(&pair, err.to_string()))
}

fn build_moves(pair: Pair<'_, Rule>) -> Result<Algorithm, ParseError> {
    let mut moves = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::trigger => moves.extend(build_trigger(inner)?.into_moves()),
            _ => moves.push(build_move(inner)?),
        }
    }

    Ok(Algorithm::new(moves))
}

fn build_trigger(pair: Pair<'_, Rule>) -> Result<Algorithm, ParseError> {
    let mut inner = pair.into_inner();
    let moves = build_moves(inner.next().unwrap())?;

    let Some(multiplier) = inner.next() else {
        return Ok(moves);
    };

    let count_pair = multiplier.clone().into_inner().next().unwrap();
    let times = parse_count(&count_pair)?;
    if times == 0 {
        return Err(error_at(&multiplier, "a trigger must be repeated at least once"));
    }

    match moves.len().checked_mul(times) {
        Some(total) if total <= MAX_TRIGGER_MOVES => Ok(moves * times),
        _ => Err(error_at(
            &multiplier,
            format!("a trigger may expand to at most {MAX_TRIGGER_MOVES} moves"),
        )),
    }
}

fn build_commutator(pair: Pair<'_, Rule>) -> Result<Commutator, ParseError> {
    let mut inner = pair.into_inner();
    let first = build_moves(inner.next().unwrap())?;

    let Some(tail) = inner.next() else {
        return Ok(Commutator::Fake(first));
    };

    let rule = tail.as_rule();
    let rest = tail.into_inner().next().unwrap();

    Ok(match rule {
        Rule::pure_tail => Commutator::Pure {
            first,
            second: build_moves(rest)?,
        },
        Rule::setup_tail => Commutator::Setup {
            setup: first,
            inner: Box::new(build_commutator(rest)?),
        },
        Rule::slash_tail => Commutator::Slash {
            first,
            second: build_moves(rest)?,
        },
        _ => unreachable!("not a commutator tail: {rule:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn moves() {
        assert_eq!(parse_move("R"), Ok(Move::outer(Face::R, CubeDirection::FORWARD)));
        assert_eq!(parse_move(" U2' "), Ok(Move::outer(Face::U, CubeDirection::DOUBLE)));
        assert_eq!(parse_move("F3"), Ok(Move::outer(Face::F, CubeDirection::BACKWARD)));
        assert_eq!(parse_move("Rw").unwrap(), Move::fat(Face::R, CubeDirection::FORWARD, 2).unwrap());
        assert_eq!(parse_move("3Bw'").unwrap(), Move::fat(Face::B, CubeDirection::BACKWARD, 3).unwrap());
        assert_eq!(parse_move("2d2").unwrap(), Move::slice(Face::D, CubeDirection::DOUBLE, 2).unwrap());
        assert_eq!(
            parse_move("l"),
            Ok(Move::MaybeFatMaybeSlice {
                axis_face: Face::L,
                direction: CubeDirection::FORWARD
            })
        );
        assert_eq!(
            parse_move("E'"),
            Ok(Move::MaybeMSlice {
                axis_face: Face::D,
                direction: CubeDirection::BACKWARD
            })
        );
        assert_eq!(parse_move("z"), Ok(Move::rotation(Face::F, CubeDirection::FORWARD)));
        assert_eq!(parse_move("x'"), Ok(Move::rotation(Face::R, CubeDirection::BACKWARD)));
    }

    #[test_log::test]
    fn invalid_moves() {
        for s in ["", "R U", "Q", "2R", "Rw0", "x w"] {
            assert!(parse_move(s).is_err(), "{s}");
        }

        let err = parse_move("0Rw").unwrap_err();
        assert_eq!(err.offset(), 0);
        assert_eq!(err.message(), "a fat move must be at least 1 layer wide");
        let err = parse_move("0r").unwrap_err();
        assert_eq!(err.offset(), 0);
        assert_eq!(err.message(), "slice index 0 is an outer layer, not a slice");
    }

    #[test_log::test]
    fn algorithms() {
        assert_eq!(parse_algorithm("").unwrap(), Algorithm::EMPTY);
        assert_eq!(parse_algorithm("R U R' U'").unwrap().len(), 4);
        assert_eq!(parse_algorithm("RUR'").unwrap(), parse_algorithm("R U R'").unwrap());
        assert_eq!(
            parse_algorithm("(R U)*2 F").unwrap(),
            parse_algorithm("R U R U F").unwrap()
        );
        assert_eq!(
            parse_algorithm("(R U) 3 F").unwrap(),
            parse_algorithm("R U R U R U F").unwrap()
        );
        assert_eq!(
            parse_algorithm("(R (U F')2)").unwrap(),
            parse_algorithm("R U F' U F'").unwrap()
        );
        assert_eq!(
            parse_algorithm("(R U) 2r").unwrap(),
            parse_algorithm("R U 2r").unwrap()
        );
    }

    #[test_log::test]
    fn error_positions() {
        let err = parse_algorithm("R U ? F").unwrap_err();
        assert_eq!(err.offset(), 4);
        assert_eq!(AsRef::<str>::as_ref(&err.span().source()), "R U ? F");
        assert!(err.to_string().ends_with("  R U ? F\n      ^"), "{err}");

        let err = parse_algorithm("(R U)0").unwrap_err();
        assert_eq!(err.offset(), 5);
        assert_eq!(err.message(), "a trigger must be repeated at least once");

        let err = parse_algorithm("R (R U)*9999999999999999999").unwrap_err();
        assert_eq!(err.offset(), 7);
        assert_eq!(err.message(), "a trigger may expand to at most 65536 moves");
        assert!(parse_algorithm("((R U)*1000)*1000").is_err());
        assert_eq!(parse_algorithm("((R U)*100)*100").map(|a| a.len()), Ok(20000));

        assert_eq!(parse_algorithm("(R U").unwrap_err().offset(), 4);
        assert_eq!(parse_commutator("[R, U").unwrap_err().offset(), 5);
        assert_eq!(parse_commutator("[R U]").unwrap_err().offset(), 4);
        assert!(parse_commutator("[R, U] F").is_err());
    }

    #[test_log::test]
    fn commutators() {
        let r = parse_algorithm("R").unwrap();
        let u = parse_algorithm("U").unwrap();

        assert_eq!(
            parse_commutator("[R, U]"),
            Ok(Commutator::Pure {
                first: r.clone(),
                second: u.clone()
            })
        );
        assert_eq!(
            parse_commutator("[R / U]"),
            Ok(Commutator::Slash {
                first: r.clone(),
                second: u.clone()
            })
        );
        assert_eq!(
            parse_commutator("[U : [R : U]]"),
            Ok(Commutator::Setup {
                setup: u.clone(),
                inner: Box::new(Commutator::Setup {
                    setup: r,
                    inner: Box::new(Commutator::Fake(u)),
                })
            })
        );
        assert_eq!(parse_commutator("[U ; R]"), parse_commutator("[U : R]"));
    }

    #[test_log::test]
    fn skewb_algorithms() {
        let corner = Part::parse(crate::PartKind::Corner, "URF").unwrap();
        let corner_for = |c: char| (c == 'F').then_some(corner);

        let algorithm = parse_skewb_algorithm("F F' F2 F2' x", corner_for).unwrap();
        let forward = Move::Skewb(SkewbMove::new(corner, SkewbDirection::FORWARD).unwrap());
        assert_eq!(
            algorithm.moves(),
            [
                forward,
                forward.inverse(),
                forward.inverse(),
                forward,
                Move::rotation(Face::R, CubeDirection::FORWARD)
            ]
        );

        let err = parse_skewb_algorithm("F R", corner_for).unwrap_err();
        assert_eq!(err.offset(), 2);
    }
}
