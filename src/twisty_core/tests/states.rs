use twisty_core::{
    Algorithm, Coordinate, CubeState, Face, Part, PartKind, PuzzleState, SkewbNotation,
    SkewbState, parse_algorithm, parse_commutator,
};

fn apply(size: usize, algorithm: &Algorithm) -> CubeState {
    let mut state = CubeState::solved(size).unwrap();
    state.apply_algorithm(algorithm).unwrap();
    state
}

#[test_log::test]
fn cancelling_keeps_the_effect() {
    for s in [
        "R L R",
        "R U U' R'",
        "Rw R' x",
        "x R' U R' D2 R U' R' D2 R2 x'",
        "M M' U2 r l'",
        "y R y' F",
        "3Rw M Rw' L",
    ] {
        let algorithm = parse_algorithm(s).unwrap();
        for size in 4..=5 {
            let cancelled = algorithm.cancelled(size).unwrap();
            assert_eq!(apply(size, &cancelled), apply(size, &algorithm), "{s} on {size}: {cancelled}");
        }
    }
}

#[test_log::test]
fn commutators_act_like_their_expansion() {
    let commutator = parse_commutator("[F2 : [R, U]]").unwrap();
    let mut state = CubeState::solved(3).unwrap();

    for _ in 0..6 {
        state.apply_algorithm(&commutator.algorithm()).unwrap();
    }
    assert_eq!(state, CubeState::solved(3).unwrap());

    let mut state = CubeState::solved(3).unwrap();
    state.apply_algorithm(&commutator.algorithm()).unwrap();
    state.apply_algorithm(&commutator.inverse().algorithm()).unwrap();
    assert!(state.is_solved());
}

#[test_log::test]
fn solved_positions() {
    let edge = Part::parse(PartKind::Edge, "UF").unwrap();
    assert_eq!(
        Coordinate::solved_position(edge, 3, 0),
        Coordinate::new(Face::U, 3, 0, 1)
    );

    let wing = Part::parse(PartKind::Wing, "UF").unwrap();
    assert_eq!(
        Coordinate::solved_position(wing, 4, 0),
        Coordinate::new(Face::U, 4, 0, 2)
    );
}

#[test_log::test]
fn every_part_kind_shows_its_colors() {
    for size in 3..=5 {
        let state = CubeState::solved(size).unwrap();
        for kind in PartKind::ALL {
            for incarnation in 0..kind.num_incarnations(size) {
                for part in Part::all(kind) {
                    let stickers = Coordinate::solved_positions(part, size, incarnation).unwrap();
                    let colors = stickers.iter().map(|&sticker| state.get(sticker).unwrap()).collect::<Vec<_>>();
                    assert_eq!(colors, part.corresponding_part().faces(), "{part} on {size}");
                }
            }
        }
    }
}

#[test_log::test]
fn skewb_algorithms() {
    let sarah = SkewbNotation::SARAH;
    let algorithm = sarah.parse_algorithm("F R' B L' x F' y2 R").unwrap();

    let mut state = SkewbState::solved();
    state.apply_algorithm(&algorithm).unwrap();
    assert!(!state.is_solved());
    state.apply_algorithm(&algorithm.inverse()).unwrap();
    assert!(state.is_solved());

    for letter in sarah.letters() {
        let turn = sarah.parse_algorithm(&letter.to_string()).unwrap();
        let mut state = SkewbState::solved();
        for _ in 0..3 {
            state.apply_algorithm(&turn).unwrap();
        }
        assert!(state.is_solved(), "{letter}");
    }

    let mut state = SkewbState::solved();
    assert!(state.apply_algorithm(&parse_algorithm("R").unwrap()).is_err());
}
