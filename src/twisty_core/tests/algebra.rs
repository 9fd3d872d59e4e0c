use twisty_core::{
    Algorithm, Commutator, CubeDirection, Face, Metric, Move, parse_algorithm, parse_commutator,
    parse_move,
};

const ALGORITHMS: [&str; 8] = [
    "R U R' U'",
    "R U2 R' U' R U' R'",
    "Rw U Rw' F2 1r' D",
    "M2 U M2 U2 M2 U M2",
    "x R' U R' D2 R U' R' D2 R2 x'",
    "(R U R' U')3 S E'",
    "F 3Rw2 y' l B'",
    "",
];

fn alg(s: &str) -> Algorithm {
    parse_algorithm(s).unwrap()
}

#[test_log::test]
fn display_round_trips_through_the_parser() {
    for s in ALGORITHMS {
        let algorithm = alg(s);
        assert_eq!(parse_algorithm(&algorithm.to_string()), Ok(algorithm.clone()), "{s}");
    }

    for s in ["[R, U]", "[D : [R, U]]", "[R U R' : D]", "[F / R' U]", "R U2"] {
        let commutator = parse_commutator(s).unwrap();
        assert_eq!(commutator.to_string().parse::<Commutator>(), Ok(commutator.clone()), "{s}");
    }
}

#[test_log::test]
fn inverses_are_involutions() {
    for s in ALGORITHMS {
        let algorithm = alg(s);
        assert_eq!(algorithm.inverse().inverse(), algorithm, "{s}");
        assert_eq!(algorithm.inverse().len(), algorithm.len());
    }

    for s in ["R", "Rw2", "3r'", "M", "x", "u2"] {
        let mv = parse_move(s).unwrap();
        assert_eq!(mv.inverse().inverse(), mv, "{s}");
    }
}

#[test_log::test]
fn algorithms_cancel_with_their_inverse() {
    for s in ALGORITHMS {
        let algorithm = alg(s);
        for size in 3..=5 {
            let cancelled = (&algorithm + &algorithm.inverse()).cancelled(size).unwrap();
            assert_eq!(cancelled.move_count(size, Metric::Htm), Ok(0), "{s} on {size}: {cancelled}");
        }
    }

    let cancelled = (alg("R U") + alg("U' R'")).cancelled(3).unwrap();
    assert_eq!(cancelled.move_count(3, Metric::Htm), Ok(0));
}

#[test_log::test]
fn random_algorithms_cancel_with_their_inverse() {
    const MOVES: [&str; 24] = [
        "R", "U'", "F2", "L", "B'", "D2", "Rw", "Uw2", "Lw'", "3Fw", "3Dw2", "r", "2r'", "2u2",
        "l", "M", "M2", "E'", "S", "x", "y'", "z2", "x2", "y",
    ];

    let mut rng = fastrand::Rng::with_seed(1729);
    for size in 4..=6 {
        for _ in 0..300 {
            let algorithm = (0..rng.usize(1..=6))
                .map(|_| parse_move(MOVES[rng.usize(..MOVES.len())]).unwrap())
                .collect::<Algorithm>();

            let cancelled = (&algorithm + &algorithm.inverse()).cancelled(size).unwrap();
            assert_eq!(
                cancelled.move_count(size, Metric::Htm),
                Ok(0),
                "{algorithm} on {size}: {cancelled}"
            );
        }
    }
}

#[test_log::test]
fn commutators_expand() {
    assert_eq!(parse_commutator("[R,U]").unwrap().algorithm(), alg("R U R' U'"));
    assert_eq!(
        parse_commutator("[D : [R,U]]").unwrap().algorithm(),
        alg("D R U R' U' D'")
    );
}

#[test_log::test]
fn metrics_are_ordered() {
    for s in ALGORITHMS {
        let algorithm = alg(s);
        for size in 3..=5 {
            let count = |metric| algorithm.move_count(size, metric).unwrap();
            assert!(count(Metric::Qtm) >= count(Metric::Htm), "{s} on {size}");
            assert!(count(Metric::Htm) >= count(Metric::Stm), "{s} on {size}");
            assert_eq!(count(Metric::Sqtm), count(Metric::Qstm));
        }
    }
}

#[test_log::test]
fn move_counts() {
    assert_eq!(alg("R2").move_count(3, Metric::Htm), Ok(1));
    assert_eq!(alg("R2").move_count(3, Metric::Qtm), Ok(2));
    assert_eq!(
        alg("Rw").move_count(3, Metric::Htm),
        alg("r").move_count(3, Metric::Htm)
    );
    assert_eq!(alg("M2").move_count(3, Metric::Stm), Ok(1));
    assert_eq!(alg("M2").move_count(3, Metric::Qtm), Ok(4));
    assert_eq!(alg("x y2").move_count(3, Metric::Htm), Ok(0));
}

#[test_log::test]
fn same_axis_runs_merge() {
    assert_eq!(alg("R L R").cancelled(3).unwrap(), alg("L R2"));
    assert_eq!(alg("R L R'").cancelled(3).unwrap(), alg("L"));
    assert_eq!(alg("R R R").cancelled(3).unwrap(), alg("R'"));
    assert_eq!(alg("U D U D").cancelled(3).unwrap(), alg("U2 D2"));
}

#[test_log::test]
fn joined_moves_stay_valid() {
    let r = parse_move("R").unwrap();
    assert_eq!(r.join_with_cancellation(r.inverse(), 3), Ok(Algorithm::EMPTY));
    assert_eq!(
        r.join_with_cancellation(Move::outer(Face::U, CubeDirection::FORWARD), 3),
        Ok(alg("R U"))
    );
}
