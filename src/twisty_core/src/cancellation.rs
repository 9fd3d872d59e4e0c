use std::sync::LazyLock;

use fxhash::FxHashMap;
use log::{debug, trace};

use crate::{
    Algorithm, CubeDirection, CubeError, Face, Metric, Move, Rotation, SkewbMove,
    check_cube_size,
    moves::{simplified_slice, translated_direction, translated_slice_index},
};

/// The shortest rotation sequence for each of the 24 orientations, keyed by where every face has
/// been moved to.
static ORIENTATIONS: LazyLock<FxHashMap<[Face; 6], Algorithm>> = LazyLock::new(|| {
    let singles = Rotation::canonical().collect::<Vec<_>>();
    let pairs = singles.iter().flat_map(|&left| {
        singles
            .iter()
            .filter(move |right| !right.direction().is_double() && !right.axis_face().same_axis(left.axis_face()))
            .map(move |&right| vec![left, right])
    });

    let mut orientations = FxHashMap::default();
    let sequences = std::iter::once(vec![])
        .chain(singles.iter().map(|&rotation| vec![rotation]))
        .chain(pairs);

    for rotations in sequences {
        orientations
            .entry(orientation_after(&rotations))
            .or_insert_with(|| rotations.into_iter().map(Move::Rotation).collect());
    }

    debug!("Built the orientation table with {} elements", orientations.len());

    orientations
});

fn orientation_after(rotations: &[Rotation]) -> [Face; 6] {
    rotations.iter().fold(Face::ALL, |faces, rotation| {
        faces.map(|face| rotation.apply_to_face(face))
    })
}

/// Replaces a run of rotations with the shortest sequence that ends in the same orientation.
fn cancelled_rotations(moves: &[Move]) -> Algorithm {
    let rotations = moves
        .iter()
        .filter_map(|mv| match mv {
            Move::Rotation(rotation) => Some(*rotation),
            _ => None,
        })
        .collect::<Vec<_>>();

    ORIENTATIONS
        .get(&orientation_after(&rotations))
        .cloned()
        .unwrap_or_else(|| unreachable!("every orientation is in the table"))
}

/// The number of rotations at the end of the algorithm.
pub(crate) fn num_tail_rotations(algorithm: &Algorithm) -> usize {
    algorithm
        .moves()
        .iter()
        .rev()
        .take_while(|mv| mv.is_rotation())
        .count()
}

/// Moves the move at `index` to the end by swapping it past all later moves, if they let it.
fn swap_to_end(algorithm: &Algorithm, index: usize) -> Result<Option<Algorithm>, CubeError> {
    let mut moves = algorithm.moves().to_vec();

    for current in index..moves.len().saturating_sub(1) {
        let (mv, obstacle) = (moves[current], moves[current + 1]);
        if !mv.can_swap(obstacle) {
            return Ok(None);
        }

        (moves[current], moves[current + 1]) = mv.swap(obstacle)?;
    }

    Ok(Some(Algorithm::new(moves)))
}

/// Every way of bringing one of the last moves to the end, starting with the algorithm itself.
fn cancel_variants(algorithm: &Algorithm) -> Result<Vec<Algorithm>, CubeError> {
    let mut variants = vec![];

    for index in (0..algorithm.len()).rev() {
        let Some(variant) = swap_to_end(algorithm, index)? else {
            break;
        };

        variants.push(variant);
    }

    Ok(variants)
}

fn alg_plus_cancelled_move(algorithm: &Algorithm, mv: Move, size: usize) -> Result<Algorithm, CubeError> {
    let moves = algorithm.moves();
    let tail_rotations = num_tail_rotations(algorithm);

    if mv.is_rotation() && tail_rotations >= 2 {
        let (head, tail) = moves.split_at(moves.len() - tail_rotations);
        let mut tail = tail.to_vec();
        tail.push(mv);

        return Ok(Algorithm::new(head.to_vec()) + cancelled_rotations(&tail));
    }

    let Some((&last, head)) = moves.split_last() else {
        return Ok(Algorithm::from_move(mv));
    };

    let head = Algorithm::new(head.to_vec());
    let joined = last.join_with_cancellation(mv, size)?;

    // A merged move may now cancel with the move before it.
    let merged = match joined.moves() {
        &[merged] if merged != last => Some(merged),
        _ => None,
    };

    match merged {
        Some(merged) => push_with_cancellation(head, merged, size),
        None => Ok(head + joined),
    }
}

type CancelKey = (usize, usize, usize);

// Qtm sees merges like `R R` that htm doesn't, and length makes rotation-only rewrites win.
fn cancel_key(algorithm: &Algorithm, size: usize) -> Result<CancelKey, CubeError> {
    Ok((
        algorithm.move_count(size, Metric::Qtm)?,
        algorithm.move_count(size, Metric::Htm)?,
        algorithm.len(),
    ))
}

fn cancel_pass(algorithm: &Algorithm, size: usize) -> Result<Algorithm, CubeError> {
    algorithm
        .moves()
        .iter()
        .try_fold(Algorithm::EMPTY, |algorithm, &mv| {
            push_with_cancellation(algorithm, mv, size)
        })
}

fn push_with_cancellation(algorithm: Algorithm, mv: Move, size: usize) -> Result<Algorithm, CubeError> {
    if algorithm.is_empty() {
        return Ok(Algorithm::from_move(mv));
    }

    let mut best: Option<(CancelKey, Algorithm)> = None;

    for variant in cancel_variants(&algorithm)? {
        let candidate = alg_plus_cancelled_move(&variant, mv, size)?;
        let key = cancel_key(&candidate, size)?;

        trace!("Cancelling {mv} into {variant} gives {candidate} with cost {key:?}");

        if best.as_ref().is_none_or(|(best_key, _)| key < *best_key) {
            best = Some((key, candidate));
        }
    }

    Ok(match best {
        Some((_, candidate)) => candidate,
        None => {
            let mut algorithm = algorithm;
            algorithm.push(mv);
            algorithm
        }
    })
}

impl Algorithm {
    /// Cancels as many moves as possible, assuming a cube of the given size. The size matters for
    /// which fat and slice moves merge.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if the size is unsupported or a move means nothing on this size.
    pub fn cancelled(&self, size: usize) -> Result<Algorithm, CubeError> {
        check_cube_size(size)?;

        let mut best = cancel_pass(self, size)?;
        let mut best_key = cancel_key(&best, size)?;

        // A join can rewrite two moves into two others that cancel with earlier moves, so repeat
        // until a pass stops improving.
        loop {
            let next = cancel_pass(&best, size)?;
            let next_key = cancel_key(&next, size)?;
            if next_key >= best_key {
                return Ok(best);
            }

            trace!("Another pass cancelled {best} into {next}");
            (best, best_key) = (next, next_key);
        }
    }

    /// The number of moves that cancel when `other` is appended to this algorithm. Cancelling
    /// optimizes qtm first, so in other metrics joining can cost more and this goes negative.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if the size is unsupported or a move means nothing on this size.
    pub fn cancellations(&self, other: &Algorithm, size: usize, metric: Metric) -> Result<isize, CubeError> {
        let separate = self.cancelled(size)?.move_count(size, metric)?
            + other.cancelled(size)?.move_count(size, metric)?;
        let together = (self + other).cancelled(size)?.move_count(size, metric)?;

        #[allow(clippy::cast_possible_wrap)]
        let cancelled = separate as isize - together as isize;

        Ok(cancelled)
    }
}

impl Move {
    /// Joins this move with the following one into as few moves as possible. Identity moves are
    /// dropped; if nothing merges, both moves are returned as they are.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if a Skewb move meets a cube move or a move is invalid for the
    /// size.
    pub fn join_with_cancellation(self, other: Move, size: usize) -> Result<Algorithm, CubeError> {
        if let (Move::Skewb(_), cube_move) | (cube_move, Move::Skewb(_)) = (self, other) {
            if cube_move.cube_axis_face().is_some() {
                return Err(CubeError::WrongPuzzle {
                    mv: cube_move,
                    puzzle: "Skewb",
                });
            }
        }

        let first = self.decide_meaning(size)?;
        let second = other.decide_meaning(size)?;

        let joined = join(first, second, size)?.unwrap_or_else(|| Algorithm::new(vec![self, other]));

        Ok(joined
            .into_moves()
            .into_iter()
            .filter(|mv| !mv.is_identity())
            .collect())
    }
}

type Axis = (Face, CubeDirection);
type Block = (Face, CubeDirection, usize);

fn join(first: Move, second: Move, size: usize) -> Result<Option<Algorithm>, CubeError> {
    let single = |mv: Move| Ok(Some(Algorithm::from_move(mv)));

    match (first, second) {
        (Move::Rotation(a), Move::Rotation(b)) => Ok(join_rotations(a, b)),
        (
            Move::Fat {
                axis_face,
                direction,
                width,
            },
            Move::Rotation(rotation),
        )
        | (
            Move::Rotation(rotation),
            Move::Fat {
                axis_face,
                direction,
                width,
            },
        ) => join_fat_and_rotation((axis_face, direction, width), rotation, size),
        (
            Move::FatMSlice {
                axis_face: a,
                direction: da,
            },
            Move::FatMSlice {
                axis_face: b,
                direction: db,
            },
        ) if a.same_axis(b) => single(Move::FatMSlice {
            axis_face: b,
            direction: db + translated_direction(a, da, b),
        }),
        (
            Move::Fat {
                axis_face,
                direction,
                width,
            },
            Move::FatMSlice {
                axis_face: m_face,
                direction: m_direction,
            },
        )
        | (
            Move::FatMSlice {
                axis_face: m_face,
                direction: m_direction,
            },
            Move::Fat {
                axis_face,
                direction,
                width,
            },
        ) => Ok(join_fat_and_fat_m((axis_face, direction, width), (m_face, m_direction), size)?
            .map(Algorithm::from_move)),
        (
            Move::Fat {
                axis_face: a,
                direction: da,
                width: wa,
            },
            Move::Fat {
                axis_face: b,
                direction: db,
                width: wb,
            },
        ) => join_fats((a, da, wa), (b, db, wb), size),
        (
            Move::Fat {
                axis_face,
                direction,
                width,
            },
            slice,
        )
        | (
            slice,
            Move::Fat {
                axis_face,
                direction,
                width,
            },
        ) if slice.as_slice().is_some() => match slice.as_slice() {
            Some(slice) => Ok(join_fat_and_slice((axis_face, direction, width), slice, size)?
                .map(Algorithm::from_move)),
            None => Ok(None),
        },
        (Move::Skewb(a), Move::Skewb(b)) if a.axis_corner() == b.axis_corner() => single(
            Move::Skewb(SkewbMove::new(a.axis_corner(), a.direction() + b.direction())?),
        ),
        _ => match (first.as_slice(), second.as_slice()) {
            (Some(a), Some(b)) => Ok(join_slices(a, b, size)?.map(Algorithm::from_move)),
            _ => Ok(None),
        },
    }
}

fn join_rotations(first: Rotation, second: Rotation) -> Option<Algorithm> {
    let (a, b) = (first.axis_face(), second.axis_face());

    if a.same_axis(b) {
        let direction = first.direction() + translated_direction(b, second.direction(), a);
        return Some(Algorithm::from_move(Move::rotation(a, direction)));
    }

    if first.direction().is_double() && second.direction().is_double() {
        // Either face of the remaining axis works.
        let remaining = Face::ALL
            .into_iter()
            .find(|face| !face.same_axis(a) && !face.same_axis(b))?;
        return Some(Algorithm::from_move(Move::rotation(remaining, CubeDirection::DOUBLE)));
    }

    None
}

fn check_width(width: usize, size: usize) -> Result<(), CubeError> {
    if width == 0 || width > size {
        return Err(CubeError::InvalidWidth { width, size });
    }

    Ok(())
}

fn fat(axis_face: Face, direction: CubeDirection, width: usize) -> Move {
    Move::Fat {
        axis_face,
        direction,
        width,
    }
}

// A rotation against a fat move leaves the rest of the cube turning the other way.
fn join_fat_and_rotation(
    (axis_face, direction, width): Block,
    rotation: Rotation,
    size: usize,
) -> Result<Option<Algorithm>, CubeError> {
    check_width(width, size)?;

    if !rotation.axis_face().same_axis(axis_face)
        || translated_direction(rotation.axis_face(), rotation.direction(), axis_face) != direction.inverse()
    {
        return Ok(None);
    }

    if width == size {
        return Ok(Some(Algorithm::EMPTY));
    }

    Ok(Some(Algorithm::from_move(fat(axis_face.opposite(), direction, size - width))))
}

fn join_fat_and_fat_m(
    (axis_face, direction, width): Block,
    (m_face, m_direction): Axis,
    size: usize,
) -> Result<Option<Move>, CubeError> {
    check_width(width, size)?;

    if !m_face.same_axis(axis_face) {
        return Ok(None);
    }

    let m_direction = translated_direction(m_face, m_direction, axis_face);

    Ok(if width == 1 && direction == m_direction {
        Some(fat(axis_face, direction, size - 1))
    } else if width + 1 == size && direction == m_direction.inverse() {
        Some(fat(axis_face, direction, 1))
    } else {
        None
    })
}

fn join_fats(first: Block, second: Block, size: usize) -> Result<Option<Algorithm>, CubeError> {
    let (a, da, wa) = first;
    let (b, db, wb) = second;
    check_width(wa, size)?;
    check_width(wb, size)?;

    if a == b && wa == wb {
        return Ok(Some(Algorithm::from_move(fat(a, da + db, wa))));
    }

    if a == b.opposite() && wa + wb == size {
        return Ok(Some(Algorithm::new(vec![
            fat(a, da + db, wa),
            Move::rotation(b, db),
        ])));
    }

    if a != b || da != db.inverse() {
        return Ok(None);
    }

    let ((face, direction, wider), narrower) = if wa > wb {
        (first, wb)
    } else {
        (second, wa)
    };

    if wider == narrower + 1 {
        // Without its inner layer, a fat move over the whole cube is the opposite face turn.
        let mv = if wider == size {
            fat(face.opposite(), direction.inverse(), 1)
        } else {
            Move::Slice {
                axis_face: face,
                direction,
                slice_index: wider - 1,
            }
        };
        return Ok(Some(Algorithm::from_move(mv)));
    }

    if size % 2 == 0 && wider + 1 == size && narrower == 1 {
        return Ok(Some(Algorithm::from_move(Move::FatMSlice {
            axis_face: face,
            direction,
        })));
    }

    Ok(None)
}

fn join_fat_and_slice(
    (axis_face, direction, width): Block,
    slice: Block,
    size: usize,
) -> Result<Option<Move>, CubeError> {
    check_width(width, size)?;

    let (slice_face, slice_direction, _) = slice;
    if !slice_face.same_axis(axis_face) {
        return Ok(None);
    }

    let slice_direction = translated_direction(slice_face, slice_direction, axis_face);
    let slice_index = translated_slice_index(slice, axis_face, size)?;

    Ok(if slice_index == width && slice_direction == direction {
        Some(fat(axis_face, direction, width + 1))
    } else if slice_index + 1 == width && slice_direction == direction.inverse() {
        Some(fat(axis_face, direction, width - 1))
    } else {
        None
    })
}

fn join_slices(first: Block, second: Block, size: usize) -> Result<Option<Move>, CubeError> {
    if !first.0.same_axis(second.0) {
        return Ok(None);
    }

    let (fa, da, ia) = simplified_slice(first, size)?;
    let (fb, db, ib) = simplified_slice(second, size)?;

    // On the 4x4 the two inner layers turning together are the fat M-slice.
    if size == 4 && ib == 1 && (fb.opposite(), db.inverse(), ib) == (fa, da, ia) {
        return Ok(Some(Move::FatMSlice {
            axis_face: first.0,
            direction: first.1,
        }));
    }

    Ok((fa == fb && ia == ib).then_some(Move::Slice {
        axis_face: fa,
        direction: da + db,
        slice_index: ia,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SkewbDirection, parse_algorithm, parse_move};

    fn alg(s: &str) -> Algorithm {
        parse_algorithm(s).unwrap()
    }

    fn join(a: &str, b: &str, size: usize) -> String {
        parse_move(a)
            .unwrap()
            .join_with_cancellation(parse_move(b).unwrap(), size)
            .unwrap()
            .to_string()
    }

    #[test_log::test]
    fn orientation_table_covers_every_orientation() {
        assert_eq!(ORIENTATIONS.len(), 24);
        assert_eq!(ORIENTATIONS.get(&Face::ALL), Some(&Algorithm::EMPTY));
        assert!(ORIENTATIONS.values().all(|rotations| rotations.len() <= 2));
    }

    #[test_log::test]
    fn tail_rotations() {
        assert_eq!(num_tail_rotations(&alg("R x y")), 2);
        assert_eq!(num_tail_rotations(&alg("x R")), 0);
        assert_eq!(num_tail_rotations(&Algorithm::EMPTY), 0);
    }

    #[test_log::test]
    fn same_block() {
        assert_eq!(join("R", "R", 3), "R2");
        assert_eq!(join("R", "R'", 3), "");
        assert_eq!(join("Rw2", "Rw", 4), "Rw'");
        assert_eq!(join("R", "U", 3), "R U");
    }

    #[test_log::test]
    fn opposite_block() {
        assert_eq!(join("Rw", "L", 3), "Rw2 x'");
        assert_eq!(join("R", "3Lw", 4), "R2 x'");
    }

    #[test_log::test]
    fn fat_and_slice() {
        assert_eq!(join("R", "r", 3), "R r");
        assert_eq!(join("R", "1r", 4), "Rw");
        assert_eq!(join("2r", "Rw", 5), "3Rw");
        assert_eq!(join("Rw", "r'", 4), "R");
        assert_eq!(join("Rw", "R'", 4), "1r");
        assert_eq!(join("R'", "Rw", 4), "1r");
        assert_eq!(join("Rw", "R'", 3), "1r");
        assert_eq!(join("3Rw", "Rw'", 3), "L'");
    }

    #[test_log::test]
    fn fat_and_rotation() {
        assert_eq!(join("Rw", "x'", 3), "L");
        assert_eq!(join("x'", "Rw", 3), "L");
        assert_eq!(join("R", "x'", 3), "Lw");
        assert_eq!(join("R", "x", 3), "R x");
        assert_eq!(join("3Rw", "x'", 3), "");
    }

    #[test_log::test]
    fn m_slices() {
        assert_eq!(join("M", "M", 4), "M2");
        assert_eq!(join("M", "R'", 4), "3Rw'");
        assert_eq!(join("L", "M", 4), "3Lw");
        assert_eq!(join("3Rw", "M", 4), "R");
        assert_eq!(join("3Rw", "L", 4), "3Rw2 x'");
        assert_eq!(join("3Rw", "R'", 4), "M'");
        assert_eq!(join("r", "l'", 4), "M'");
        assert_eq!(join("M", "M", 5), "2l2");
    }

    #[test_log::test]
    fn rotations() {
        assert_eq!(join("x", "x", 3), "x2");
        assert_eq!(join("x", "x'", 3), "");
        assert_eq!(join("y2", "x2", 3), "z2");
        assert_eq!(join("x", "y", 3), "x y");
    }

    #[test_log::test]
    fn skewb_moves() {
        let corner = crate::Part::parse(crate::PartKind::Corner, "URF").unwrap();
        let turn = Move::Skewb(SkewbMove::new(corner, SkewbDirection::FORWARD).unwrap());

        assert_eq!(turn.join_with_cancellation(turn, 3).unwrap(), Algorithm::from_move(turn.inverse()));
        assert_eq!(turn.join_with_cancellation(turn.inverse(), 3).unwrap(), Algorithm::EMPTY);
        assert!(turn.join_with_cancellation(parse_move("R").unwrap(), 3).is_err());
    }

    #[test_log::test]
    fn cancelled() {
        assert_eq!(alg("R U U' R'").cancelled(3).unwrap(), Algorithm::EMPTY);
        assert_eq!(alg("R R").cancelled(3).unwrap(), alg("R2"));
        assert_eq!(alg("R L R").cancelled(3).unwrap(), alg("L R2"));
        assert_eq!(alg("R U R'").cancelled(3).unwrap(), alg("R U R'"));
        assert_eq!(alg("x y x'").cancelled(3).unwrap().len(), 1);
        assert_eq!(alg("x x x x").cancelled(3).unwrap(), Algorithm::EMPTY);
        assert_eq!(alg("R x U x'").cancelled(3).unwrap(), alg("R F x x'").cancelled(3).unwrap());
        assert_eq!(alg("x y x").cancelled(3).unwrap(), alg("y2 z"));
        assert_eq!(alg("x2 y2").cancelled(3).unwrap(), alg("z2"));
    }

    #[test_log::test]
    fn rewritten_moves_cancel_with_earlier_ones() {
        assert_eq!(alg("Lw Lw'").cancelled(5).unwrap(), Algorithm::EMPTY);
        assert_eq!(alg("R U 5Lw' 5Lw").cancelled(6).unwrap(), alg("R U"));

        for (s, size) in [("x' Rw L' 2l' Lw'", 5), ("y2 M R2 R R", 6), ("E2 Uw2 U2 E2", 5)] {
            let algorithm = alg(s);
            let cancelled = (&algorithm + &algorithm.inverse()).cancelled(size).unwrap();
            assert_eq!(cancelled.move_count(size, Metric::Htm), Ok(0), "{s} on {size}: {cancelled}");
        }
    }

    #[test_log::test]
    fn cancellations() {
        assert_eq!(alg("R U").cancellations(&alg("U' R'"), 3, Metric::Htm), Ok(4));
        assert_eq!(alg("R U").cancellations(&alg("U R'"), 3, Metric::Htm), Ok(1));
        assert_eq!(alg("R U").cancellations(&alg("U R'"), 3, Metric::Qtm), Ok(0));
        assert_eq!(alg("R U").cancellations(&alg("F"), 3, Metric::Htm), Ok(0));
    }

    #[test_log::test]
    fn cancellations_are_the_signed_difference() {
        let cases = [("Rw", "R'", 4), ("R x", "x' L", 3), ("3Rw", "R'", 4), ("R U", "U R'", 3)];

        for (a, b, size) in cases {
            for metric in Metric::ALL {
                let count = |algorithm: Algorithm| {
                    algorithm.cancelled(size).unwrap().move_count(size, metric).unwrap() as isize
                };
                let expected = count(alg(a)) + count(alg(b)) - count(alg(a) + alg(b));

                assert_eq!(alg(a).cancellations(&alg(b), size, metric), Ok(expected), "{a} + {b} in {metric}");
            }
        }
    }
}
