use std::{fmt, str::FromStr};

use crate::{Algorithm, CubeError, Metric, ParseError};

/// An algorithm written in commutator notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Commutator {
    /// A plain algorithm where a commutator could stand
    Fake(Algorithm),
    /// `[A, B]`, i.e. `A B A' B'`
    Pure { first: Algorithm, second: Algorithm },
    /// `[S : C]`, i.e. `S C S'`. The inner part may be any commutator.
    Setup {
        setup: Algorithm,
        inner: Box<Commutator>,
    },
    /// `[A / B]`, i.e. `A B'`
    Slash { first: Algorithm, second: Algorithm },
}

impl Commutator {
    /// Expands the notation into a plain algorithm without cancelling anything.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Commutator::Fake(algorithm) => algorithm.clone(),
            Commutator::Pure { first, second } => {
                first + second + first.inverse() + second.inverse()
            }
            Commutator::Setup { setup, inner } => setup + &inner.algorithm() + setup.inverse(),
            Commutator::Slash { first, second } => first + &second.inverse(),
        }
    }

    #[must_use]
    pub fn inverse(&self) -> Commutator {
        match self {
            Commutator::Fake(algorithm) => Commutator::Fake(algorithm.inverse()),
            Commutator::Pure { first, second } => Commutator::Pure {
                first: second.clone(),
                second: first.clone(),
            },
            Commutator::Setup { setup, inner } => Commutator::Setup {
                setup: setup.clone(),
                inner: Box::new(inner.inverse()),
            },
            Commutator::Slash { first, second } => Commutator::Slash {
                first: second.clone(),
                second: first.clone(),
            },
        }
    }

    /// How many moves cancel when this commutator is followed by `other`. Negative if joining
    /// them costs more than the two on their own.
    ///
    /// # Errors
    ///
    /// Returns a [`CubeError`] if a move doesn't fit the cube size.
    pub fn cancellations(&self, other: &Commutator, size: usize, metric: Metric) -> Result<isize, CubeError> {
        self.algorithm()
            .cancellations(&other.algorithm(), size, metric)
    }
}

impl From<Algorithm> for Commutator {
    fn from(algorithm: Algorithm) -> Self {
        Commutator::Fake(algorithm)
    }
}

impl fmt::Display for Commutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commutator::Fake(algorithm) => write!(f, "{algorithm}"),
            Commutator::Pure { first, second } => write!(f, "[{first}, {second}]"),
            Commutator::Setup { setup, inner } => write!(f, "[{setup} : {inner}]"),
            Commutator::Slash { first, second } => write!(f, "[{first} / {second}]"),
        }
    }
}

impl FromStr for Commutator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_commutator(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_algorithm, parse_commutator};

    fn alg(s: &str) -> Algorithm {
        parse_algorithm(s).unwrap()
    }

    fn comm(s: &str) -> Commutator {
        parse_commutator(s).unwrap()
    }

    #[test_log::test]
    fn expansion() {
        assert_eq!(comm("[R, U]").algorithm(), alg("R U R' U'"));
        assert_eq!(comm("[D : [R, U]]").algorithm(), alg("D R U R' U' D'"));
        assert_eq!(comm("[D; R U]").algorithm(), alg("D R U D'"));
        assert_eq!(comm("[R / U]").algorithm(), alg("R U'"));
        assert_eq!(comm("R U2").algorithm(), alg("R U2"));
    }

    #[test_log::test]
    fn inverse_matches_the_expansion() {
        for s in ["[R, U]", "[D : [R, U]]", "[R' : U2]", "[R / U F]", "R U2 F'"] {
            let commutator = comm(s);
            assert_eq!(commutator.inverse().algorithm(), commutator.algorithm().inverse(), "{s}");
            assert_eq!(commutator.inverse().inverse(), commutator);
        }

        assert_eq!(comm("[R, U]").inverse(), comm("[U, R]"));
    }

    #[test_log::test]
    fn display() {
        assert_eq!(comm("[R,U]").to_string(), "[R, U]");
        assert_eq!(comm("[D;[R , U']]").to_string(), "[D : [R, U']]");
        assert_eq!(comm("[ R / U ]").to_string(), "[R / U]");
        assert_eq!(comm("R  U").to_string(), "R U");

        for s in ["[R, U]", "[D : [R, U']]", "[Rw2 : M' U2]", "[R / U]", "R U"] {
            assert_eq!(comm(s).to_string().parse::<Commutator>(), Ok(comm(s)));
        }
    }

    #[test_log::test]
    fn cancellations() {
        assert_eq!(comm("[R, U]").cancellations(&comm("[U, R]"), 3, Metric::Htm), Ok(8));
        assert_eq!(comm("[R, U]").cancellations(&comm("[F, D]"), 3, Metric::Htm), Ok(0));
        assert_eq!(
            Commutator::from(alg("R U")).cancellations(&comm("U' R'"), 3, Metric::Qtm),
            Ok(4)
        );
    }
}
