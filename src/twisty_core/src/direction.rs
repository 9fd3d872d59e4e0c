use std::ops::{Add, Neg};

/// A turning direction modulo `PERIOD`; 1 is a clockwise turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Direction<const PERIOD: u8>(u8);

/// Quarter turns of cube layers and rotations.
pub type CubeDirection = Direction<4>;

/// Third turns of Skewb corners.
pub type SkewbDirection = Direction<3>;

impl<const PERIOD: u8> Direction<PERIOD> {
    pub const ZERO: Self = Direction(0);
    pub const FORWARD: Self = Direction(1);
    pub const BACKWARD: Self = Direction(PERIOD - 1);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn new(value: i64) -> Self {
        Direction(value.rem_euclid(PERIOD as i64) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn inverse(self) -> Self {
        Direction((PERIOD - self.0) % PERIOD)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..PERIOD).map(Direction)
    }
}

impl CubeDirection {
    pub const DOUBLE: Self = Direction(2);
    pub const NON_ZERO: [Self; 3] = [Self::FORWARD, Self::DOUBLE, Self::BACKWARD];

    pub const fn is_double(self) -> bool {
        self.0 == 2
    }

    pub fn name(self) -> &'static str {
        ["0", "", "2", "'"][usize::from(self.0)]
    }
}

impl SkewbDirection {
    pub const NON_ZERO: [Self; 2] = [Self::FORWARD, Self::BACKWARD];

    pub fn name(self) -> &'static str {
        ["0", "", "'"][usize::from(self.0)]
    }

    /// The cube direction of a whole-puzzle rotation that turns as far as this Skewb turn does
    /// around the same corner.
    pub fn to_cube_direction(self) -> CubeDirection {
        match self.0 {
            0 => CubeDirection::ZERO,
            1 => CubeDirection::FORWARD,
            _ => CubeDirection::BACKWARD,
        }
    }
}

impl<const PERIOD: u8> Add for Direction<PERIOD> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Direction((self.0 + rhs.0) % PERIOD)
    }
}

impl<const PERIOD: u8> Neg for Direction<PERIOD> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.inverse()
    }
}
