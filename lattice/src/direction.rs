//! D2Q9 velocity set.
//!
//! ```text
//!   4   3   2
//!    \  |  /
//!   5 - 0 - 1
//!    /  |  \
//!   6   7   8
//! ```
//!
//! `+y` points up, so `Up` has offset `(0, 1)`.

use crate::vector::Vector;

pub const Q: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Rest = 0,
    Right = 1,
    RightUp = 2,
    Up = 3,
    LeftUp = 4,
    Left = 5,
    LeftDown = 6,
    Down = 7,
    RightDown = 8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightClass {
    Center,
    Axis,
    Diagonal,
}

impl WeightClass {
    pub const fn weight(self) -> f64 {
        match self {
            WeightClass::Center => 4.0 / 9.0,
            WeightClass::Axis => 1.0 / 9.0,
            WeightClass::Diagonal => 1.0 / 36.0,
        }
    }
}

const OFFSETS: [(i32, i32); Q] = [
    (0, 0),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

impl Direction {
    pub const ALL: [Direction; Q] = [
        Direction::Rest,
        Direction::Right,
        Direction::RightUp,
        Direction::Up,
        Direction::LeftUp,
        Direction::Left,
        Direction::LeftDown,
        Direction::Down,
        Direction::RightDown,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Direction> {
        Self::ALL.get(i).copied()
    }

    /// Lattice step taken by a population moving in this direction.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        OFFSETS[self as usize]
    }

    #[inline]
    pub fn velocity(self) -> Vector {
        let (dx, dy) = self.offset();
        Vector::new(dx as f64, dy as f64)
    }

    pub const fn weight_class(self) -> WeightClass {
        match self {
            Direction::Rest => WeightClass::Center,
            Direction::Right | Direction::Up | Direction::Left | Direction::Down => {
                WeightClass::Axis
            }
            _ => WeightClass::Diagonal,
        }
    }

    #[inline]
    pub const fn weight(self) -> f64 {
        self.weight_class().weight()
    }

    /// Direction a population travels after a full bounce-back.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Rest => Direction::Rest,
            Direction::Right => Direction::Left,
            Direction::RightUp => Direction::LeftDown,
            Direction::Up => Direction::Down,
            Direction::LeftUp => Direction::RightDown,
            Direction::Left => Direction::Right,
            Direction::LeftDown => Direction::RightUp,
            Direction::Down => Direction::Up,
            Direction::RightDown => Direction::LeftUp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for (i, d) in Direction::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
            assert_eq!(Direction::from_index(i), Some(*d));
        }
        assert_eq!(Direction::from_index(Q), None);
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = Direction::ALL.iter().map(|d| d.weight()).sum();
        assert!((total - 1.0).abs() < 1e-15);
    }

    #[test]
    fn opposite_negates_offset() {
        for d in Direction::ALL {
            let (dx, dy) = d.offset();
            assert_eq!(d.opposite().offset(), (-dx, -dy));
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(d.opposite().weight_class(), d.weight_class());
        }
        assert_eq!(Direction::Rest.opposite(), Direction::Rest);
    }

    #[test]
    fn weight_class_follows_offset() {
        for d in Direction::ALL {
            let (dx, dy) = d.offset();
            let expected = match dx.abs() + dy.abs() {
                0 => WeightClass::Center,
                1 => WeightClass::Axis,
                _ => WeightClass::Diagonal,
            };
            assert_eq!(d.weight_class(), expected, "{:?}", d);
        }
    }
}
