//! Moves and Steer Normalization
//!
//! Planners answer with a raw `i8` steer. The engine normalizes it to a
//! [`Move`]; anything outside `-1..=1` is not a move and becomes `Stay`.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Lateral move applied once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i8)]
pub enum Move {
    /// One column left (-1)
    Left = -1,
    /// Keep the column (0)
    Stay = 0,
    /// One column right (+1)
    Right = 1,
}

impl Move {
    /// All moves in search order.
    pub const ALL: [Move; 3] = [Move::Left, Move::Stay, Move::Right];

    /// Normalize a raw steer value.
    ///
    /// Returns `None` for anything outside `{-1, 0, +1}`.
    #[inline]
    pub const fn from_steer(steer: i8) -> Option<Self> {
        match steer {
            -1 => Some(Move::Left),
            0 => Some(Move::Stay),
            1 => Some(Move::Right),
            _ => None,
        }
    }

    /// Raw steer value of this move.
    #[inline]
    pub const fn steer(self) -> i8 {
        self as i8
    }

    /// Left and right are lateral; stay is not.
    #[inline]
    pub const fn is_lateral(self) -> bool {
        !matches!(self, Move::Stay)
    }

    /// Search cost: 1 per lateral move.
    #[inline]
    pub const fn cost(self) -> u32 {
        self.is_lateral() as u32
    }

    /// Column after the move, or `None` if it leaves `[0, width)`.
    #[inline]
    pub fn apply(self, column: usize, width: usize) -> Option<usize> {
        let next = column.checked_add_signed(self.steer() as isize)?;
        (next < width).then_some(next)
    }

    /// Column after the move, clamped to `[0, width)`.
    ///
    /// `width` must be non-zero.
    #[inline]
    pub fn apply_clamped(self, column: usize, width: usize) -> usize {
        column
            .saturating_add_signed(self.steer() as isize)
            .min(width.saturating_sub(1))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.steer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_steer() {
        assert_eq!(Move::from_steer(-1), Some(Move::Left));
        assert_eq!(Move::from_steer(0), Some(Move::Stay));
        assert_eq!(Move::from_steer(1), Some(Move::Right));
        assert_eq!(Move::from_steer(2), None);
        assert_eq!(Move::from_steer(-128), None);
        assert_eq!(Move::from_steer(127), None);
    }

    #[test]
    fn test_steer_round_trip() {
        for mv in Move::ALL {
            assert_eq!(Move::from_steer(mv.steer()), Some(mv));
        }
    }

    #[test]
    fn test_cost() {
        assert_eq!(Move::Left.cost(), 1);
        assert_eq!(Move::Stay.cost(), 0);
        assert_eq!(Move::Right.cost(), 1);
    }

    #[test]
    fn test_apply_bounds() {
        assert_eq!(Move::Left.apply(0, 5), None);
        assert_eq!(Move::Right.apply(4, 5), None);
        assert_eq!(Move::Left.apply(3, 5), Some(2));
        assert_eq!(Move::Stay.apply(4, 5), Some(4));
    }

    #[test]
    fn test_apply_clamped() {
        assert_eq!(Move::Left.apply_clamped(0, 5), 0);
        assert_eq!(Move::Right.apply_clamped(4, 5), 4);
        assert_eq!(Move::Right.apply_clamped(2, 5), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::Left.to_string(), "-1");
        assert_eq!(Move::Stay.to_string(), "+0");
        assert_eq!(Move::Right.to_string(), "+1");
    }
}
