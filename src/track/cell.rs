//! Track Alphabet
//!
//! Every track cell is one of three ASCII symbols:
//!
//! | Symbol | Cell       | Meaning                          |
//! |--------|------------|----------------------------------|
//! | `.`    | `Open`     | free road                        |
//! | `#`    | `Obstacle` | entering it crashes the car      |
//! | `F`    | `Finish`   | entering it finishes the race    |

use std::fmt;
use serde::{Serialize, Deserialize};

/// A single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    /// Free road (`.`)
    Open = b'.',
    /// Obstacle (`#`)
    Obstacle = b'#',
    /// Finish line (`F`)
    Finish = b'F',
}

impl Cell {
    /// Decode an ASCII symbol.
    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'.' => Some(Cell::Open),
            b'#' => Some(Cell::Obstacle),
            b'F' => Some(Cell::Finish),
            _ => None,
        }
    }

    /// The ASCII symbol for this cell.
    #[inline]
    pub const fn symbol(self) -> u8 {
        self as u8
    }

    /// Obstacles are the only impassable cells.
    #[inline]
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Cell::Obstacle)
    }

    /// True for the finish marker.
    #[inline]
    pub const fn is_finish(self) -> bool {
        matches!(self, Cell::Finish)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol() as char)
    }
}

/// One row of a track, index 0 = leftmost column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row(Vec<Cell>);

impl Row {
    /// Build a row from cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    /// Decode a row of ASCII symbols.
    ///
    /// Returns the offending column on the first invalid symbol.
    pub fn from_symbols(symbols: &[u8]) -> Result<Self, (usize, u8)> {
        symbols
            .iter()
            .enumerate()
            .map(|(column, &byte)| Cell::from_byte(byte).ok_or((column, byte)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Cell at `column`, or `None` when out of range.
    #[inline]
    pub fn get(&self, column: usize) -> Option<Cell> {
        self.0.get(column).copied()
    }

    /// Whether the cell at `column` exists and is an obstacle.
    #[inline]
    pub fn blocked(&self, column: usize) -> bool {
        self.get(column).is_some_and(Cell::is_obstacle)
    }

    /// Whether any cell in the row is an obstacle.
    pub fn has_obstacle(&self) -> bool {
        self.0.iter().any(|cell| cell.is_obstacle())
    }

    /// Cells left to right.
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Append this row's ASCII symbols to `out`.
    pub fn write_symbols(&self, out: &mut Vec<u8>) {
        out.extend(self.0.iter().map(|cell| cell.symbol()));
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.0 {
            write!(f, "{cell}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Row {
    type Err = (usize, u8);

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbols(s.as_bytes())
    }
}
