//! Track Grid
//!
//! Rectangular, immutable grid of rows produced once by the codec.

use std::fmt;

use crate::track::cell::Row;
use crate::track::error::{FormatError, TrackError};
use crate::track::stream::RowStream;

/// Ordered rows of identical width.
///
/// Row 0 is the first row the car drives into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackGrid {
    width: usize,
    rows: Vec<Row>,
}

impl TrackGrid {
    /// Build a grid from rows, verifying they share one width.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, TrackError> {
        let width = rows.first().map(Row::width).unwrap_or(0);
        if let Some((row, found)) = rows
            .iter()
            .map(Row::width)
            .enumerate()
            .find(|&(_, w)| w != width)
        {
            return Err(TrackError::InconsistentWidth { row, expected: width, found });
        }
        Ok(Self { width, rows })
    }

    /// Split a separator-free payload into rows of `width` symbols.
    pub fn from_payload(payload: &[u8], width: usize) -> Result<Self, TrackError> {
        if width == 0 {
            return Err(FormatError::ZeroWidth.into());
        }
        if payload.len() % width != 0 {
            return Err(FormatError::RaggedPayload { len: payload.len(), width }.into());
        }

        let rows = payload
            .chunks_exact(width)
            .enumerate()
            .map(|(row, symbols)| {
                Row::from_symbols(symbols)
                    .map_err(|(column, byte)| TrackError::invalid_symbol(row, column, byte))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { width, rows })
    }

    /// Parse the plaintext format: one row per line.
    pub fn parse_plaintext(text: &str) -> Result<Self, TrackError> {
        Self::parse_plaintext_bytes(text.as_bytes())
    }

    /// Parse the plaintext format from raw file bytes.
    ///
    /// Empty lines are skipped and `\r\n` line endings are accepted. Symbols
    /// are checked before width, so any byte outside the alphabet (non-ASCII
    /// included) is an `InvalidSymbol` at its row and column.
    pub fn parse_plaintext_bytes(bytes: &[u8]) -> Result<Self, TrackError> {
        let mut width = None;
        let mut rows = Vec::new();

        for line in bytes.split(|&byte| byte == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() {
                continue;
            }

            let index = rows.len();
            let row = Row::from_symbols(line)
                .map_err(|(column, byte)| TrackError::invalid_symbol(index, column, byte))?;

            let expected = *width.get_or_insert(row.width());
            if row.width() != expected {
                return Err(TrackError::InconsistentWidth {
                    row: index,
                    expected,
                    found: row.width(),
                });
            }
            rows.push(row);
        }

        Ok(Self {
            width: width.unwrap_or(0),
            rows,
        })
    }

    /// Number of columns (W).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the grid has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, nearest first.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at `index`, if any.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Concatenated row symbols, no separators.
    pub fn payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.rows.len());
        for row in &self.rows {
            row.write_symbols(&mut out);
        }
        out
    }

    /// Serialise to the plaintext format (trailing newline per row).
    pub fn to_plaintext(&self) -> String {
        self.to_string()
    }

    /// Lazy forward-only view over the rows.
    pub fn stream(&self) -> RowStream<'_> {
        RowStream::new(self)
    }
}

impl fmt::Display for TrackGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::cell::Cell;

    #[test]
    fn test_parse_plaintext() {
        let grid = TrackGrid::parse_plaintext("....#\n..#..\n.....\nFFFFF\n").unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.row(0).unwrap().get(4), Some(Cell::Obstacle));
        assert_eq!(grid.row(3).unwrap().get(0), Some(Cell::Finish));
    }

    #[test]
    fn test_parse_plaintext_skips_blank_lines_and_crlf() {
        let grid = TrackGrid::parse_plaintext("\r\n..#\r\n\r\n#..\r\n").unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.to_plaintext(), "..#\n#..\n");
    }

    #[test]
    fn test_parse_plaintext_inconsistent_width() {
        let err = TrackGrid::parse_plaintext("...\n....\n").unwrap_err();
        assert!(matches!(
            err,
            TrackError::InconsistentWidth { row: 1, expected: 3, found: 4 }
        ));
    }

    #[test]
    fn test_parse_plaintext_invalid_symbol() {
        let err = TrackGrid::parse_plaintext("...\n.x.\n").unwrap_err();
        assert!(matches!(
            err,
            TrackError::InvalidSymbol { row: 1, column: 1, symbol: 'x' }
        ));
    }

    #[test]
    fn test_parse_plaintext_non_ascii_byte() {
        let err = TrackGrid::parse_plaintext_bytes(b"...\n.\xE9.\n").unwrap_err();
        assert!(matches!(
            err,
            TrackError::InvalidSymbol { row: 1, column: 1, symbol: '\u{e9}' }
        ));
    }

    #[test]
    fn test_parse_plaintext_empty() {
        let grid = TrackGrid::parse_plaintext("").unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.width(), 0);
    }

    #[test]
    fn test_from_payload() {
        let grid = TrackGrid::from_payload(b"..#.#.FFF", 3).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.payload(), b"..#.#.FFF");
    }

    #[test]
    fn test_from_payload_errors() {
        assert!(matches!(
            TrackGrid::from_payload(b"....", 0),
            Err(TrackError::Format(FormatError::ZeroWidth))
        ));
        assert!(matches!(
            TrackGrid::from_payload(b".....", 2),
            Err(TrackError::Format(FormatError::RaggedPayload { len: 5, width: 2 }))
        ));
        assert!(matches!(
            TrackGrid::from_payload(b"..\n.", 2),
            Err(TrackError::InvalidSymbol { row: 1, column: 0, symbol: '\n' })
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec!["..".parse().unwrap(), "...".parse().unwrap()];
        assert!(matches!(
            TrackGrid::from_rows(rows),
            Err(TrackError::InconsistentWidth { row: 1, expected: 2, found: 3 })
        ));
    }
}
