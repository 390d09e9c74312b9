//! Row Stream
//!
//! Lazy, finite, forward-only view over decoded rows.
//!
//! The payload is zlib-compressed as a single block, so the whole payload is
//! inflated before the first row can be yielded. `RowStream` is therefore a
//! cursor over an already-decoded in-memory grid rather than an incremental
//! decompressor. There is no seek or replay: once a row is yielded it is gone.

use std::iter::FusedIterator;

use crate::track::cell::Row;
use crate::track::grid::TrackGrid;

/// Forward-only row cursor over a shared grid.
///
/// Not `Clone`: a consumed row cannot be revisited through a snapshot.
///
/// ```compile_fail
/// let grid = roadbyte::TrackGrid::parse_plaintext("..#\nFFF\n").unwrap();
/// let stream = grid.stream();
/// let _snapshot = stream.clone();
/// ```
#[derive(Debug)]
pub struct RowStream<'a> {
    rows: std::slice::Iter<'a, Row>,
}

impl<'a> RowStream<'a> {
    /// Stream the rows of `grid` from the first row.
    pub fn new(grid: &'a TrackGrid) -> Self {
        Self { rows: grid.rows().iter() }
    }

    /// Rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// True once every row has been yielded.
    pub fn is_exhausted(&self) -> bool {
        self.rows.len() == 0
    }
}

impl Iterator for RowStream<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.next().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for RowStream<'_> {}

impl FusedIterator for RowStream<'_> {}
