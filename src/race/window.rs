//! Lookahead Window
//!
//! Fixed-depth buffer of upcoming rows, index 0 = the nearest row.
//!
//! Rows leave at the front and arrive at the back once per tick. The ring
//! buffer is kept contiguous so planners see a plain slice.

use std::collections::VecDeque;

use crate::track::cell::Row;

/// Upcoming rows visible to the planner.
#[derive(Clone, Debug, Default)]
pub struct LookaheadWindow {
    rows: VecDeque<Row>,
    depth: usize,
    draining: bool,
}

impl LookaheadWindow {
    /// Create an empty window holding at most `depth` rows (at least 1).
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            rows: VecDeque::with_capacity(depth),
            depth,
            draining: false,
        }
    }

    /// Fill the window from `stream` up to its depth.
    ///
    /// Returns the number of rows pulled.
    pub fn prime<I: Iterator<Item = Row>>(&mut self, stream: &mut I) -> usize {
        let before = self.rows.len();
        while self.rows.len() < self.depth {
            match stream.next() {
                Some(row) => self.rows.push_back(row),
                None => {
                    self.draining = true;
                    break;
                }
            }
        }
        self.rows.make_contiguous();
        self.rows.len() - before
    }

    /// Pop the nearest row and append `next`, if any.
    ///
    /// Once `next` is `None` the window is draining and only shrinks.
    pub fn advance(&mut self, next: Option<Row>) -> Option<Row> {
        let consumed = self.rows.pop_front();
        match next {
            Some(row) => self.rows.push_back(row),
            None => self.draining = true,
        }
        self.rows.make_contiguous();
        consumed
    }

    /// Snapshot of the window, nearest row first.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        // Every mutation ends with make_contiguous, so the tail slice is empty
        self.rows.as_slices().0
    }

    /// Nearest row.
    #[inline]
    pub fn front(&self) -> Option<&Row> {
        self.rows.front()
    }

    /// Farthest visible row.
    #[inline]
    pub fn back(&self) -> Option<&Row> {
        self.rows.back()
    }

    /// Rows currently buffered.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// No rows left.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Configured depth (H).
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Holding `depth` rows.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.rows.len() == self.depth
    }

    /// Whether the stream behind this window has run dry.
    #[inline]
    pub fn is_draining(&self) -> bool {
        self.draining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<Row> {
        lines.iter().map(|line| line.parse().unwrap()).collect()
    }

    #[test]
    fn test_prime_to_depth() {
        let mut stream = rows(&["..#", "#..", ".#.", "FFF"]).into_iter();
        let mut window = LookaheadWindow::new(3);

        assert_eq!(window.prime(&mut stream), 3);
        assert!(window.is_full());
        assert!(!window.is_draining());
        assert_eq!(window.front().unwrap().to_string(), "..#");
        assert_eq!(window.back().unwrap().to_string(), ".#.");
    }

    #[test]
    fn test_prime_short_stream() {
        let mut stream = rows(&["..#"]).into_iter();
        let mut window = LookaheadWindow::new(5);

        assert_eq!(window.prime(&mut stream), 1);
        assert!(window.is_draining());
    }

    #[test]
    fn test_advance_then_drain() {
        let mut stream = rows(&["..#", "#..", "FFF"]).into_iter();
        let mut window = LookaheadWindow::new(2);
        window.prime(&mut stream);

        let consumed = window.advance(stream.next()).unwrap();
        assert_eq!(consumed.to_string(), "..#");
        assert_eq!(window.len(), 2);

        window.advance(stream.next());
        assert!(window.is_draining());
        assert_eq!(window.len(), 1);

        window.advance(stream.next());
        assert!(window.is_empty());
        assert!(window.advance(None).is_none());
    }

    #[test]
    fn test_rows_slice_survives_wraparound() {
        let lines: Vec<String> = (0..20)
            .map(|i| format!("{:03b}", i % 8).replace('0', ".").replace('1', "#"))
            .collect();
        let mut stream = lines.iter().map(|line| line.parse::<Row>().unwrap());
        let mut window = LookaheadWindow::new(3);
        window.prime(&mut stream);

        for tick in 0..17 {
            assert_eq!(window.rows().len(), 3);
            assert_eq!(window.rows()[0].to_string(), lines[tick]);
            assert_eq!(window.rows()[2].to_string(), lines[tick + 2]);
            window.advance(stream.next());
        }
    }

    #[test]
    fn test_zero_depth_is_one() {
        assert_eq!(LookaheadWindow::new(0).depth(), 1);
    }
}
