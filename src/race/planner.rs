//! Planners
//!
//! The engine asks a [`Planner`] for one steer per tick. Any implementation
//! can be plugged in: the bounded search below, a recorded-input replay
//! (see `race::replay`), or a plain closure.
//!
//! ## Lookahead search
//!
//! Exhaustive walk of the ternary move tree down to the horizon `D`:
//!
//! ```text
//!            column
//!        ┌─────┼─────┐
//!      Left   Stay  Right        depth 0 -> window[0]
//!      / | \  / | \  / | \
//!                                depth 1 -> window[1]
//!                ...             depth D-1
//! ```
//!
//! A branch is pruned as soon as it leaves `[0, W)` or lands on an obstacle
//! in the row of its depth. Lateral moves cost 1, `Stay` costs 0. At most
//! `3^D` nodes are visited per decision.

use thiserror::Error;

use crate::race::moves::Move;
use crate::track::cell::Row;

/// Planner failure. The engine coerces it to `Stay` and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerFault {
    /// The planner could not produce a decision.
    #[error("planner failed: {0}")]
    Failed(String),

    /// A replayed recording has no move for this tick.
    #[error("recorded path exhausted at tick {tick}")]
    ReplayExhausted {
        /// Zero-based tick that had no recorded move.
        tick: u32,
    },
}

/// Chooses a steer from the current window and column.
///
/// `window[0]` is the row the car enters this tick. A steer outside
/// `{-1, 0, +1}` is treated by the engine as `Stay`.
pub trait Planner {
    /// Decide the steer for this tick.
    fn decide(&mut self, window: &[Row], column: usize) -> Result<i8, PlannerFault>;
}

impl<F> Planner for F
where
    F: FnMut(&[Row], usize) -> Result<i8, PlannerFault>,
{
    fn decide(&mut self, window: &[Row], column: usize) -> Result<i8, PlannerFault> {
        self(window, column)
    }
}

/// Bounded-depth search minimizing lateral movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookaheadPlanner {
    horizon: usize,
}

impl Default for LookaheadPlanner {
    fn default() -> Self {
        Self::new(crate::DEFAULT_HORIZON)
    }
}

impl LookaheadPlanner {
    /// Create a planner searching `horizon` rows deep (at least 1).
    pub fn new(horizon: usize) -> Self {
        Self {
            horizon: horizon.max(1),
        }
    }

    /// Search depth (D).
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Minimal cumulative cost for each first move, in [`Move::ALL`] order.
    ///
    /// `None` means the first move has no collision-free continuation over
    /// the effective horizon `min(D, window.len())`.
    pub fn evaluate(&self, window: &[Row], column: usize) -> [Option<u32>; 3] {
        let mut costs = [None; 3];
        let Some(nearest) = window.first() else {
            return costs;
        };

        let width = nearest.width();
        let limit = self.horizon.min(window.len());

        for (slot, first) in costs.iter_mut().zip(Move::ALL) {
            *slot = first
                .apply(column, width)
                .filter(|&next| !nearest.blocked(next))
                .and_then(|next| cheapest_continuation(window, limit, 1, next))
                .map(|rest| rest + first.cost());
        }
        costs
    }

    /// Choose the first move of the cheapest surviving path.
    ///
    /// Ties prefer `Stay`, then the column closest to `(W - 1) / 2`; equal
    /// distances keep the earlier move in search order. With an empty window
    /// or no surviving first move, returns `Stay`.
    pub fn choose(&self, window: &[Row], column: usize) -> Move {
        let Some(nearest) = window.first() else {
            return Move::Stay;
        };
        let width = nearest.width();

        let mut best: Option<(Move, u32)> = None;
        for (first, cost) in Move::ALL.into_iter().zip(self.evaluate(window, column)) {
            let Some(cost) = cost else {
                continue;
            };
            let better = match best {
                None => true,
                Some((current, current_cost)) => {
                    is_better(first, cost, current, current_cost, column, width)
                }
            };
            if better {
                best = Some((first, cost));
            }
        }

        best.map(|(first, _)| first).unwrap_or(Move::Stay)
    }
}

impl Planner for LookaheadPlanner {
    fn decide(&mut self, window: &[Row], column: usize) -> Result<i8, PlannerFault> {
        Ok(self.choose(window, column).steer())
    }
}

/// Cheapest cost from `depth` onwards, or `None` if every branch collides.
fn cheapest_continuation(window: &[Row], limit: usize, depth: usize, column: usize) -> Option<u32> {
    if depth >= limit {
        return Some(0);
    }

    let row = &window[depth];
    let width = row.width();

    Move::ALL
        .into_iter()
        .filter_map(|mv| {
            let next = mv.apply(column, width).filter(|&next| !row.blocked(next))?;
            cheapest_continuation(window, limit, depth + 1, next).map(|rest| rest + mv.cost())
        })
        .min()
}

/// Whether `candidate` beats `current` under the tie-break rules.
fn is_better(
    candidate: Move,
    candidate_cost: u32,
    current: Move,
    current_cost: u32,
    column: usize,
    width: usize,
) -> bool {
    if candidate_cost != current_cost {
        return candidate_cost < current_cost;
    }
    if candidate == Move::Stay || current == Move::Stay {
        return candidate == Move::Stay;
    }

    // Distances doubled to stay in integers: |2x - (W - 1)|
    let centre = width.saturating_sub(1);
    let distance = |mv: Move| (mv.apply_clamped(column, width) * 2).abs_diff(centre);
    distance(candidate) < distance(current)
}

// =============================================================================
// TESTS
// =============================================================================
