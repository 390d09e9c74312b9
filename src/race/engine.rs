//! Navigation Engine
//!
//! Drives the car through a row stream, one row per tick.
//!
//! ```text
//!   Priming ──► Running ──► Crashed
//!      │           ├──────► Finished
//!      └───────────┴──────► Exhausted
//! ```
//!
//! Each running tick:
//! 1. Ask the planner for a steer (faults and out-of-range values become `Stay`)
//! 2. Apply it, clamped to `[0, W)`
//! 3. Resolve the entered cell (see [`CollisionMode`])
//! 4. Scroll the window
//!
//! Every tick consumes one stream row, so a run over `N` rows ends within
//! `N` ticks whatever the planner does.

use tracing::{debug, info, warn};

use crate::config::RaceConfig;
use crate::race::moves::Move;
use crate::race::planner::Planner;
use crate::race::result::{CollisionMode, Outcome, ScoringMode, SimulationResult};
use crate::race::window::LookaheadWindow;
use crate::track::cell::{Cell, Row};
use crate::track::grid::TrackGrid;

/// Engine lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    /// Window not filled yet.
    Priming,
    /// Ticking.
    Running,
    /// Hit an obstacle (terminal).
    Crashed,
    /// Reached a finish cell (terminal).
    Finished,
    /// Ran out of rows (terminal).
    Exhausted,
}

impl EnginePhase {
    /// Crashed, finished or exhausted.
    pub fn is_terminal(self) -> bool {
        self.outcome().is_some()
    }

    /// Outcome of a terminal phase.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            EnginePhase::Crashed => Some(Outcome::Crashed),
            EnginePhase::Finished => Some(Outcome::Finished),
            EnginePhase::Exhausted => Some(Outcome::Exhausted),
            EnginePhase::Priming | EnginePhase::Running => None,
        }
    }
}

impl From<Outcome> for EnginePhase {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Crashed => EnginePhase::Crashed,
            Outcome::Finished => EnginePhase::Finished,
            Outcome::Exhausted => EnginePhase::Exhausted,
        }
    }
}

/// What happened on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Ticks executed so far.
    pub tick: u32,
    /// Move applied this tick (`None` once terminal).
    pub applied: Option<Move>,
    /// Column after the tick.
    pub column: usize,
    /// Phase after the tick.
    pub phase: EnginePhase,
}

/// Single-car simulation over a row stream.
pub struct NavigationEngine<S, P> {
    stream: S,
    planner: P,
    window: LookaheadWindow,
    phase: EnginePhase,
    collision: CollisionMode,
    scoring: ScoringMode,
    width: usize,
    column: usize,
    tick: u32,
    movements: u32,
    dodges: u32,
    path: Vec<Move>,
}

impl<S, P> NavigationEngine<S, P>
where
    S: Iterator<Item = Row>,
    P: Planner,
{
    /// Create an engine over `stream`, consulting `planner` every tick.
    ///
    /// Rows are expected to share the width of the first row.
    pub fn new(stream: S, planner: P, config: &RaceConfig) -> Self {
        Self {
            stream,
            planner,
            window: LookaheadWindow::new(config.lookahead),
            phase: EnginePhase::Priming,
            collision: config.collision,
            scoring: config.scoring,
            width: 0,
            column: config.start_column,
            tick: 0,
            movements: 0,
            dodges: 0,
            path: Vec::new(),
        }
    }

    /// Fill the lookahead window.
    ///
    /// Called by the first [`tick`](Self::tick) if not called explicitly.
    pub fn prime(&mut self) -> EnginePhase {
        if self.phase != EnginePhase::Priming {
            return self.phase;
        }

        let pulled = self.window.prime(&mut self.stream);
        let width = self.window.front().map_or(0, Row::width);
        debug!(pulled, width, depth = self.window.depth(), "window primed");

        if width == 0 {
            return self.finish(Outcome::Exhausted);
        }

        self.width = width;
        if self.column >= width {
            let fallback = width / 2;
            warn!(start = self.column, width, fallback, "start column out of range");
            self.column = fallback;
        }

        if self.collision == CollisionMode::Delayed && !self.window.is_full() {
            debug!(pulled, "stream shorter than the window");
            return self.finish(Outcome::Exhausted);
        }

        self.phase = EnginePhase::Running;
        self.phase
    }

    /// Run one tick.
    pub fn tick(&mut self) -> TickReport {
        if self.phase == EnginePhase::Priming {
            self.prime();
        }
        if self.phase.is_terminal() {
            return self.report(None);
        }

        let applied = self.consult_planner();
        self.tick += 1;
        self.path.push(applied);
        if applied.is_lateral() {
            self.movements += 1;
        }
        self.column = applied.apply_clamped(self.column, self.width);

        debug!(tick = self.tick, %applied, column = self.column, "tick");

        match self.collision {
            CollisionMode::FrontOfWindow => self.resolve_front(),
            CollisionMode::Delayed => self.resolve_delayed(),
        }

        self.report(Some(applied))
    }

    /// Tick until a terminal phase and return the result.
    pub fn run(mut self) -> SimulationResult {
        while !self.phase.is_terminal() {
            self.tick();
        }
        self.build_result()
    }

    /// Result of a finished run, `None` while still running.
    pub fn result(&self) -> Option<SimulationResult> {
        self.phase.is_terminal().then(|| self.build_result())
    }

    /// Current phase.
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Current column.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Ticks executed so far.
    pub fn ticks(&self) -> u32 {
        self.tick
    }

    /// Current value of the selected counter.
    pub fn score(&self) -> u32 {
        match self.scoring {
            ScoringMode::Movements => self.movements,
            ScoringMode::Dodges => self.dodges,
        }
    }

    /// Coerced moves applied so far, one per tick.
    pub fn path(&self) -> &[Move] {
        &self.path
    }

    /// Rows currently visible to the planner.
    pub fn window(&self) -> &LookaheadWindow {
        &self.window
    }

    /// Ask the planner, coercing faults and invalid steers to `Stay`.
    fn consult_planner(&mut self) -> Move {
        match self.planner.decide(self.window.rows(), self.column) {
            Ok(steer) => Move::from_steer(steer).unwrap_or_else(|| {
                warn!(tick = self.tick, steer, "steer out of range, staying");
                Move::Stay
            }),
            Err(fault) => {
                warn!(tick = self.tick, %fault, "planner fault, staying");
                Move::Stay
            }
        }
    }

    /// Enter the nearest row, then scroll.
    fn resolve_front(&mut self) {
        let Some(entered) = self.window.front().map(|row| self.inspect(row)) else {
            self.finish(Outcome::Exhausted);
            return;
        };
        if self.enter(entered).is_some() {
            return;
        }

        let next = self.pull();
        self.window.advance(next);
        if self.window.is_empty() {
            self.finish(Outcome::Exhausted);
        }
    }

    /// Drop the next row in, then check the farthest visible row.
    fn resolve_delayed(&mut self) {
        let Some(next) = self.pull() else {
            self.finish(Outcome::Exhausted);
            return;
        };
        let Some(entered) = self.window.back().map(|row| self.inspect(row)) else {
            self.finish(Outcome::Exhausted);
            return;
        };
        if self.enter(entered).is_some() {
            return;
        }

        self.window.advance(Some(next));
    }

    /// Cell under the car and whether its row holds an obstacle.
    fn inspect(&self, row: &Row) -> (Option<Cell>, bool) {
        (row.get(self.column), row.has_obstacle())
    }

    /// Apply the cell rules to an entered row.
    fn enter(&mut self, (cell, has_obstacle): (Option<Cell>, bool)) -> Option<Outcome> {
        if cell == Some(Cell::Obstacle) {
            self.finish(Outcome::Crashed);
            return Some(Outcome::Crashed);
        }

        if has_obstacle {
            self.dodges += 1;
        }
        if cell == Some(Cell::Finish) {
            self.finish(Outcome::Finished);
            return Some(Outcome::Finished);
        }
        None
    }

    fn pull(&mut self) -> Option<Row> {
        if self.window.is_draining() {
            return None;
        }
        self.stream.next()
    }

    fn finish(&mut self, outcome: Outcome) -> EnginePhase {
        self.phase = outcome.into();
        info!(
            %outcome,
            ticks = self.tick,
            column = self.column,
            movements = self.movements,
            dodges = self.dodges,
            "race over"
        );
        self.phase
    }

    fn report(&self, applied: Option<Move>) -> TickReport {
        TickReport {
            tick: self.tick,
            applied,
            column: self.column,
            phase: self.phase,
        }
    }

    fn build_result(&self) -> SimulationResult {
        SimulationResult {
            outcome: self.phase.outcome().unwrap_or(Outcome::Exhausted),
            score: self.score(),
            scoring: self.scoring,
            path: self.path.clone(),
            ticks: self.tick,
            final_column: self.column,
        }
    }
}

/// Race a decoded grid from its first row.
pub fn run_race<P: Planner>(grid: &TrackGrid, planner: P, config: &RaceConfig) -> SimulationResult {
    NavigationEngine::new(grid.stream(), planner, config).run()
}

// =============================================================================
// TESTS
// =============================================================================
