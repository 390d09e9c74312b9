//! Race outcomes and the terminal result record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::race::moves::Move;

/// How a race ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The car entered an obstacle cell.
    Crashed,
    /// The car entered a finish cell.
    Finished,
    /// The stream ran out before a crash or finish.
    Exhausted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Crashed => "crashed",
            Outcome::Finished => "finished",
            Outcome::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

/// Which counter the score reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// One point per lateral move, regardless of row contents.
    #[default]
    Movements,
    /// One point per survived row containing an obstacle.
    Dodges,
}

/// Which row is checked against the car on each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// The nearest row, entered right after the move.
    #[default]
    FrontOfWindow,
    /// The farthest visible row, checked once the next row has dropped in.
    Delayed,
}

/// Terminal record of one race.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// How the race ended.
    pub outcome: Outcome,
    /// Movements or dodges, depending on `scoring`.
    pub score: u32,
    /// What `score` counts.
    pub scoring: ScoringMode,
    /// Coerced move of every executed tick.
    pub path: Vec<Move>,
    /// Ticks run.
    pub ticks: u32,
    /// Column of the car when the race ended.
    pub final_column: usize,
}

impl SimulationResult {
    /// Number of lateral moves in the path.
    pub fn lateral_moves(&self) -> usize {
        self.path.iter().filter(|mv| mv.is_lateral()).count()
    }

    /// True when the car reached a finish row.
    pub fn is_finished(&self) -> bool {
        self.outcome == Outcome::Finished
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.scoring {
            ScoringMode::Movements => "movements",
            ScoringMode::Dodges => "dodges",
        };
        write!(
            f,
            "{} after {} ticks at column {} ({}: {})",
            self.outcome, self.ticks, self.final_column, label, self.score
        )
    }
}
