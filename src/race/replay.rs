//! Replay and Verification
//!
//! A [`RaceRecord`] pins one run to the exact track it was driven on.
//! [`verify_record`] re-drives the recorded path through a fresh engine
//! and reports the first divergence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RaceConfig;
use crate::core::hash::track_fingerprint;
use crate::race::engine::run_race;
use crate::race::moves::Move;
use crate::race::planner::{Planner, PlannerFault};
use crate::race::result::{Outcome, SimulationResult};
use crate::track::cell::Row;
use crate::track::grid::TrackGrid;

/// Planner that replays a recorded path.
///
/// Past the end of the recording it faults, which the engine turns into `Stay`.
#[derive(Clone, Debug)]
pub struct ReplayPlanner {
    path: Vec<Move>,
    cursor: usize,
}

impl ReplayPlanner {
    /// Replay `path` from its first move.
    pub fn new(path: Vec<Move>) -> Self {
        Self { path, cursor: 0 }
    }

    /// Moves not replayed yet.
    pub fn remaining(&self) -> usize {
        self.path.len().saturating_sub(self.cursor)
    }
}

impl Planner for ReplayPlanner {
    fn decide(&mut self, _window: &[Row], _column: usize) -> Result<i8, PlannerFault> {
        let tick = self.cursor;
        self.cursor += 1;
        self.path
            .get(tick)
            .map(|mv| mv.steer())
            .ok_or(PlannerFault::ReplayExhausted { tick: tick as u32 })
    }
}

/// Serializable record of one race.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceRecord {
    /// Hex SHA-256 fingerprint of the track.
    pub track_fingerprint: String,
    /// Settings the race was driven with.
    pub config: RaceConfig,
    /// Result as recorded.
    pub result: SimulationResult,
}

impl RaceRecord {
    /// Record `result`, fingerprinting `grid`.
    pub fn new(grid: &TrackGrid, config: RaceConfig, result: SimulationResult) -> Self {
        Self {
            track_fingerprint: hex::encode(track_fingerprint(grid)),
            config,
            result,
        }
    }
}

/// Why a record failed to verify.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReplayMismatch {
    /// The record was made on a different track.
    #[error("track fingerprint mismatch: recorded {expected}, got {computed}")]
    TrackMismatch {
        /// Recorded fingerprint.
        expected: String,
        /// Fingerprint of the supplied track.
        computed: String,
    },

    /// The replayed path diverged.
    #[error("path diverges at tick {tick}")]
    PathMismatch {
        /// First tick (zero-based) where the paths differ.
        tick: usize,
    },

/// Same path, different outcome.
    #[error("outcome mismatch: recorded {expected}, replayed {replayed}")]
    OutcomeMismatch {
        /// Recorded outcome.
        expected: Outcome,
        /// Outcome of the replay.
        replayed: Outcome,
    },

/// Same path and outcome, different score.
    #[error("score mismatch: recorded {expected}, replayed {replayed}")]
    ScoreMismatch {
        /// Recorded score.
        expected: u32,
        /// Score of the replay.
        replayed: u32,
    },
}

/// Re-drive a recorded race and check it matches.
///
/// Returns the replayed result on success.
pub fn verify_record(grid: &TrackGrid, record: &RaceRecord) -> Result<SimulationResult, ReplayMismatch> {
    let computed = hex::encode(track_fingerprint(grid));
    if !computed.eq_ignore_ascii_case(&record.track_fingerprint) {
        return Err(ReplayMismatch::TrackMismatch {
            expected: record.track_fingerprint.clone(),
            computed,
        });
    }

    let expected = &record.result;
    let planner = ReplayPlanner::new(expected.path.clone());
    let replayed = run_race(grid, planner, &record.config);

    if replayed.path != expected.path {
        let tick = replayed
            .path
            .iter()
            .zip(&expected.path)
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| replayed.path.len().min(expected.path.len()));
        return Err(ReplayMismatch::PathMismatch { tick });
    }
    if replayed.outcome != expected.outcome {
        return Err(ReplayMismatch::OutcomeMismatch {
            expected: expected.outcome,
            replayed: replayed.outcome,
        });
    }
    if replayed.score != expected.score {
        return Err(ReplayMismatch::ScoreMismatch {
            expected: expected.score,
            replayed: replayed.score,
        });
    }

    Ok(replayed)
}
