//! Runner Configuration
//!
//! JSON file layout, every field optional:
//!
//! ```json
//! {
//!   "track": { "seed": 41017, "width": null, "candidate_widths": [10, 13, 16] },
//!   "race": { "lookahead": 5, "horizon": 5, "start_column": 2,
//!             "scoring": "movements", "collision": "front_of_window" }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::race::planner::LookaheadPlanner;
use crate::race::result::{CollisionMode, ScoringMode};
use crate::track::codec::{WidthHint, DEFAULT_CANDIDATE_WIDTHS};
use crate::track::loader::TrackLoader;
use crate::{DEFAULT_HORIZON, DEFAULT_LOOKAHEAD, DEFAULT_SEED, DEFAULT_START_COLUMN};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
/// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

/// The file is not a valid runner config.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How tracks are decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Seed paired with the track set.
    pub seed: u64,
    /// Explicit row width; wins over any inference.
    pub width: Option<usize>,
    /// Widths tried by divisibility when none is known.
    pub candidate_widths: Vec<usize>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            width: None,
            candidate_widths: DEFAULT_CANDIDATE_WIDTHS.to_vec(),
        }
    }
}

impl TrackConfig {
    /// Explicit width if set, otherwise the candidate list.
    pub fn width_hint(&self) -> WidthHint {
        match self.width {
            Some(width) => WidthHint::Explicit(width),
            None => WidthHint::Candidates(self.candidate_widths.clone()),
        }
    }

    /// Track loader for this seed and width hint.
    pub fn loader(&self) -> TrackLoader {
        TrackLoader::new(self.seed, self.width_hint())
    }
}

/// How a race is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Window depth (H).
    pub lookahead: usize,
    /// Planner search depth (D).
    pub horizon: usize,
    /// Starting column; out of range falls back to the middle.
    pub start_column: usize,
    /// What the score counts.
    pub scoring: ScoringMode,
    /// Which row a move is checked against.
    pub collision: CollisionMode,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            horizon: DEFAULT_HORIZON,
            start_column: DEFAULT_START_COLUMN,
            scoring: ScoringMode::default(),
            collision: CollisionMode::default(),
        }
    }
}

impl RaceConfig {
    /// Search planner at the configured horizon.
    pub fn planner(&self) -> LookaheadPlanner {
        LookaheadPlanner::new(self.horizon)
    }
}

/// Top-level runner configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Track decoding.
    pub track: TrackConfig,
    /// Race driving.
    pub race: RaceConfig,
}

impl RunnerConfig {
    /// Load from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Parse from JSON text. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.track.seed, 41017);
        assert_eq!(config.track.candidate_widths, vec![10, 13, 16]);
        assert_eq!(config.race.lookahead, 5);
        assert_eq!(config.race.horizon, 5);
        assert_eq!(config.race.start_column, 2);
        assert_eq!(config.race.scoring, ScoringMode::Movements);
        assert_eq!(config.race.collision, CollisionMode::FrontOfWindow);
    }

    #[test]
    fn test_partial_json() {
        let config = RunnerConfig::from_json(
            r#"{ "track": { "width": 13 }, "race": { "scoring": "dodges", "collision": "delayed" } }"#,
        )
        .unwrap();

        assert_eq!(config.track.seed, 41017);
        assert_eq!(config.track.width_hint(), WidthHint::Explicit(13));
        assert_eq!(config.race.scoring, ScoringMode::Dodges);
        assert_eq!(config.race.collision, CollisionMode::Delayed);
        assert_eq!(config.race.horizon, 5);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(RunnerConfig::from_json("{}").unwrap(), RunnerConfig::default());
    }

    #[test]
    fn test_width_hint_candidates() {
        let config = TrackConfig::default();
        assert_eq!(config.width_hint(), WidthHint::Candidates(vec![10, 13, 16]));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            RunnerConfig::from_json(r#"{ "race": { "scoring": "laps" } }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runner.json");
        fs::write(&path, r#"{ "race": { "horizon": 8 } }"#).unwrap();

        assert_eq!(RunnerConfig::from_path(&path).unwrap().race.horizon, 8);
        assert!(matches!(
            RunnerConfig::from_path(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
