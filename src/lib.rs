//! # Roadbyte Racer
//!
//! Track codec, lookahead navigation engine and search planner.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ROADBYTE RACER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - MT19937 keystream, track key derivation   │
//! │  └── hash.rs     - SHA-256 track fingerprints                │
//! │                                                              │
//! │  track/          - Track assets                              │
//! │  ├── cell.rs     - Cell alphabet and rows                    │
//! │  ├── grid.rs     - Rectangular grid, plaintext format        │
//! │  ├── codec.rs    - Encrypted format (XOR keystream + zlib)   │
//! │  ├── stream.rs   - Forward-only row stream                   │
//! │  ├── loader.rs   - File loading, width discovery             │
//! │  └── error.rs    - Decoding errors                           │
//! │                                                              │
//! │  race/           - Simulation (deterministic)                │
//! │  ├── moves.rs    - Moves and steer normalization             │
//! │  ├── window.rs   - Lookahead window                          │
//! │  ├── planner.rs  - Planner boundary, lookahead search        │
//! │  ├── engine.rs   - Tick loop, collision, scoring             │
//! │  ├── result.rs   - Outcomes and results                      │
//! │  └── replay.rs   - Recorded-path replay and verification     │
//! │                                                              │
//! │  config.rs       - Runner configuration (JSON)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Decoding is a pure function of `(asset, seed, filename)` and a race is a
//! pure function of `(grid, planner, config)`:
//! - Each decode derives its own keystream generator; nothing is shared
//! - The search planner has no randomness and fixed tie-breaks
//! - Faults never abort a race; they degrade to `Stay`
//!
//! Given the same inputs the simulation produces identical results on
//! any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod track;
pub mod race;
pub mod config;

// Re-export commonly used types
pub use crate::core::rng::{Mt19937, Keystream, derive_track_key};
pub use crate::core::hash::{TrackHash, track_fingerprint};
pub use track::{Cell, Row, TrackGrid, TrackCodec, TrackLoader, WidthHint, TrackError, FormatError};
pub use race::{
    Move, Planner, LookaheadPlanner, PlannerFault, NavigationEngine, Outcome, ScoringMode,
    CollisionMode, SimulationResult, RaceRecord, verify_record, run_race,
};
pub use config::{RunnerConfig, TrackConfig, RaceConfig, ConfigError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seed paired with the stock track set
pub const DEFAULT_SEED: u64 = 41017;

/// Rows visible to the planner (H)
pub const DEFAULT_LOOKAHEAD: usize = 5;

/// Planner search depth (D)
pub const DEFAULT_HORIZON: usize = 5;

/// Starting column of the car
pub const DEFAULT_START_COLUMN: usize = 2;
