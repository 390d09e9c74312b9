//! Race Module
//!
//! Drives a car through a decoded track.
//!
//! ## Module Structure
//!
//! - `moves`: Moves and raw steer normalization
//! - `window`: Lookahead window of upcoming rows
//! - `planner`: Planner boundary and bounded lookahead search
//! - `engine`: Tick loop, collision and scoring
//! - `result`: Outcomes and the terminal record
//! - `replay`: Recorded-path replay and verification

pub mod moves;
pub mod window;
pub mod planner;
pub mod engine;
pub mod result;
pub mod replay;

// Re-export key types
pub use moves::Move;
pub use window::LookaheadWindow;
pub use planner::{Planner, LookaheadPlanner, PlannerFault};
pub use engine::{NavigationEngine, EnginePhase, TickReport, run_race};
pub use result::{Outcome, ScoringMode, CollisionMode, SimulationResult};
pub use replay::{ReplayPlanner, RaceRecord, ReplayMismatch, verify_record};
