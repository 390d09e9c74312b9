//! Core deterministic primitives.
//!
//! The keystream generator and track fingerprinting. Both are pure
//! functions of their inputs on every platform.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::{Mt19937, Keystream, derive_track_key};
pub use hash::{TrackHash, track_fingerprint};
