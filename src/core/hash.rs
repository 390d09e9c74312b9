//! Track Fingerprints
//!
//! Deterministic hashing of decoded tracks for:
//! - Logging which track a run was made against
//! - Replay validation of recorded runs

use sha2::{Sha256, Digest};

use crate::track::grid::TrackGrid;

/// Hash output type (256 bits / 32 bytes)
pub type TrackHash = [u8; 32];

/// Deterministic hasher with a domain separator.
///
/// Order of updates is critical for determinism.
pub struct TrackHasher {
    hasher: Sha256,
}

impl TrackHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for track grids.
    pub fn for_track() -> Self {
        Self::new(b"ROADBYTE_TRACK_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> TrackHash {
        self.hasher.finalize().into()
    }
}

/// Fingerprint a decoded track.
///
/// Covers width, row count and the concatenated payload, so two grids with
/// the same payload but different widths hash differently.
pub fn track_fingerprint(grid: &TrackGrid) -> TrackHash {
    let mut hasher = TrackHasher::for_track();
    hasher.update_u32(grid.width() as u32);
    hasher.update_u32(grid.len() as u32);
    hasher.update_bytes(&grid.payload());
    hasher.finalize()
}
