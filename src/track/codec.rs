//! Track Codec
//!
//! Encrypted asset layout:
//!
//! ```text
//! ┌──────────────────────────────┬───────────────────────────────────┐
//! │ bytes [0..4)                 │ bytes [4..end)                    │
//! │ u32 LE payload length        │ zlib(payload, level 9)            │
//! └──────────────────────────────┴───────────────────────────────────┘
//!        whole buffer XORed with the keystream of derive_track_key()
//! ```
//!
//! `payload` is every row's symbols concatenated with no separators, so the
//! width has to come from the caller or be inferred from candidate widths.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::rng::{derive_track_key, Keystream};
use crate::track::error::{FormatError, TrackError};
use crate::track::grid::TrackGrid;

/// Size of the XORed length header.
pub const HEADER_LEN: usize = 4;

/// Widths tried, in order, when none is supplied.
pub const DEFAULT_CANDIDATE_WIDTHS: [usize; 3] = [10, 13, 16];

/// How the decoder learns the row width of a separator-free payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthHint {
    /// Width supplied by the caller.
    Explicit(usize),
    /// Ordered candidates tested by even divisibility of the payload length.
    Candidates(Vec<usize>),
}

impl Default for WidthHint {
    fn default() -> Self {
        WidthHint::Candidates(DEFAULT_CANDIDATE_WIDTHS.to_vec())
    }
}

/// Pick the row width for a payload of `len` bytes.
///
/// An explicit width is used as-is (the split checks divisibility). With
/// candidates, exactly one must divide `len`; zero or several is an error.
pub fn resolve_width(len: usize, hint: &WidthHint) -> Result<usize, TrackError> {
    match hint {
        WidthHint::Explicit(width) => Ok(*width),
        WidthHint::Candidates(candidates) => {
            let matching: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&w| w != 0 && len % w == 0)
                .collect();

            match matching.as_slice() {
                [width] => Ok(*width),
                _ => Err(TrackError::AmbiguousWidth {
                    len,
                    candidates: candidates.clone(),
                    matching,
                }),
            }
        }
    }
}

/// Encrypts and decrypts track assets for one seed.
///
/// A fresh keystream is derived for every call; the codec holds no
/// generator state between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackCodec {
    seed: u64,
}

impl TrackCodec {
    /// Create a codec for the seed paired with a track set.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed the keystream is keyed with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Recover the raw payload from an encrypted asset.
    pub fn decrypt_payload(&self, asset: &[u8], filename: &str) -> Result<Vec<u8>, TrackError> {
        if asset.len() < HEADER_LEN {
            return Err(FormatError::TruncatedHeader { actual: asset.len() }.into());
        }

        let mut keystream = Keystream::new(derive_track_key(self.seed, filename));

        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&asset[..HEADER_LEN]);
        keystream.apply(&mut header);
        let declared = u32::from_le_bytes(header);

        let mut compressed = asset[HEADER_LEN..].to_vec();
        keystream.apply(&mut compressed);

        // Never inflate more than one byte past the declared length
        let mut payload = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .take(u64::from(declared) + 1)
            .read_to_end(&mut payload)
            .map_err(FormatError::Inflate)?;

        if payload.len() != declared as usize {
            return Err(FormatError::LengthMismatch {
                declared,
                actual: payload.len(),
            }
            .into());
        }

        debug!(
            declared,
            compressed_len = compressed.len(),
            "decrypted track payload"
        );
        Ok(payload)
    }

    /// Decode an encrypted asset into a grid.
    pub fn decode(
        &self,
        asset: &[u8],
        filename: &str,
        width: &WidthHint,
    ) -> Result<TrackGrid, TrackError> {
        let payload = self.decrypt_payload(asset, filename)?;
        let width = resolve_width(payload.len(), width)?;
        debug!(width, rows = payload.len() / width.max(1), "split track payload");
        TrackGrid::from_payload(&payload, width)
    }

    /// Encode a grid into an encrypted asset.
    ///
    /// The width is not stored; decoders must be told it or infer it.
    pub fn encode(&self, grid: &TrackGrid, filename: &str) -> Result<Vec<u8>, TrackError> {
        let payload = grid.payload();
        let declared = u32::try_from(payload.len())
            .map_err(|_| FormatError::PayloadTooLarge { len: payload.len() })?;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&payload)?;
        let compressed = encoder.finish()?;

        let mut asset = Vec::with_capacity(HEADER_LEN + compressed.len());
        asset.extend_from_slice(&declared.to_le_bytes());
        asset.extend_from_slice(&compressed);

        Keystream::new(derive_track_key(self.seed, filename)).apply(&mut asset);
        Ok(asset)
    }
}

/// Decode the plaintext variant from raw file bytes.
pub fn decode_plaintext(bytes: &[u8]) -> Result<TrackGrid, TrackError> {
    TrackGrid::parse_plaintext_bytes(bytes)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Stock assets (zlib level 9, MT19937 keystream)
    const DEMO_ASSET: &str = "9b4cad0b6fe3bcb369294f1b6e053b3ff4b6ec3c2f20";
    const TRK_41017_ASSET: &str = "9200dcb6f44275144bec290a7e1cfe289e16b0849eff95e5";

    fn demo_grid() -> TrackGrid {
        TrackGrid::parse_plaintext("....#\n..#..\n.....\nFFFFF\n").unwrap()
    }

    #[test]
    fn test_decode_reference_asset_explicit_width() {
        let asset = hex::decode(DEMO_ASSET).unwrap();
        let grid = TrackCodec::new(7)
            .decode(&asset, "demo.trk.enc", &WidthHint::Explicit(5))
            .unwrap();
        assert_eq!(grid, demo_grid());
    }

    #[test]
    fn test_decode_reference_asset_candidate_width() {
        let asset = hex::decode(TRK_41017_ASSET).unwrap();
        let grid = TrackCodec::new(41017)
            .decode(&asset, "TRK_41017.trk.enc", &WidthHint::default())
            .unwrap();

        assert_eq!(grid.width(), 10);
        assert_eq!(
            grid.to_plaintext(),
            "..#.......\n....#.....\n#........#\nFFFFFFFFFF\n"
        );
    }

    #[test]
    fn test_decode_wrong_seed_fails() {
        let asset = hex::decode(DEMO_ASSET).unwrap();
        let result = TrackCodec::new(8).decode(&asset, "demo.trk.enc", &WidthHint::Explicit(5));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_wrong_filename_fails() {
        let asset = hex::decode(DEMO_ASSET).unwrap();
        let result = TrackCodec::new(7).decode(&asset, "other.trk.enc", &WidthHint::Explicit(5));
        assert!(result.is_err());
    }

    #[test]
    fn test_truncated_header() {
        let result = TrackCodec::new(7).decrypt_payload(&[1, 2, 3], "demo.trk.enc");
        assert!(matches!(
            result,
            Err(TrackError::Format(FormatError::TruncatedHeader { actual: 3 }))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let codec = TrackCodec::new(7);
        let mut asset = codec.encode(&demo_grid(), "demo.trk.enc").unwrap();

        // Flip the declared length from 20 to 21 through the keystream
        asset[0] ^= 20 ^ 21;

        let result = codec.decrypt_payload(&asset, "demo.trk.enc");
        assert!(matches!(
            result,
            Err(TrackError::Format(FormatError::LengthMismatch { declared: 21, actual: 20 }))
        ));
    }

    #[test]
    fn test_oversized_payload_is_capped() {
        let codec = TrackCodec::new(7);
        let mut asset = codec.encode(&demo_grid(), "demo.trk.enc").unwrap();

        // Declare 2 bytes: inflation stops at 3 rather than reading all 20
        asset[0] ^= 20 ^ 2;

        let result = codec.decrypt_payload(&asset, "demo.trk.enc");
        assert!(matches!(
            result,
            Err(TrackError::Format(FormatError::LengthMismatch { declared: 2, actual: 3 }))
        ));
    }

    #[test]
    fn test_corrupt_body_fails_to_inflate() {
        let codec = TrackCodec::new(7);
        let mut asset = codec.encode(&demo_grid(), "demo.trk.enc").unwrap();
        asset[4] ^= 0xFF;

        let result = codec.decrypt_payload(&asset, "demo.trk.enc");
        assert!(matches!(result, Err(TrackError::Format(FormatError::Inflate(_)))));
    }

    #[test]
    fn test_resolve_width() {
        // Exactly one candidate divides each length
        assert_eq!(resolve_width(20, &WidthHint::default()).unwrap(), 10);
        assert_eq!(resolve_width(169, &WidthHint::default()).unwrap(), 13);
        assert_eq!(resolve_width(48, &WidthHint::default()).unwrap(), 16);
        assert_eq!(resolve_width(7, &WidthHint::Explicit(7)).unwrap(), 7);

        // 130 = 13 * 10 = 10 * 13
        assert!(matches!(
            resolve_width(130, &WidthHint::default()),
            Err(TrackError::AmbiguousWidth { len: 130, .. })
        ));
    }

    #[test]
    fn test_resolve_width_ambiguous() {
        // 80 = 8 * 10 = 5 * 16
        match resolve_width(80, &WidthHint::default()) {
            Err(TrackError::AmbiguousWidth { len, matching, .. }) => {
                assert_eq!(len, 80);
                assert_eq!(matching, vec![10, 16]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }

        // No candidate divides 21
        assert!(matches!(
            resolve_width(21, &WidthHint::default()),
            Err(TrackError::AmbiguousWidth { .. })
        ));

        // Zero candidates are never a match
        assert!(matches!(
            resolve_width(20, &WidthHint::Candidates(vec![0])),
            Err(TrackError::AmbiguousWidth { .. })
        ));
    }

    #[test]
    fn test_decode_ambiguous_width() {
        let grid = TrackGrid::parse_plaintext(&"....#.....\n".repeat(8)).unwrap();
        let codec = TrackCodec::new(3);
        let asset = codec.encode(&grid, "amb.trk.enc").unwrap();

        let result = codec.decode(&asset, "amb.trk.enc", &WidthHint::default());
        assert!(matches!(result, Err(TrackError::AmbiguousWidth { len: 80, .. })));

        let decoded = codec.decode(&asset, "amb.trk.enc", &WidthHint::Explicit(10)).unwrap();
        assert_eq!(decoded, grid);
    }

    #[test]
    fn test_decode_invalid_symbol_in_payload() {
        // Not a valid track, but well-formed at the container level
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(b"..x.").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut asset = 4u32.to_le_bytes().to_vec();
        asset.extend_from_slice(&compressed);
        Keystream::new(derive_track_key(1, "bad.trk.enc")).apply(&mut asset);

        let result = TrackCodec::new(1).decode(&asset, "bad.trk.enc", &WidthHint::Explicit(2));
        assert!(matches!(
            result,
            Err(TrackError::InvalidSymbol { row: 1, column: 0, symbol: 'x' })
        ));
    }

    fn grid_strategy() -> impl Strategy<Value = TrackGrid> {
        (1usize..16, 1usize..40).prop_flat_map(|(width, rows)| {
            prop::collection::vec(prop::sample::select(vec![b'.', b'#', b'F']), width * rows)
                .prop_map(move |payload| TrackGrid::from_payload(&payload, width).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_round_trip(grid in grid_strategy(), seed in any::<u64>(), name in "[A-Za-z0-9_]{1,12}\\.trk\\.enc") {
            let codec = TrackCodec::new(seed);
            let asset = codec.encode(&grid, &name).unwrap();
            let decoded = codec.decode(&asset, &name, &WidthHint::Explicit(grid.width())).unwrap();
            prop_assert_eq!(decoded, grid);
        }

        #[test]
        fn prop_decode_is_deterministic(grid in grid_strategy(), seed in any::<u64>()) {
            let codec = TrackCodec::new(seed);
            let asset = codec.encode(&grid, "det.trk.enc").unwrap();
            let hint = WidthHint::Explicit(grid.width());

            let first = codec.decode(&asset, "det.trk.enc", &hint).unwrap();
            let second = codec.decode(&asset, "det.trk.enc", &hint).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
