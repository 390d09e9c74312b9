//! Track Loader
//!
//! Reads `.trk` (plaintext) and `.trk.enc` (encrypted) files from disk.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::track::codec::{decode_plaintext, TrackCodec, WidthHint};
use crate::track::error::TrackError;
use crate::track::grid::TrackGrid;

/// File extension marking the encrypted variant.
pub const ENCRYPTED_EXTENSION: &str = "enc";

/// Loads track files, dispatching on the file extension.
#[derive(Clone, Debug)]
pub struct TrackLoader {
    codec: TrackCodec,
    width: WidthHint,
}

impl TrackLoader {
    /// Create a loader for the seed paired with a track set.
    pub fn new(seed: u64, width: WidthHint) -> Self {
        Self {
            codec: TrackCodec::new(seed),
            width,
        }
    }

    /// Codec used for encrypted assets.
    pub fn codec(&self) -> &TrackCodec {
        &self.codec
    }

    /// Load a track file.
    ///
    /// Encrypted files use their bare file name for key derivation. Their
    /// width comes from, in order: an explicit width, the first row of a
    /// plaintext sibling (same path without `.enc`), the candidate list.
    pub fn load(&self, path: &Path) -> Result<TrackGrid, TrackError> {
        if !is_encrypted(path) {
            debug!(path = %path.display(), "loading plaintext track");
            return decode_plaintext(&fs::read(path)?);
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let asset = fs::read(path)?;

        let width = match &self.width {
            WidthHint::Explicit(width) => WidthHint::Explicit(*width),
            WidthHint::Candidates(_) => match sibling_width(path)? {
                Some(width) => {
                    debug!(width, "using width of plaintext sibling");
                    WidthHint::Explicit(width)
                }
                None => self.width.clone(),
            },
        };

        debug!(path = %path.display(), %filename, ?width, "loading encrypted track");
        self.codec.decode(&asset, &filename, &width)
    }
}

/// Whether `path` names the encrypted variant.
pub fn is_encrypted(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ENCRYPTED_EXTENSION)
}

/// Width of the first non-empty line of the plaintext sibling, if present.
fn sibling_width(path: &Path) -> Result<Option<usize>, TrackError> {
    let plain = path.with_extension("");
    if !plain.is_file() {
        return Ok(None);
    }

    let bytes = fs::read(&plain)?;
    Ok(bytes
        .split(|&byte| byte == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .find(|line| !line.is_empty())
        .map(<[u8]>::len))
}
