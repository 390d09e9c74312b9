//! Track decoding errors.
//!
//! Every variant is fatal: decoding aborts and no partial grid is returned.

use thiserror::Error;

/// Malformed encrypted asset.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Fewer than 4 bytes, so there is no length header.
    #[error("asset is {actual} bytes, shorter than the 4-byte length header")]
    TruncatedHeader {
        /// Asset length in bytes.
        actual: usize,
    },

    /// The compressed body did not inflate.
    #[error("payload failed to inflate: {0}")]
    Inflate(#[source] std::io::Error),

    /// Inflated payload length disagrees with the header.
    #[error("declared payload length {declared}, inflated {actual} bytes")]
    LengthMismatch {
        /// Length from the header.
        declared: u32,
        /// Length actually inflated.
        actual: usize,
    },

    /// The payload does not split evenly into rows of the requested width.
    #[error("payload of {len} bytes does not split into rows of width {width}")]
    RaggedPayload {
        /// Payload length in bytes.
        len: usize,
        /// Requested width.
        width: usize,
    },

    /// A width of zero was supplied.
    #[error("track width must be non-zero")]
    ZeroWidth,

    /// The payload is too large for the 32-bit length header.
    #[error("payload of {len} bytes exceeds the 32-bit length header")]
    PayloadTooLarge {
        /// Payload length in bytes.
        len: usize,
    },
}

/// Track decoding errors.
#[derive(Debug, Error)]
pub enum TrackError {
    /// Malformed encrypted asset.
    #[error("malformed track asset: {0}")]
    Format(#[from] FormatError),

    /// Width could not be inferred and none was supplied.
    #[error("cannot infer width of a {len}-byte payload: {matching:?} of candidates {candidates:?} divide it")]
    AmbiguousWidth {
        /// Payload length in bytes.
        len: usize,
        /// Candidate widths that were tested.
        candidates: Vec<usize>,
        /// Candidates that divide the payload evenly.
        matching: Vec<usize>,
    },

    /// Plaintext rows of differing length.
    #[error("row {row} has width {found}, expected {expected}")]
    InconsistentWidth {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },

    /// Symbol outside `{'.', '#', 'F'}`.
    #[error("invalid symbol {symbol:?} at row {row}, column {column}")]
    InvalidSymbol {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// The offending character.
        symbol: char,
    },

    /// Reading the asset from disk failed.
    #[error("failed to read track: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackError {
    pub(crate) fn invalid_symbol(row: usize, column: usize, byte: u8) -> Self {
        TrackError::InvalidSymbol {
            row,
            column,
            symbol: byte as char,
        }
    }
}
