//! Track Module
//!
//! Decoding of track assets into an immutable grid, and the row stream
//! the navigation engine consumes.
//!
//! ## Module Structure
//!
//! - `cell`: Cell alphabet and rows
//! - `grid`: Rectangular track grid, plaintext format
//! - `codec`: Encrypted asset format (keystream XOR + zlib)
//! - `stream`: Forward-only row stream
//! - `loader`: File loading with width discovery
//! - `error`: Decoding errors

pub mod cell;
pub mod grid;
pub mod codec;
pub mod stream;
pub mod loader;
pub mod error;

// Re-export key types
pub use cell::{Cell, Row};
pub use grid::TrackGrid;
pub use codec::{TrackCodec, WidthHint, DEFAULT_CANDIDATE_WIDTHS};
pub use stream::RowStream;
pub use loader::TrackLoader;
pub use error::{TrackError, FormatError};
