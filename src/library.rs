//! Track model, mood-grouped catalog and the local library scanner.
//!
//! Tracks normally come from the mood service; `scan` builds the same
//! catalog shape from a directory tree when the service is unreachable.

mod catalog;
mod display;
mod model;
mod scan;

pub use catalog::Catalog;
pub use display::{artists_line, format_mmss};
pub use model::{Track, TrackError};
pub use scan::scan;
