//! Audio transport: the playback resource the controller drives.
//!
//! `Transport` is the seam between the playback controller and whatever
//! produces sound. `RodioTransport` is the real implementation; it runs a
//! dedicated thread and reports progress back as `TransportEvent`s.

mod player;
mod source;
mod thread;
mod types;

pub use player::RodioTransport;
pub use source::{SourceKind, TransportError};
pub use types::{Signal, Stamp, Transport, TransportEvent};

#[cfg(test)]
mod tests;
