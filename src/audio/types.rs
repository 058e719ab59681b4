//! Transport contract types.
//!
//! Commands flow controller -> transport through the `Transport` trait;
//! signals flow back as `TransportEvent`s, each tagged with the `Stamp` of
//! the command that was current when it was produced.

use std::time::Duration;

/// Identifies which `load`/`seek` an event belongs to.
///
/// `source` changes on every `load`; `cue` changes on every `load` and
/// every `seek`. Receivers compare against their latest stamp to drop
/// signals produced before a newer command took effect.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Stamp {
    pub source: u64,
    pub cue: u64,
}

impl Stamp {
    pub fn next_source(self) -> Self {
        Self {
            source: self.source + 1,
            cue: self.cue + 1,
        }
    }

    pub fn next_cue(self) -> Self {
        Self {
            source: self.source,
            cue: self.cue + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Periodic elapsed-time report while playing.
    TimeUpdate(Duration),
    /// The source is decoded and its total length is known.
    MetadataLoaded(Duration),
    /// The source played to its end.
    Ended,
    /// The source could not be fetched or decoded.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportEvent {
    pub stamp: Stamp,
    pub signal: Signal,
}

impl TransportEvent {
    pub fn new(stamp: Stamp, signal: Signal) -> Self {
        Self { stamp, signal }
    }
}

/// The audio playback resource bound to one playback session.
///
/// Implementations must echo the stamp passed to the most recent `load` or
/// `seek` in every event they emit afterwards.
pub trait Transport {
    /// Bind a new source. The transport stays paused until `play`.
    fn load(&mut self, locator: &str, stamp: Stamp);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration, stamp: Stamp);
}

#[derive(Debug)]
pub(super) enum TransportCmd {
    Load { locator: String, stamp: Stamp },
    Play,
    Pause,
    Seek { position: Duration, stamp: Stamp },
    Quit,
}
