//! Playback controller: one active track, a positional queue and the
//! transport bound to them.

mod controller;
mod queue;
mod session;

pub use controller::PlaybackController;
pub use queue::{Direction, Queue};
pub use session::{PlaybackSession, PlaybackState};
