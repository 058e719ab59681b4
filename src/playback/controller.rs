use std::time::Duration;

use crate::audio::{Signal, Stamp, Transport, TransportEvent};
use crate::library::Track;

use super::queue::{Direction, Queue};
use super::session::{PlaybackSession, PlaybackState};

/// Owns the playback session, the queue and the transport they drive.
///
/// All operations are safe to call in any state: commands that make no
/// sense (toggling with nothing loaded, skipping past either end) are
/// no-ops.
pub struct PlaybackController<T: Transport> {
    transport: T,
    queue: Queue,
    session: PlaybackSession,
    stamp: Stamp,
    /// The active track played to its end and nothing followed it.
    ended: bool,
}

impl<T: Transport> PlaybackController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            queue: Queue::default(),
            session: PlaybackSession::default(),
            stamp: Stamp::default(),
            ended: false,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replace the queue with `queue`, make `track` current and start it.
    ///
    /// `queue` is used verbatim. The position is `track`'s index in it, or 0
    /// when it is not there; an empty `queue` becomes `[track]`.
    pub fn load_and_play(&mut self, track: Track, queue: Vec<Track>) {
        self.queue = Queue::positioned_on(&track, queue);
        log::info!(
            "playing {:?} ({} of {})",
            track.title,
            self.queue.index().map_or(0, |i| i + 1),
            self.queue.len()
        );
        self.start(track);
    }

    /// Flip between playing and paused. Returns false when nothing is loaded.
    pub fn toggle_playback(&mut self) -> bool {
        if self.session.track.is_none() {
            return false;
        }

        if self.session.playing {
            self.session.playing = false;
            self.transport.pause();
        } else {
            if self.ended {
                self.ended = false;
                self.stamp = self.stamp.next_cue();
                self.session.elapsed = Duration::ZERO;
                self.transport.seek(Duration::ZERO, self.stamp);
            }
            self.session.playing = true;
            self.transport.play();
        }
        true
    }

    pub fn can_advance(&self, direction: Direction) -> bool {
        self.queue.target(direction).is_some()
    }

    /// Move one step through the queue and start that track.
    ///
    /// Returns whether the position changed. Always starts playback of the
    /// new track, even if the previous one was paused.
    pub fn advance(&mut self, direction: Direction) -> bool {
        let Some(target) = self.queue.target(direction) else {
            return false;
        };
        let Some(track) = self.queue.move_to(target).cloned() else {
            return false;
        };
        log::debug!("advance {direction:?} -> {:?}", track.title);
        self.start(track);
        true
    }

    /// Jump to `position` within the active track.
    ///
    /// Clamped to the known duration. With no duration yet the position is
    /// forwarded as-is and elapsed waits for the transport's next report.
    pub fn seek(&mut self, position: Duration) {
        if self.session.track.is_none() {
            return;
        }

        self.stamp = self.stamp.next_cue();
        let position = match self.session.duration {
            Some(d) => {
                let p = position.min(d);
                self.session.elapsed = p;
                p
            }
            None => position,
        };
        self.ended = false;
        self.transport.seek(position, self.stamp);
    }

    /// Apply a signal reported by the transport.
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        let TransportEvent { stamp, signal } = event;
        if stamp.source != self.stamp.source {
            log::trace!("dropping signal for old source: {signal:?}");
            return;
        }

        match signal {
            Signal::TimeUpdate(at) => {
                if stamp.cue == self.stamp.cue {
                    self.session.set_elapsed(at);
                }
            }
            Signal::MetadataLoaded(d) => {
                self.session.duration = (d > Duration::ZERO).then_some(d);
                let elapsed = self.session.elapsed;
                self.session.set_elapsed(elapsed);
            }
            Signal::Ended => {
                if stamp.cue == self.stamp.cue {
                    self.on_ended();
                }
            }
            Signal::Failed(msg) => {
                log::warn!("transport failed: {msg}");
                self.session.playing = false;
                self.session.last_error = Some(msg);
                self.transport.pause();
            }
        }
    }

    fn on_ended(&mut self) {
        self.session.playing = false;
        if let Some(d) = self.session.duration {
            self.session.elapsed = d;
        }
        if !self.advance(Direction::Next) {
            log::info!("queue finished");
            self.ended = true;
            self.transport.pause();
        }
    }

    fn start(&mut self, track: Track) {
        self.ended = false;
        self.stamp = self.stamp.next_source();
        self.transport.load(&track.audio, self.stamp);
        self.session.start(track);
        if self.session.playing {
            self.transport.play();
        }
    }
}
