use std::time::Duration;

use crate::library::Track;

/// Coarse playback state shown by the UI.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing has been loaded yet.
    #[default]
    Empty,
    Playing,
    Paused,
}

/// What is "current" on the transport.
///
/// `elapsed`/`duration` are only meaningful once the transport has reported
/// metadata for the active track; until then `duration` is `None`.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    pub(super) track: Option<Track>,
    pub(super) playing: bool,
    pub(super) elapsed: Duration,
    pub(super) duration: Option<Duration>,
    pub(super) last_error: Option<String>,
}

impl PlaybackSession {
    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Why the active track could not be played, if it failed to load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn state(&self) -> PlaybackState {
        match (&self.track, self.playing) {
            (None, _) => PlaybackState::Empty,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }

    pub(super) fn start(&mut self, track: Track) {
        self.track = Some(track);
        self.playing = true;
        self.elapsed = Duration::ZERO;
        self.duration = None;
        self.last_error = None;
    }

    /// Store a reported position, never past a known duration.
    pub(super) fn set_elapsed(&mut self, at: Duration) {
        self.elapsed = match self.duration {
            Some(d) => at.min(d),
            None => at,
        };
    }
}
