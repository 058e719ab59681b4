//! The play queue.
//!
//! The track list is an `Arc<[Track]>`: a queue is replaced wholesale, never
//! edited, so snapshots handed to readers stay consistent.

use std::sync::Arc;

use crate::library::Track;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Ordered tracks plus the current position.
///
/// `index` is `None` exactly when nothing is selected; an empty queue never
/// has an index.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Arc<[Track]>,
    index: Option<usize>,
}

impl Queue {
    /// Build a queue positioned on `track`.
    ///
    /// An empty `tracks` degrades to a single-item queue holding `track`.
    /// When `track` is not part of `tracks` the position falls back to 0.
    pub fn positioned_on(track: &Track, tracks: Vec<Track>) -> Self {
        let tracks: Arc<[Track]> = if tracks.is_empty() {
            Arc::from(vec![track.clone()])
        } else {
            Arc::from(tracks)
        };
        let index = tracks.iter().position(|t| t.same_as(track)).unwrap_or(0);

        Self {
            tracks,
            index: Some(index),
        }
    }

    pub fn tracks(&self) -> Arc<[Track]> {
        self.tracks.clone()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&Track> {
        self.index.and_then(|i| self.tracks.get(i))
    }

    /// Position one step in `direction`, if it stays inside the queue.
    ///
    /// This is the single bounds check behind both `can_advance` and
    /// `advance`.
    pub fn target(&self, direction: Direction) -> Option<usize> {
        let i = self.index?;
        match direction {
            Direction::Next => (i + 1 < self.tracks.len()).then_some(i + 1),
            Direction::Previous => i.checked_sub(1),
        }
    }

    pub(super) fn move_to(&mut self, index: usize) -> Option<&Track> {
        if index < self.tracks.len() {
            self.index = Some(index);
        }
        self.current()
    }
}
