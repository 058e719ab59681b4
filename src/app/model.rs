//! Host-side application model: the browse list, the cursor and the bits of
//! UI state that sit between key presses and the two core components.

use std::path::PathBuf;

use crate::audio::Transport;
use crate::library::{Catalog, Track};
use crate::mood::Detection;
use crate::playback::PlaybackController;

/// Where the browse list came from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogSource {
    Service,
    LocalLibrary,
    #[default]
    Empty,
}

/// What the keyboard is currently typing into.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Browse,
    /// Collecting a path for the capture dialog's file upload.
    FilePath,
}

pub struct App {
    entries: Vec<(String, Track)>,
    queue: Vec<Track>,
    pub selected: usize,
    pub source: CatalogSource,
    pub input_mode: InputMode,
    path_input: String,
    status: Option<String>,
}

impl App {
    pub fn new(catalog: Catalog, source: CatalogSource) -> Self {
        Self {
            entries: catalog.entries(),
            queue: catalog.flatten(),
            selected: 0,
            source,
            input_mode: InputMode::Browse,
            path_input: String::new(),
            status: None,
        }
    }

    /// `(mood, track)` rows in display order.
    pub fn entries(&self) -> &[(String, Track)] {
        &self.entries
    }

    pub fn has_tracks(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.entries.get(self.selected).map(|(_, t)| t)
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if !self.entries.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.entries.len() - 1);
        }
    }

    /// Put the cursor on `track` if it is listed.
    pub fn follow(&mut self, track: &Track) {
        if let Some(i) = self.entries.iter().position(|(_, t)| t.same_as(track)) {
            self.selected = i;
        }
    }

    /// Play the track under the cursor, queueing the whole catalog.
    /// Toggles instead when it is already the active track.
    pub fn activate_selected<T: Transport>(&mut self, player: &mut PlaybackController<T>) {
        let Some(track) = self.selected_track().cloned() else {
            return;
        };
        let is_current = player
            .session()
            .track()
            .is_some_and(|current| current.same_as(&track));
        if is_current {
            player.toggle_playback();
        } else {
            player.load_and_play(track, self.queue.clone());
        }
    }

    /// Announce a detection and start its first track with the rest queued.
    pub fn apply_detection<T: Transport>(
        &mut self,
        detection: Detection,
        player: &mut PlaybackController<T>,
    ) {
        self.set_status(detection.announcement());
        let Detection { tracks, .. } = detection;
        let Some(first) = tracks.first().cloned() else {
            log::info!("mood service returned no tracks");
            return;
        };
        self.follow(&first);
        player.load_and_play(first, tracks);
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(text.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn path_input(&self) -> &str {
        &self.path_input
    }

    pub fn begin_path_input(&mut self) {
        self.input_mode = InputMode::FilePath;
        self.path_input.clear();
    }

    pub fn push_path_char(&mut self, c: char) {
        self.path_input.push(c);
    }

    pub fn pop_path_char(&mut self) {
        self.path_input.pop();
    }

    pub fn cancel_path_input(&mut self) {
        self.input_mode = InputMode::Browse;
        self.path_input.clear();
    }

    /// Finish typing. Returns the path, expanding a leading `~/`.
    pub fn take_path_input(&mut self) -> Option<PathBuf> {
        self.input_mode = InputMode::Browse;
        let raw = std::mem::take(&mut self.path_input);
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(rest) = raw.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                return Some(PathBuf::from(home).join(rest));
            }
        }
        Some(PathBuf::from(raw))
    }
}
