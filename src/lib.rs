//! moodplay: a terminal music player that picks a playlist from a photo of
//! your mood.
//!
//! The core is two independent components the host wires together:
//! [`playback::PlaybackController`] and [`capture::CapturePipeline`].

pub mod app;
pub mod audio;
pub mod capture;
pub mod config;
pub mod library;
pub mod mood;
pub mod playback;
pub mod runtime;
pub mod ui;
