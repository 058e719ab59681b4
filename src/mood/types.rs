use futures_util::future::BoxFuture;

use crate::library::Track;

/// Shown when the service rejects a photo without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to analyze mood. Please try again.";

/// Label the service uses when it could not read a mood from the photo.
pub const NOT_FOUND_LABEL: &str = "not_found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoodLabel {
    Detected(String),
    /// The photo was accepted but no mood could be read from it.
    NotFound,
}

impl MoodLabel {
    pub fn from_wire(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(NOT_FOUND_LABEL) {
            Self::NotFound
        } else {
            Self::Detected(raw.to_lowercase())
        }
    }
}

/// A successful classification: the mood and the tracks picked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub mood: MoodLabel,
    pub tracks: Vec<Track>,
}

impl Detection {
    /// One-line message for the status line.
    pub fn announcement(&self) -> String {
        match &self.mood {
            MoodLabel::Detected(m) => {
                format!("You are looking {}! Playing recommended music.", m.to_uppercase())
            }
            MoodLabel::NotFound => "Sorry! Unable to analyse your mood".to_string(),
        }
    }
}

/// The classification call did not succeed. `message` is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClassificationError {
    pub message: String,
}

impl ClassificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for ClassificationError {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_MESSAGE)
    }
}

/// An encoded image ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Turns a photo into a mood and a track list.
///
/// The returned future must be `'static`: implementations clone whatever
/// they need out of `self` before awaiting.
pub trait MoodClassifier: Send + Sync {
    fn classify(&self, photo: Photo) -> BoxFuture<'static, Result<Detection, ClassificationError>>;
}
