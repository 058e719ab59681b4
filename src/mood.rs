//! The catalog & mood service.
//!
//! `MoodClassifier` is the seam the capture pipeline talks to;
//! `HttpMoodService` is the production implementation and also serves the
//! catalog.

mod client;
mod types;

pub use client::{HttpMoodService, ServiceError, parse_catalog, parse_mood_response, resolve_locator};
pub use types::{
    ClassificationError, DEFAULT_FAILURE_MESSAGE, Detection, MoodClassifier, MoodLabel,
    NOT_FOUND_LABEL, Photo,
};
