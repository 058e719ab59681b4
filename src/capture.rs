//! Photo capture for mood detection.
//!
//! [`CapturePipeline`] walks a dialog through selection, live camera, frozen
//! preview and upload. Camera access goes through [`CameraBackend`];
//! classification through [`crate::mood::MoodClassifier`].

mod backends;
mod device;
mod error;
mod pipeline;
mod progress;
mod still;

pub use backends::{NoCamera, TestPatternCamera, backend_from_settings};
pub use device::{CameraBackend, CameraDevice, CameraRequest, Facing, Resolution};
pub use error::{CaptureError, DeviceError};
pub use pipeline::{CaptureEvent, CapturePhase, CapturePipeline, CaptureSession, TracksDetected};
pub use still::{CAPTURED_FILE_NAME, PendingImage, SelectedFile};
