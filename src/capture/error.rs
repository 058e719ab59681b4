use crate::mood::ClassificationError;

/// Why a backend could not hand out a camera.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("no camera found")]
    NotFound,
    #[error("camera access not allowed")]
    NotAllowed,
    #[error("camera cannot be read (in use?)")]
    NotReadable,
    #[error("camera error: {0}")]
    Other(String),
}

/// User-facing failures of the capture dialog. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("No camera found. Please use the upload option instead.")]
    DeviceUnavailable,
    #[error("Camera access denied. Please allow camera permissions and try again.")]
    DevicePermissionDenied,
    #[error("Camera is already in use by another application.")]
    DeviceBusy,
    #[error("Failed to access camera. Please try uploading an image instead.")]
    DeviceGeneric,
    #[error("Please select a valid image file")]
    InvalidFileType,
    #[error("{0}")]
    ClassificationFailed(String),
}

impl CaptureError {
    /// Whether the take-photo action stays off until the dialog is closed.
    pub fn disables_camera(&self) -> bool {
        matches!(
            self,
            Self::DeviceUnavailable | Self::DeviceBusy | Self::DeviceGeneric
        )
    }
}

impl From<DeviceError> for CaptureError {
    fn from(e: DeviceError) -> Self {
        match e {
            DeviceError::NotFound => Self::DeviceUnavailable,
            DeviceError::NotAllowed => Self::DevicePermissionDenied,
            DeviceError::NotReadable => Self::DeviceBusy,
            DeviceError::Other(_) => Self::DeviceGeneric,
        }
    }
}

impl From<ClassificationError> for CaptureError {
    fn from(e: ClassificationError) -> Self {
        Self::ClassificationFailed(e.message)
    }
}
