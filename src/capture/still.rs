//! Still images: frames frozen from the camera and files picked by the user.

use std::io::{self, Cursor};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, ImageReader, RgbImage};

use crate::mood::Photo;

use super::device::Resolution;

pub const CAPTURED_FILE_NAME: &str = "captured-photo.jpg";

/// A file handed to `select_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    /// As reported by whoever picked the file. Resolved from the name or the
    /// content when absent.
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, None, bytes))
    }

    pub fn resolved_media_type(&self) -> Option<String> {
        let given = self.media_type.as_deref().map(str::trim).filter(|t| !t.is_empty());
        if let Some(t) = given {
            return Some(t.to_ascii_lowercase());
        }
        ImageFormat::from_path(&self.name)
            .or_else(|_| image::guess_format(&self.bytes))
            .ok()
            .map(|f| f.to_mime_type().to_string())
    }
}

/// The image waiting to be analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub photo: Photo,
    /// Pixel size, when the bytes could be decoded far enough to tell.
    pub dimensions: Option<Resolution>,
}

impl PendingImage {
    pub fn from_photo(photo: Photo) -> Self {
        let dimensions = ImageReader::new(Cursor::new(&photo.bytes))
            .with_guessed_format()
            .ok()
            .and_then(|r| r.into_dimensions().ok())
            .map(|(w, h)| Resolution::new(w, h));
        Self { photo, dimensions }
    }

    /// Encode a camera frame as JPEG at `quality` (1-100).
    pub fn from_frame(frame: &RgbImage, quality: u8) -> Result<Self, image::ImageError> {
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).encode_image(frame)?;
        Ok(Self {
            photo: Photo {
                file_name: CAPTURED_FILE_NAME.to_string(),
                media_type: "image/jpeg".to_string(),
                bytes,
            },
            dimensions: Some(Resolution::new(frame.width(), frame.height())),
        })
    }

    pub fn byte_size(&self) -> usize {
        self.photo.bytes.len()
    }

    /// Text stand-in for a preview, e.g. `captured-photo.jpg, image/jpeg, 41.2 KiB, 640x480`.
    pub fn describe(&self) -> String {
        let size = self.byte_size();
        let size = if size >= 1024 {
            format!("{:.1} KiB", size as f64 / 1024.0)
        } else {
            format!("{size} B")
        };
        let mut out = format!("{}, {}, {size}", self.photo.file_name, self.photo.media_type);
        if let Some(d) = self.dimensions {
            out.push_str(&format!(", {d}"));
        }
        out
    }
}
