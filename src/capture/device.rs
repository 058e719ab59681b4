//! Camera seam.
//!
//! A backend hands out devices asynchronously; a device stays live until
//! `stop` is called on it.

use std::fmt;

use futures_util::future::BoxFuture;
use image::RgbImage;

use super::error::DeviceError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn covers(&self, other: Resolution) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Facing {
    User,
    Environment,
}

/// What the pipeline asks a backend for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CameraRequest {
    pub ideal: Resolution,
    pub min: Resolution,
    pub facing: Facing,
}

/// A live camera stream.
pub trait CameraDevice: Send + fmt::Debug {
    /// True once the stream has produced its metadata and frames can be grabbed.
    fn is_ready(&self) -> bool;
    /// Native resolution reported by the stream.
    fn resolution(&self) -> Resolution;
    /// The current frame at native resolution.
    fn grab_frame(&mut self) -> Result<RgbImage, DeviceError>;
    /// Stop every track of the stream. Must tolerate repeated calls.
    fn stop(&mut self);
}

pub trait CameraBackend: Send + Sync {
    fn acquire(
        &self,
        request: CameraRequest,
    ) -> BoxFuture<'static, Result<Box<dyn CameraDevice>, DeviceError>>;
}
