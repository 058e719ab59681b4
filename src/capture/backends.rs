use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use image::{Rgb, RgbImage};

use crate::config::{CameraBackendSetting, CaptureSettings};

use super::device::{CameraBackend, CameraDevice, CameraRequest, Resolution};
use super::error::DeviceError;

pub fn backend_from_settings(settings: &CaptureSettings) -> Arc<dyn CameraBackend> {
    match settings.camera {
        CameraBackendSetting::Disabled => Arc::new(NoCamera),
        CameraBackendSetting::TestPattern => Arc::new(TestPatternCamera::default()),
    }
}

/// A machine without a camera.
#[derive(Debug, Default)]
pub struct NoCamera;

impl CameraBackend for NoCamera {
    fn acquire(
        &self,
        _request: CameraRequest,
    ) -> BoxFuture<'static, Result<Box<dyn CameraDevice>, DeviceError>> {
        Box::pin(async { Err(DeviceError::NotFound) })
    }
}

/// Synthetic camera producing a drifting gradient.
#[derive(Debug, Clone)]
pub struct TestPatternCamera {
    pub open_delay: Duration,
    pub warm_up: Duration,
}

impl Default for TestPatternCamera {
    fn default() -> Self {
        Self {
            open_delay: Duration::from_millis(150),
            warm_up: Duration::from_millis(300),
        }
    }
}

impl CameraBackend for TestPatternCamera {
    fn acquire(
        &self,
        request: CameraRequest,
    ) -> BoxFuture<'static, Result<Box<dyn CameraDevice>, DeviceError>> {
        let cfg = self.clone();
        Box::pin(async move {
            if !request.ideal.covers(request.min) {
                return Err(DeviceError::Other(format!(
                    "ideal {} is below minimum {}",
                    request.ideal, request.min
                )));
            }
            tokio::time::sleep(cfg.open_delay).await;
            let device: Box<dyn CameraDevice> = Box::new(TestPatternDevice {
                resolution: request.ideal,
                opened_at: Instant::now(),
                warm_up: cfg.warm_up,
                stopped: false,
            });
            Ok(device)
        })
    }
}

#[derive(Debug)]
struct TestPatternDevice {
    resolution: Resolution,
    opened_at: Instant,
    warm_up: Duration,
    stopped: bool,
}

impl CameraDevice for TestPatternDevice {
    fn is_ready(&self) -> bool {
        !self.stopped && self.opened_at.elapsed() >= self.warm_up
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn grab_frame(&mut self) -> Result<RgbImage, DeviceError> {
        if self.stopped {
            return Err(DeviceError::Other("stream stopped".into()));
        }
        let Resolution { width, height } = self.resolution;
        let (w, h) = (width.max(1), height.max(1));
        let shift = ((self.opened_at.elapsed().as_millis() / 40) % u128::from(w)) as u32;
        Ok(RgbImage::from_fn(width, height, |x, y| {
            let r = ((x + shift) % w * 255 / w) as u8;
            let g = (y * 255 / h) as u8;
            let b = ((x + y + shift) / 4 % 256) as u8;
            Rgb([r, g, b])
        }))
    }

    fn stop(&mut self) {
        if !self.stopped {
            log::debug!("test pattern camera stopped");
            self.stopped = true;
        }
    }
}
