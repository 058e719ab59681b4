use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::SendError};

use crate::config::CaptureSettings;
use crate::mood::{ClassificationError, Detection, MoodClassifier, Photo};

use super::device::{CameraBackend, CameraDevice, CameraRequest, Facing, Resolution};
use super::error::{CaptureError, DeviceError};
use super::progress::ProgressRamp;
use super::still::{PendingImage, SelectedFile};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CapturePhase {
    #[default]
    Selection,
    LiveCamera,
    FrozenPreview,
    Uploading,
}

/// Completion of work the pipeline started in the background.
///
/// Every event names the dialog instance (`session`) and the operation
/// (`op`) it answers; `handle_event` ignores anything no longer current.
#[derive(Debug)]
pub enum CaptureEvent {
    CameraAcquired {
        session: u64,
        op: u64,
        result: Result<Box<dyn CameraDevice>, DeviceError>,
    },
    StillEncoded {
        session: u64,
        op: u64,
        result: Result<PendingImage, String>,
    },
    Progress {
        session: u64,
        op: u64,
        step: f32,
    },
    Classified {
        session: u64,
        op: u64,
        result: Result<Detection, ClassificationError>,
    },
    Finished {
        session: u64,
        op: u64,
        detection: Detection,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Pending {
    Acquire(u64),
    Encode(u64),
    Classify(u64),
    Finish(u64),
}

/// State of one open dialog.
#[derive(Debug, Default)]
pub struct CaptureSession {
    phase: CapturePhase,
    image: Option<PendingImage>,
    device: Option<Box<dyn CameraDevice>>,
    progress: Option<f32>,
    error: Option<CaptureError>,
    camera_blocked: bool,
}

impl CaptureSession {
    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn pending_image(&self) -> Option<&PendingImage> {
        self.image.as_ref()
    }

    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    pub fn device_resolution(&self) -> Option<Resolution> {
        self.device.as_ref().map(|d| d.resolution())
    }

    /// Upload progress in percent.
    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    pub fn error(&self) -> Option<&CaptureError> {
        self.error.as_ref()
    }
}

pub type TracksDetected = Box<dyn FnMut(Detection) + Send>;

/// The photo-to-mood dialog.
///
/// Operations return whether they were accepted; refused calls leave the
/// state untouched. Background completions arrive on the receiver returned
/// by [`CapturePipeline::new`] and must be fed back through
/// [`CapturePipeline::handle_event`].
pub struct CapturePipeline {
    runtime: Handle,
    camera: Arc<dyn CameraBackend>,
    classifier: Arc<dyn MoodClassifier>,
    settings: CaptureSettings,
    events: UnboundedSender<CaptureEvent>,
    on_tracks_detected: Option<TracksDetected>,
    session: CaptureSession,
    session_id: u64,
    next_op: u64,
    pending: Option<Pending>,
    ramp: Option<ProgressRamp>,
    open: bool,
}

impl CapturePipeline {
    pub fn new(
        runtime: Handle,
        camera: Arc<dyn CameraBackend>,
        classifier: Arc<dyn MoodClassifier>,
        settings: CaptureSettings,
    ) -> (Self, UnboundedReceiver<CaptureEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let pipeline = Self {
            runtime,
            camera,
            classifier,
            settings,
            events,
            on_tracks_detected: None,
            session: CaptureSession::default(),
            session_id: 0,
            next_op: 0,
            pending: None,
            ramp: None,
            open: false,
        };
        (pipeline, rx)
    }

    /// Called once per successful analysis, right before the dialog closes.
    pub fn set_on_tracks_detected(&mut self, callback: impl FnMut(Detection) + Send + 'static) {
        self.on_tracks_detected = Some(Box::new(callback));
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    pub fn phase(&self) -> CapturePhase {
        self.session.phase
    }

    pub fn is_acquiring(&self) -> bool {
        matches!(self.pending, Some(Pending::Acquire(_)))
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self.pending, Some(Pending::Encode(_)))
    }

    /// Whether the take-photo action is available right now.
    pub fn camera_allowed(&self) -> bool {
        self.open
            && self.session.phase == CapturePhase::Selection
            && self.pending.is_none()
            && !self.session.camera_blocked
    }

    /// Whether `retake` would go back to the camera. A blocked camera keeps
    /// the pending image where it is.
    pub fn can_retake(&self) -> bool {
        self.open
            && self.session.phase == CapturePhase::FrozenPreview
            && self.pending.is_none()
            && !self.session.camera_blocked
    }

    pub fn camera_ready(&self) -> bool {
        self.session.device.as_ref().is_some_and(|d| d.is_ready())
    }

    pub fn can_close(&self) -> bool {
        self.session.phase != CapturePhase::Uploading
    }

    /// Start a fresh dialog instance. Anything still in flight for an
    /// earlier instance is ignored when it completes.
    pub fn open(&mut self) {
        self.reset();
        self.session_id += 1;
        self.open = true;
        log::debug!("capture dialog opened (session {})", self.session_id);
    }

    /// Tear the dialog down. Refused while uploading; repeated calls are
    /// harmless.
    pub fn close(&mut self) -> bool {
        if !self.can_close() {
            log::debug!("close refused while uploading");
            return false;
        }
        self.reset();
        self.open = false;
        true
    }

    pub fn start_camera(&mut self) -> bool {
        if !self.camera_allowed() {
            return false;
        }

        self.session.error = None;
        let op = self.next_op();
        self.pending = Some(Pending::Acquire(op));

        let request = self.request();
        log::info!(
            "requesting camera (ideal {}, min {})",
            request.ideal,
            request.min
        );
        let acquire = self.camera.acquire(request);
        let events = self.events.clone();
        let session = self.session_id;
        self.runtime.spawn(async move {
            let result = acquire.await;
            let sent = events.send(CaptureEvent::CameraAcquired {
                session,
                op,
                result,
            });
            // Nobody is listening any more; the device must not outlive that.
            if let Err(SendError(CaptureEvent::CameraAcquired {
                result: Ok(mut device),
                ..
            })) = sent
            {
                device.stop();
            }
        });
        true
    }

    /// Freeze the current camera frame. The device is released as soon as
    /// the frame is in hand; JPEG encoding finishes in the background.
    pub fn capture(&mut self) -> bool {
        if !self.open || self.session.phase != CapturePhase::LiveCamera || self.pending.is_some()
        {
            return false;
        }
        let Some(device) = self.session.device.as_mut() else {
            return false;
        };
        if !device.is_ready() {
            log::debug!("capture refused: camera not ready");
            return false;
        }

        let frame = device.grab_frame();
        self.release_device();

        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("frame grab failed: {e}");
                self.session.phase = CapturePhase::Selection;
                self.record_error(e.into());
                return true;
            }
        };

        let op = self.next_op();
        self.pending = Some(Pending::Encode(op));
        let quality = self.settings.jpeg_quality;
        let events = self.events.clone();
        let session = self.session_id;
        self.runtime.spawn_blocking(move || {
            let result = PendingImage::from_frame(&frame, quality).map_err(|e| e.to_string());
            let _ = events.send(CaptureEvent::StillEncoded {
                session,
                op,
                result,
            });
        });
        true
    }

    /// Step back to selection, dropping the device or the pending image.
    pub fn cancel(&mut self) -> bool {
        match self.session.phase {
            CapturePhase::LiveCamera => {
                self.release_device();
                self.pending = None;
                self.session.phase = CapturePhase::Selection;
                true
            }
            CapturePhase::FrozenPreview => {
                self.session.image = None;
                self.session.phase = CapturePhase::Selection;
                true
            }
            // An acquisition still in flight is abandoned; the device is
            // stopped when it shows up.
            CapturePhase::Selection => self.pending.take().is_some(),
            CapturePhase::Uploading => false,
        }
    }

    /// Throw the pending image away and go back to the camera.
    pub fn retake(&mut self) -> bool {
        if !self.can_retake() {
            return false;
        }
        self.session.image = None;
        self.session.phase = CapturePhase::Selection;
        self.start_camera()
    }

    pub fn select_file(&mut self, file: SelectedFile) -> bool {
        if !self.open || self.session.phase != CapturePhase::Selection {
            return false;
        }

        let media_type = file
            .resolved_media_type()
            .filter(|m| m.starts_with("image/"));
        let Some(media_type) = media_type else {
            log::info!("rejected {:?}: not an image", file.name);
            self.session.error = Some(CaptureError::InvalidFileType);
            return false;
        };

        // A selected file wins over a camera that has not shown up yet.
        self.pending = None;
        self.session.image = Some(PendingImage::from_photo(Photo {
            file_name: file.name,
            media_type,
            bytes: file.bytes,
        }));
        self.session.error = None;
        self.session.phase = CapturePhase::FrozenPreview;
        true
    }

    /// Upload the pending image for classification.
    pub fn analyze(&mut self) -> bool {
        if !self.open || self.session.phase != CapturePhase::FrozenPreview || self.pending.is_some()
        {
            return false;
        }
        let Some(image) = self.session.image.as_ref() else {
            return false;
        };
        let photo = image.photo.clone();

        let op = self.next_op();
        self.pending = Some(Pending::Classify(op));
        self.session.phase = CapturePhase::Uploading;
        self.session.progress = Some(0.0);
        self.session.error = None;

        let session = self.session_id;
        self.ramp = Some(ProgressRamp::start(
            &self.runtime,
            self.events.clone(),
            session,
            op,
            Duration::from_millis(self.settings.progress_tick_ms.max(1)),
            self.settings.progress_step_max,
        ));

        log::info!("analyzing {}", photo.file_name);
        let classify = self.classifier.classify(photo);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let result = classify.await;
            let _ = events.send(CaptureEvent::Classified {
                session,
                op,
                result,
            });
        });
        true
    }

    pub fn handle_event(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::CameraAcquired {
                session,
                op,
                result,
            } => {
                if !self.is_current(session, Pending::Acquire(op)) {
                    if let Ok(mut device) = result {
                        log::debug!("stopping camera that arrived too late");
                        device.stop();
                    }
                    return;
                }
                self.pending = None;
                match result {
                    Ok(device) => {
                        log::info!("camera live at {}", device.resolution());
                        self.session.device = Some(device);
                        self.session.phase = CapturePhase::LiveCamera;
                    }
                    Err(e) => {
                        log::warn!("camera acquisition failed: {e}");
                        self.record_error(e.into());
                    }
                }
            }
            CaptureEvent::StillEncoded {
                session,
                op,
                result,
            } => {
                if !self.is_current(session, Pending::Encode(op)) {
                    return;
                }
                self.pending = None;
                match result {
                    Ok(image) => {
                        log::debug!("still ready: {}", image.describe());
                        self.session.image = Some(image);
                        self.session.phase = CapturePhase::FrozenPreview;
                    }
                    Err(e) => {
                        log::warn!("still encoding failed: {e}");
                        self.session.phase = CapturePhase::Selection;
                        self.record_error(CaptureError::DeviceGeneric);
                    }
                }
            }
            CaptureEvent::Progress { session, op, step } => {
                if !self.is_current(session, Pending::Classify(op)) {
                    return;
                }
                let cap = self.settings.progress_cap;
                let now = self.session.progress.unwrap_or(0.0);
                let next = (now + step.max(0.0)).min(cap).max(now);
                self.session.progress = Some(next);
                if next >= cap {
                    self.ramp = None;
                }
            }
            CaptureEvent::Classified {
                session,
                op,
                result,
            } => {
                if !self.is_current(session, Pending::Classify(op)) {
                    log::debug!("ignoring classification for a stale dialog");
                    return;
                }
                self.ramp = None;
                match result {
                    Ok(detection) => {
                        self.session.progress = Some(100.0);
                        self.finish_later(detection);
                    }
                    Err(e) => {
                        log::warn!("classification failed: {e}");
                        self.pending = None;
                        self.session.progress = Some(0.0);
                        self.session.phase = CapturePhase::FrozenPreview;
                        self.session.error = Some(e.into());
                    }
                }
            }
            CaptureEvent::Finished {
                session,
                op,
                detection,
            } => {
                if !self.is_current(session, Pending::Finish(op)) {
                    return;
                }
                self.pending = None;
                if let Some(callback) = self.on_tracks_detected.as_mut() {
                    callback(detection);
                }
                self.reset();
                self.open = false;
            }
        }
    }

    /// Stop and drop the camera, if one is held. Safe to call any number of
    /// times.
    pub fn release_device(&mut self) -> bool {
        match self.session.device.take() {
            Some(mut device) => {
                device.stop();
                log::debug!("camera released");
                true
            }
            None => false,
        }
    }

    fn finish_later(&mut self, detection: Detection) {
        let op = self.next_op();
        self.pending = Some(Pending::Finish(op));
        let delay = Duration::from_millis(self.settings.finish_delay_ms);
        let events = self.events.clone();
        let session = self.session_id;
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(CaptureEvent::Finished {
                session,
                op,
                detection,
            });
        });
    }

    fn reset(&mut self) {
        self.release_device();
        self.ramp = None;
        self.pending = None;
        self.session = CaptureSession::default();
    }

    fn record_error(&mut self, error: CaptureError) {
        if error.disables_camera() {
            self.session.camera_blocked = true;
        }
        self.session.error = Some(error);
    }

    fn is_current(&self, session: u64, pending: Pending) -> bool {
        self.open && session == self.session_id && self.pending == Some(pending)
    }

    fn next_op(&mut self) -> u64 {
        self.next_op += 1;
        self.next_op
    }

    fn request(&self) -> CameraRequest {
        CameraRequest {
            ideal: Resolution::new(self.settings.ideal_width, self.settings.ideal_height),
            min: Resolution::new(self.settings.min_width, self.settings.min_height),
            facing: Facing::User,
        }
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        self.release_device();
    }
}
