use std::time::Duration;

use rand::Rng;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use super::pipeline::CaptureEvent;

/// Cosmetic upload progress: a background task that emits random steps
/// until it is dropped. It knows nothing about the request it decorates.
pub(super) struct ProgressRamp {
    task: JoinHandle<()>,
}

impl ProgressRamp {
    pub(super) fn start(
        runtime: &Handle,
        events: UnboundedSender<CaptureEvent>,
        session: u64,
        op: u64,
        tick: Duration,
        step_max: f32,
    ) -> Self {
        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // First tick of `interval` fires immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let step = rand::rng().random_range(0.0..=step_max);
                if events
                    .send(CaptureEvent::Progress { session, op, step })
                    .is_err()
                {
                    break;
                }
            }
        });
        Self { task }
    }
}

impl Drop for ProgressRamp {
    fn drop(&mut self) {
        self.task.abort();
    }
}
