use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use super::source::{LoadedSource, TransportError};
use super::types::{Signal, Stamp, TransportCmd, TransportEvent};

/// How often the thread wakes up to report time and detect end of track.
const TICK: Duration = Duration::from_millis(250);

/// Wall-clock position of the current sink: `accumulated` plus time since
/// the last resume.
#[derive(Debug, Default)]
pub(super) struct Clock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Clock {
    pub(super) fn reset(&mut self, at: Duration) {
        self.started_at = None;
        self.accumulated = at;
    }

    pub(super) fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    pub(super) fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}

struct Current {
    source: LoadedSource,
    sink: Sink,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<TransportCmd>,
    events: Sender<TransportEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let err = TransportError::Output(e.to_string());
                log::error!("{err}");
                // Keep draining commands so loads fail visibly instead of hanging.
                for cmd in rx {
                    if let TransportCmd::Load { stamp, .. } = cmd {
                        let _ = events.send(TransportEvent::new(
                            stamp,
                            Signal::Failed(err.to_string()),
                        ));
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let http = reqwest::blocking::Client::new();
        let emit = |stamp: Stamp, signal: Signal| {
            let _ = events.send(TransportEvent::new(stamp, signal));
        };

        let mut current: Option<Current> = None;
        let mut stamp = Stamp::default();
        let mut playing = false;
        let mut ended_reported = false;
        let mut clock = Clock::default();

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd) => match cmd {
                    TransportCmd::Load { locator, stamp: s } => {
                        if let Some(old) = current.take() {
                            old.sink.stop();
                        }
                        stamp = s;
                        clock.reset(Duration::ZERO);
                        ended_reported = false;

                        log::debug!("loading {locator}");
                        let loaded = LoadedSource::fetch(&locator, &http).and_then(|source| {
                            let sink = source.sink_at(&stream, Duration::ZERO)?;
                            Ok(Current { source, sink })
                        });
                        match loaded {
                            Ok(c) => {
                                if let Some(d) = c.source.duration {
                                    emit(stamp, Signal::MetadataLoaded(d));
                                }
                                if playing {
                                    c.sink.play();
                                    clock.resume();
                                }
                                current = Some(c);
                            }
                            Err(e) => {
                                log::warn!("failed to load {locator}: {e}");
                                emit(stamp, Signal::Failed(e.to_string()));
                            }
                        }
                    }

                    TransportCmd::Play => {
                        playing = true;
                        if let Some(ref c) = current {
                            c.sink.play();
                            clock.resume();
                        }
                    }

                    TransportCmd::Pause => {
                        playing = false;
                        if let Some(ref c) = current {
                            c.sink.pause();
                            clock.pause();
                        }
                    }

                    TransportCmd::Seek { position, stamp: s } => {
                        stamp = s;
                        let Some(c) = current.as_mut() else {
                            continue;
                        };
                        // Scrubbing: rebuild the current sink and skip into the source.
                        let position = match c.source.duration {
                            Some(d) => position.min(d),
                            None => position,
                        };
                        match c.source.sink_at(&stream, position) {
                            Ok(new_sink) => {
                                c.sink.stop();
                                if playing {
                                    new_sink.play();
                                }
                                c.sink = new_sink;
                                clock.reset(position);
                                if playing {
                                    clock.resume();
                                }
                                ended_reported = false;
                                emit(stamp, Signal::TimeUpdate(position));
                            }
                            Err(e) => log::warn!("seek failed: {e}"),
                        }
                    }

                    TransportCmd::Quit => {
                        if let Some(c) = current.take() {
                            c.sink.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    let Some(ref c) = current else {
                        continue;
                    };
                    if !playing {
                        continue;
                    }
                    if c.sink.empty() {
                        if !ended_reported {
                            ended_reported = true;
                            clock.pause();
                            emit(stamp, Signal::Ended);
                        }
                    } else {
                        emit(stamp, Signal::TimeUpdate(clock.elapsed()));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
