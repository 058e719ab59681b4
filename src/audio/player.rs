use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::Duration;

use super::thread::spawn_audio_thread;
use super::types::{Stamp, Transport, TransportCmd, TransportEvent};

/// `Transport` backed by a rodio output stream on a dedicated thread.
pub struct RodioTransport {
    tx: Sender<TransportCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioTransport {
    /// Spawn the audio thread. Events are delivered on the returned receiver;
    /// the host forwards them to the playback controller.
    pub fn spawn() -> (Self, Receiver<TransportEvent>) {
        let (tx, rx) = mpsc::channel::<TransportCmd>();
        let (event_tx, event_rx) = mpsc::channel::<TransportEvent>();
        let handle = spawn_audio_thread(rx, event_tx);

        let transport = Self {
            tx,
            join: Mutex::new(Some(handle)),
        };
        (transport, event_rx)
    }

    fn send(&self, cmd: TransportCmd) {
        if let Err(e) = self.tx.send(cmd) {
            log::warn!("audio thread is gone, dropping {:?}", e.0);
        }
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn shutdown(&self) {
        let _ = self.tx.send(TransportCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Transport for RodioTransport {
    fn load(&mut self, locator: &str, stamp: Stamp) {
        self.send(TransportCmd::Load {
            locator: locator.to_string(),
            stamp,
        });
    }

    fn play(&mut self) {
        self.send(TransportCmd::Play);
    }

    fn pause(&mut self) {
        self.send(TransportCmd::Pause);
    }

    fn seek(&mut self, position: Duration, stamp: Stamp) {
        self.send(TransportCmd::Seek { position, stamp });
    }
}

impl Drop for RodioTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}
