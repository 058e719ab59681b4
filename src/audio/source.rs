//! Resolving an audio locator into decodable bytes.
//!
//! Remote sources are fetched whole before playback; the bytes are kept so
//! a seek can rebuild the decoder without another round trip.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, Sink, Source};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Http { url: String, source: reqwest::Error },
    #[error("failed to decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("no audio output device: {0}")]
    Output(String),
}

/// Where a locator points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Remote(String),
    Local(PathBuf),
}

impl SourceKind {
    pub fn from_locator(locator: &str) -> Self {
        let trimmed = locator.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Remote(trimmed.to_string())
        } else if let Some(rest) = trimmed.strip_prefix("file://") {
            Self::Local(PathBuf::from(rest))
        } else {
            Self::Local(PathBuf::from(trimmed))
        }
    }
}

pub(super) struct LoadedSource {
    bytes: Arc<[u8]>,
    pub(super) duration: Option<Duration>,
}

impl LoadedSource {
    pub(super) fn fetch(
        locator: &str,
        http: &reqwest::blocking::Client,
    ) -> Result<Self, TransportError> {
        let bytes: Vec<u8> = match SourceKind::from_locator(locator) {
            SourceKind::Local(path) => {
                std::fs::read(&path).map_err(|source| TransportError::Io { path, source })?
            }
            SourceKind::Remote(url) => http
                .get(&url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .map(|b| b.to_vec())
                .map_err(|source| TransportError::Http { url, source })?,
        };
        let bytes: Arc<[u8]> = Arc::from(bytes);
        let duration = probe_duration(&bytes);

        // Decode once up front so a broken file fails the load, not the first play.
        let decoder = Decoder::new(Cursor::new(bytes.clone()))?;
        let duration = duration.or_else(|| decoder.total_duration());

        Ok(Self { bytes, duration })
    }

    /// Create a paused `Sink` that starts playback at `start_at`.
    pub(super) fn sink_at(
        &self,
        stream: &OutputStream,
        start_at: Duration,
    ) -> Result<Sink, TransportError> {
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        let source = Decoder::new(Cursor::new(self.bytes.clone()))?.skip_duration(start_at);

        let sink = Sink::connect_new(stream.mixer());
        sink.append(source);
        sink.pause();
        Ok(sink)
    }
}

fn probe_duration(bytes: &Arc<[u8]>) -> Option<Duration> {
    let probe = Probe::new(Cursor::new(bytes.clone())).guess_file_type().ok()?;
    let tagged = probe.read().ok()?;
    let d = tagged.properties().duration();
    (d > Duration::ZERO).then_some(d)
}
