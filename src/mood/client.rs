use std::collections::BTreeMap;
use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::ServiceSettings;
use crate::library::{Catalog, Track};

use super::types::{ClassificationError, Detection, MoodClassifier, MoodLabel, Photo};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid service url {url:?}: {reason}")]
    Url { url: String, reason: String },
    #[error("service token is not a valid header value")]
    Token,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode service response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client for the catalog & mood service.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpMoodService {
    http: reqwest::Client,
    base: Url,
}

impl HttpMoodService {
    pub fn new(settings: &ServiceSettings) -> Result<Self, ServiceError> {
        let base = Url::parse(settings.base_url.trim()).map_err(|e| ServiceError::Url {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        if let Some(token) = settings.token.as_deref().filter(|t| !t.is_empty()) {
            let value =
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ServiceError::Token)?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("moodplay/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// `GET {base}/music/`: every track grouped by mood.
    pub async fn fetch_catalog(&self) -> Result<Catalog, ServiceError> {
        let url = self.endpoint("music/");
        log::debug!("fetching catalog from {url}");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let catalog = parse_catalog(&body, &self.base)?;
        log::info!("catalog: {} tracks in {} moods", catalog.len(), catalog.sections().count());
        Ok(catalog)
    }

    /// `POST {base}/public/musics/mood` with the photo as multipart field
    /// `photo`.
    pub async fn classify_photo(&self, photo: Photo) -> Result<Detection, ClassificationError> {
        let url = self.endpoint("public/musics/mood");
        log::debug!(
            "uploading {} ({} bytes, {}) to {url}",
            photo.file_name,
            photo.bytes.len(),
            photo.media_type
        );

        let part = Part::bytes(photo.bytes)
            .file_name(photo.file_name)
            .mime_str(&photo.media_type)
            .map_err(|e| {
                log::warn!("bad media type for upload: {e}");
                ClassificationError::default()
            })?;
        let form = Form::new().part("photo", part);

        let response = self.http.post(&url).multipart(form).send().await.map_err(|e| {
            log::warn!("classification request failed: {e}");
            ClassificationError::default()
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            log::warn!("classification response unreadable: {e}");
            ClassificationError::default()
        })?;

        parse_mood_response(status.as_u16(), &body, &self.base)
    }
}

impl MoodClassifier for HttpMoodService {
    fn classify(&self, photo: Photo) -> BoxFuture<'static, Result<Detection, ClassificationError>> {
        let service = self.clone();
        Box::pin(async move { service.classify_photo(photo).await })
    }
}

/// Resolve a track locator against the service base URL. Absolute URLs and
/// empty locators are returned unchanged.
pub fn resolve_locator(base: &Url, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || Url::parse(raw).is_ok() {
        return raw.to_string();
    }
    match base.join(raw) {
        Ok(url) => url.to_string(),
        Err(e) => {
            log::warn!("cannot resolve locator {raw:?}: {e}");
            raw.to_string()
        }
    }
}

/// Decode a list of track records, skipping the ones that fail validation.
fn decode_tracks(records: Vec<serde_json::Value>, base: &Url) -> Vec<Track> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Track>(record) {
            Ok(track) => Some(track.map_locators(|l| resolve_locator(base, l))),
            Err(e) => {
                log::warn!("skipping track record: {e}");
                None
            }
        })
        .collect()
}

pub fn parse_catalog(body: &str, base: &Url) -> Result<Catalog, ServiceError> {
    let raw: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(body)?;
    let mut catalog = Catalog::new();
    for (mood, records) in raw {
        catalog.insert_section(mood, decode_tracks(records, base));
    }
    Ok(catalog)
}

#[derive(Debug, Deserialize)]
struct MoodEnvelope {
    data: MoodPayload,
}

#[derive(Debug, Deserialize)]
struct MoodPayload {
    #[serde(default)]
    mood: Option<String>,
    #[serde(rename = "musicList", default)]
    music_list: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Interpret a classification response.
///
/// Non-2xx statuses fail with the body's `message` when it has one.
pub fn parse_mood_response(
    status: u16,
    body: &str,
    base: &Url,
) -> Result<Detection, ClassificationError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());
        log::warn!("classification rejected with {status}: {message:?}");
        return Err(message.map(ClassificationError::new).unwrap_or_default());
    }

    let envelope: MoodEnvelope = serde_json::from_str(body).map_err(|e| {
        log::warn!("classification response did not decode: {e}");
        ClassificationError::default()
    })?;

    let mood = MoodLabel::from_wire(envelope.data.mood.as_deref().unwrap_or_default());
    let tracks = decode_tracks(envelope.data.music_list, base);
    log::info!("classified as {mood:?} with {} tracks", tracks.len());
    Ok(Detection { mood, tracks })
}
