use serde::Deserialize;

/// A single playable item as delivered by the catalog or mood service.
///
/// Tracks are immutable once built; the only way to obtain one is through
/// [`Track::new`] or deserialization, both of which enforce a non-empty
/// artist list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "TrackRecord")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    /// Where the audio can be fetched from (URL or local path).
    pub audio: String,
    /// Where the artwork can be fetched from. May be empty.
    pub artwork: String,
    pub moods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackError {
    #[error("track {0:?} has no artists")]
    NoArtists(String),
    #[error("track has an empty id")]
    EmptyId,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artists: Vec<String>,
        audio: impl Into<String>,
        artwork: impl Into<String>,
        moods: Vec<String>,
    ) -> Result<Self, TrackError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TrackError::EmptyId);
        }
        let artists: Vec<String> = artists
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if artists.is_empty() {
            return Err(TrackError::NoArtists(id));
        }

        Ok(Self {
            id,
            title: title.into(),
            artists,
            audio: audio.into(),
            artwork: artwork.into(),
            moods,
        })
    }

    /// Whether `other` is the same catalog item (identity, not content).
    pub fn same_as(&self, other: &Track) -> bool {
        self.id == other.id
    }

    /// Return a copy with both locators passed through `resolve`.
    pub(crate) fn map_locators(mut self, resolve: impl Fn(&str) -> String) -> Self {
        self.audio = resolve(&self.audio);
        if !self.artwork.is_empty() {
            self.artwork = resolve(&self.artwork);
        }
        self
    }
}

/// Wire shape of a track record. The service uses `_id`, camelCase
/// locators and a `mood` field that is either one label or a list.
#[derive(Debug, Deserialize)]
struct TrackRecord {
    #[serde(alias = "_id")]
    id: String,
    title: String,
    #[serde(default)]
    artists: Vec<String>,
    #[serde(rename = "audioUrl")]
    audio_url: String,
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
    #[serde(default)]
    mood: Option<MoodField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MoodField {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<TrackRecord> for Track {
    type Error = TrackError;

    fn try_from(r: TrackRecord) -> Result<Self, Self::Error> {
        let moods = match r.mood {
            Some(MoodField::One(m)) => vec![m],
            Some(MoodField::Many(ms)) => ms,
            None => Vec::new(),
        };
        let moods = moods
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        Track::new(
            r.id,
            r.title,
            r.artists,
            r.audio_url,
            r.image_url.unwrap_or_default(),
            moods,
        )
    }
}
