use std::collections::BTreeMap;

use serde::Deserialize;

use super::model::Track;

/// Tracks grouped by mood label, as served by `GET /music/`.
///
/// Sections are kept sorted by label so the browse list is stable between
/// fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    sections: BTreeMap<String, Vec<Track>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_section(&mut self, mood: impl Into<String>, tracks: Vec<Track>) {
        self.sections.entry(mood.into()).or_default().extend(tracks);
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &[Track])> {
        self.sections
            .iter()
            .map(|(mood, tracks)| (mood.as_str(), tracks.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Every track in section order. This is the queue used when a track is
    /// played from the browse list.
    pub fn flatten(&self) -> Vec<Track> {
        self.sections.values().flatten().cloned().collect()
    }

    /// Like `flatten`, but each track is paired with the section it was
    /// listed under.
    pub fn entries(&self) -> Vec<(String, Track)> {
        self.sections
            .iter()
            .flat_map(|(mood, tracks)| tracks.iter().map(move |t| (mood.clone(), t.clone())))
            .collect()
    }

    pub(crate) fn map_tracks(self, f: impl Fn(Track) -> Track) -> Self {
        let sections = self
            .sections
            .into_iter()
            .map(|(mood, tracks)| (mood, tracks.into_iter().map(&f).collect()))
            .collect();
        Self { sections }
    }
}
