use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::tag::Accessor;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::catalog::Catalog;
use super::model::Track;

/// Section used for audio files placed directly under the library root.
pub(crate) const UNSORTED_MOOD: &str = "unsorted";

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const COVER_NAMES: [&str; 4] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png"];

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn find_cover(dir: &Path) -> Option<String> {
    COVER_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
        .map(|p| p.display().to_string())
}

/// Build a catalog from `root/<mood>/**/<audio files>`.
///
/// The first path component below `root` is the mood label. Title and
/// artist come from tags when present, otherwise from the file stem and a
/// placeholder artist.
pub fn scan(root: &Path, settings: &LibrarySettings) -> Catalog {
    let mut catalog = Catalog::new();
    let mut sections: Vec<(String, Track)> = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(settings.follow_links)
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let mood = if entry.depth() > 1 {
            rel.components()
                .next()
                .and_then(|c| c.as_os_str().to_str())
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| UNSORTED_MOOD.to_string())
        } else {
            UNSORTED_MOOD.to_string()
        };

        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist: Option<String> = None;

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                        title = v.trim().to_string();
                    }
                    if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                        artist = Some(v.trim().to_string());
                    }
                }
            }
            Err(e) => log::debug!("no tags for {}: {e}", path.display()),
        }

        let artwork = path.parent().and_then(find_cover).unwrap_or_default();
        let track = Track::new(
            rel.display().to_string(),
            title,
            vec![artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string())],
            path.display().to_string(),
            artwork,
            vec![mood.clone()],
        );

        match track {
            Ok(t) => sections.push((mood, t)),
            Err(e) => log::warn!("skipping {}: {e}", path.display()),
        }
    }

    sections.sort_by(|(ma, a), (mb, b)| {
        ma.cmp(mb)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    for (mood, track) in sections {
        catalog.insert_section(mood, vec![track]);
    }

    log::info!("scanned {} tracks from {}", catalog.len(), root.display());
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_groups_by_first_directory_and_sorts_titles() {
        let dir = tempdir().unwrap();
        let happy = dir.path().join("Happy");
        let sad = dir.path().join("sad");
        fs::create_dir_all(&happy).unwrap();
        fs::create_dir_all(sad.join("deeper")).unwrap();

        fs::write(happy.join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(happy.join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(happy.join("notes.txt"), b"ignore me").unwrap();
        fs::write(sad.join("deeper").join("blue.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("loose.mp3"), b"not real").unwrap();

        let catalog = scan(dir.path(), &LibrarySettings::default());
        let sections: Vec<(String, Vec<String>)> = catalog
            .sections()
            .map(|(m, ts)| (m.to_string(), ts.iter().map(|t| t.title.clone()).collect()))
            .collect();

        assert_eq!(
            sections,
            vec![
                ("happy".to_string(), vec!["A".to_string(), "b".to_string()]),
                ("sad".to_string(), vec!["blue".to_string()]),
                (UNSORTED_MOOD.to_string(), vec!["loose".to_string()]),
            ]
        );
        let first = &catalog.flatten()[0];
        assert_eq!(first.artists, vec![UNKNOWN_ARTIST.to_string()]);
        assert_eq!(first.moods, vec!["happy".to_string()]);
    }

    #[test]
    fn scan_respects_include_hidden_false_and_picks_up_cover() {
        let dir = tempdir().unwrap();
        let calm = dir.path().join("calm");
        fs::create_dir_all(&calm).unwrap();
        fs::write(calm.join(".hidden.mp3"), b"not real").unwrap();
        fs::write(calm.join("visible.mp3"), b"not real").unwrap();
        fs::write(calm.join("cover.jpg"), b"jpeg-ish").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings).flatten();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "visible");
        assert!(tracks[0].artwork.ends_with("cover.jpg"));
    }
}
