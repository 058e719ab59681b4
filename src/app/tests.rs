use std::time::Duration;

use super::*;
use crate::audio::{Stamp, Transport};
use crate::library::{Catalog, Track};
use crate::mood::{Detection, MoodLabel};
use crate::playback::{PlaybackController, PlaybackState};

#[derive(Default)]
struct NullTransport {
    loads: Vec<String>,
}

impl Transport for NullTransport {
    fn load(&mut self, locator: &str, _stamp: Stamp) {
        self.loads.push(locator.to_string());
    }
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn seek(&mut self, _position: Duration, _stamp: Stamp) {}
}

fn t(id: &str, mood: &str) -> Track {
    Track::new(id, id.to_uppercase(), vec!["Someone".into()], format!("/{id}.mp3"), "", vec![mood.into()])
        .unwrap()
}

fn catalog() -> Catalog {
    let mut c = Catalog::new();
    c.insert_section("sad", vec![t("s1", "sad")]);
    c.insert_section("happy", vec![t("h1", "happy"), t("h2", "happy")]);
    c
}

#[test]
fn entries_follow_section_order() {
    let app = App::new(catalog(), CatalogSource::Service);
    let ids: Vec<_> = app.entries().iter().map(|(m, t)| format!("{m}/{}", t.id)).collect();
    assert_eq!(ids, vec!["happy/h1", "happy/h2", "sad/s1"]);
}

#[test]
fn cursor_wraps_both_ways() {
    let mut app = App::new(catalog(), CatalogSource::Service);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
}

#[test]
fn cursor_on_empty_catalog_stays_put() {
    let mut app = App::new(Catalog::new(), CatalogSource::Empty);
    app.next();
    app.prev();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
}

#[test]
fn activate_plays_selection_with_whole_catalog_queued() {
    let mut app = App::new(catalog(), CatalogSource::Service);
    let mut player = PlaybackController::new(NullTransport::default());
    app.next();

    app.activate_selected(&mut player);
    assert_eq!(player.session().track().map(|t| t.id.as_str()), Some("h2"));
    assert_eq!(player.queue().len(), 3);
    assert_eq!(player.queue().index(), Some(1));
}

#[test]
fn activate_on_current_track_toggles() {
    let mut app = App::new(catalog(), CatalogSource::Service);
    let mut player = PlaybackController::new(NullTransport::default());

    app.activate_selected(&mut player);
    app.activate_selected(&mut player);
    assert_eq!(player.state(), PlaybackState::Paused);
    assert_eq!(player.transport().loads.len(), 1);
}

#[test]
fn detection_starts_first_track_and_announces() {
    let mut app = App::new(catalog(), CatalogSource::Service);
    let mut player = PlaybackController::new(NullTransport::default());
    let detection = Detection {
        mood: MoodLabel::Detected("sad".into()),
        tracks: vec![t("s1", "sad"), t("x9", "sad")],
    };

    app.apply_detection(detection, &mut player);
    assert_eq!(
        app.status(),
        Some("You are looking SAD! Playing recommended music.")
    );
    assert_eq!(player.session().track().map(|t| t.id.as_str()), Some("s1"));
    assert_eq!(player.queue().len(), 2);
    assert_eq!(app.selected, 2);
}

#[test]
fn empty_detection_only_announces() {
    let mut app = App::new(catalog(), CatalogSource::Service);
    let mut player = PlaybackController::new(NullTransport::default());
    let detection = Detection {
        mood: MoodLabel::NotFound,
        tracks: vec![],
    };

    app.apply_detection(detection, &mut player);
    assert_eq!(app.status(), Some("Sorry! Unable to analyse your mood"));
    assert_eq!(player.state(), PlaybackState::Empty);
}

#[test]
fn path_input_round_trip() {
    let mut app = App::new(Catalog::new(), CatalogSource::Empty);
    app.begin_path_input();
    assert_eq!(app.input_mode, InputMode::FilePath);
    for c in " /tmp/me.pngx".chars() {
        app.push_path_char(c);
    }
    app.pop_path_char();

    assert_eq!(app.take_path_input(), Some("/tmp/me.png".into()));
    assert_eq!(app.input_mode, InputMode::Browse);
    assert!(app.path_input().is_empty());
}

#[test]
fn blank_path_input_yields_nothing() {
    let mut app = App::new(Catalog::new(), CatalogSource::Empty);
    app.begin_path_input();
    app.push_path_char(' ');
    assert_eq!(app.take_path_input(), None);
}
