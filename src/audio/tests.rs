use std::path::PathBuf;
use std::time::Duration;

use super::source::SourceKind;
use super::thread::Clock;
use super::types::Stamp;

#[test]
fn source_kind_recognizes_remote_and_local_locators() {
    assert_eq!(
        SourceKind::from_locator("https://cdn.example/a.mp3"),
        SourceKind::Remote("https://cdn.example/a.mp3".into())
    );
    assert_eq!(
        SourceKind::from_locator("  HTTP://cdn.example/a.mp3 "),
        SourceKind::Remote("HTTP://cdn.example/a.mp3".into())
    );
    assert_eq!(
        SourceKind::from_locator("file:///srv/music/a.mp3"),
        SourceKind::Local(PathBuf::from("/srv/music/a.mp3"))
    );
    assert_eq!(
        SourceKind::from_locator("music/happy/a.ogg"),
        SourceKind::Local(PathBuf::from("music/happy/a.ogg"))
    );
}

#[test]
fn stamp_source_bump_also_moves_cue() {
    let s = Stamp::default().next_source();
    assert_eq!(s, Stamp { source: 1, cue: 1 });
    let s = s.next_cue().next_cue();
    assert_eq!(s, Stamp { source: 1, cue: 3 });
}

#[test]
fn clock_accumulates_only_while_running() {
    let mut clock = Clock::default();
    clock.reset(Duration::from_secs(10));
    assert_eq!(clock.elapsed(), Duration::from_secs(10));

    clock.resume();
    std::thread::sleep(Duration::from_millis(20));
    clock.pause();
    let paused_at = clock.elapsed();
    assert!(paused_at >= Duration::from_millis(10_020));

    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(clock.elapsed(), paused_at);
}
