use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_moodplay_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MOODPLAY_CONFIG_PATH", "/tmp/moodplay-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/moodplay-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("moodplay")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("moodplay")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_camera_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[service]
base_url = "https://moods.example/api"
token = "abc123"
timeout_secs = 7

[library]
dir = "/srv/music"
extensions = ["mp3"]
include_hidden = false

[capture]
camera = "synthetic"
jpeg_quality = 75
finish_delay_ms = 0

[ui]
header_text = "hello"
now_playing_time_fields = ["elapsed", "remaining"]
now_playing_time_separator = " | "

[controls]
scrub_seconds = 9

[logging]
level = "debug"
file = "/tmp/moodplay-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MOODPLAY_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("MOODPLAY__CONTROLS__SCRUB_SECONDS");

    let s = Settings::load().unwrap();
    assert_eq!(s.service.base_url, "https://moods.example/api");
    assert_eq!(s.service.token.as_deref(), Some("abc123"));
    assert_eq!(s.service.timeout_secs, 7);
    assert_eq!(s.library.dir, Some(std::path::PathBuf::from("/srv/music")));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.include_hidden);
    assert_eq!(s.capture.camera, CameraBackendSetting::TestPattern);
    assert_eq!(s.capture.jpeg_quality, 75);
    assert_eq!(s.capture.finish_delay_ms, 0);
    // untouched keys keep their defaults
    assert_eq!(s.capture.ideal_width, 640);
    assert_eq!(s.capture.min_height, 240);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.ui.now_playing_time_fields,
        vec![TimeField::Elapsed, TimeField::Remaining]
    );
    assert_eq!(s.ui.now_playing_time_separator, " | ");
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.logging.level, "debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
scrub_seconds = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MOODPLAY_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("MOODPLAY__CONTROLS__SCRUB_SECONDS", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 30);
}

#[test]
fn validate_rejects_out_of_range_capture_settings() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.capture.progress_cap = 100.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.capture.jpeg_quality = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.capture.min_width = 1024;
    assert!(s.validate().is_err());
}

#[test]
fn schema_sections_parse_from_plain_toml() {
    let s: Settings = toml::from_str(
        r#"
[capture]
camera = "none"
progress_cap = 80.0
"#,
    )
    .unwrap();
    assert_eq!(s.capture.camera, CameraBackendSetting::Disabled);
    assert_eq!(s.capture.progress_cap, 80.0);
    assert_eq!(s.service.timeout_secs, 30);
}
