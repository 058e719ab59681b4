use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/moodplay/config.toml` or `~/.config/moodplay/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MOODPLAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service: ServiceSettings,
    pub library: LibrarySettings,
    pub capture: CaptureSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL of the catalog & mood service. Relative track locators are
    /// resolved against it.
    pub base_url: String,
    /// Bearer token attached to every request, if any.
    pub token: Option<String>,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Local library used when the service cannot be reached.
    /// Layout: `<dir>/<mood>/<audio files>`.
    pub dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            dir: None,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraBackendSetting {
    /// No camera hardware; every acquisition reports the device as missing.
    #[serde(alias = "none", alias = "off")]
    Disabled,
    /// Synthetic gradient frames, handy for demos and terminals without a webcam.
    #[serde(alias = "test_pattern", alias = "synthetic")]
    TestPattern,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub camera: CameraBackendSetting,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// JPEG quality for frames frozen from the camera (1-100).
    pub jpeg_quality: u8,
    /// Interval between cosmetic upload progress steps (milliseconds).
    pub progress_tick_ms: u64,
    /// Largest random increment per progress step (percent).
    pub progress_step_max: f32,
    /// Progress never passes this value before the response arrives.
    pub progress_cap: f32,
    /// Pause between a successful response and handing tracks over (milliseconds).
    pub finish_delay_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            camera: CameraBackendSetting::Disabled,
            ideal_width: 640,
            ideal_height: 480,
            min_width: 320,
            min_height: 240,
            jpeg_quality: 90,
            progress_tick_ms: 200,
            progress_step_max: 15.0,
            progress_cap: 90.0,
            finish_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which time fields to show for the status line, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ how are you feeling today? ~ ".to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter passed to `env_logger` (`RUST_LOG` still wins).
    pub level: String,
    /// Where log lines go. Defaults to `moodplay.log` in the temp dir so
    /// the terminal UI is left alone.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
