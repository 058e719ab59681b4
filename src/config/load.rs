use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `MOODPLAY__`) override it, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MOODPLAY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let c = &self.capture;
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err("capture.jpeg_quality must be within 1..=100".to_string());
        }
        if !(0.0..100.0).contains(&c.progress_cap) {
            return Err("capture.progress_cap must be >= 0 and < 100".to_string());
        }
        if c.progress_step_max <= 0.0 {
            return Err("capture.progress_step_max must be > 0".to_string());
        }
        if c.progress_tick_ms == 0 {
            return Err("capture.progress_tick_ms must be >= 1".to_string());
        }
        if c.min_width > c.ideal_width || c.min_height > c.ideal_height {
            return Err("capture.min_* must not exceed capture.ideal_*".to_string());
        }
        if self.service.base_url.trim().is_empty() {
            return Err("service.base_url must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `MOODPLAY_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MOODPLAY_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/moodplay/config.toml`
/// or `~/.config/moodplay/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("moodplay").join("config.toml"))
}
