use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

use crate::config::LoggingSettings;

/// Default log location when none is configured.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("moodplay.log")
}

/// Send `log` output to a file so it never lands on the TUI.
///
/// The configured level is the base filter; `RUST_LOG` refines it.
pub fn init(settings: &LoggingSettings) -> io::Result<PathBuf> {
    let path = settings.file.clone().unwrap_or_else(default_log_path);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&settings.level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis();

    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
    Ok(path)
}
