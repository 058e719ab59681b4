use std::time::Duration;

use super::model::Track;

/// Artists joined for a single status line, e.g. `"Energy Band, Power Duo"`.
pub fn artists_line(track: &Track) -> String {
    track.artists.join(", ")
}

/// Format a `Duration` as `M:SS`, truncating partial seconds.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
