//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, CatalogSource, InputMode};
use crate::audio::Transport;
use crate::capture::{CapturePhase, CapturePipeline};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::library::{Track, artists_line, format_mmss};
use crate::playback::{Direction, PlaybackController, PlaybackState};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("m", "detect mood");
    map.insert("q", "quit");
    map
});

static DIALOG_CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("c", "camera/capture");
    map.insert("f", "upload file");
    map.insert("r", "retake");
    map.insert("a", "analyze");
    map.insert("x", "cancel");
    map.insert("esc", "close");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "h/l", "H/L", "enter", "space/p", "m", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn dialog_controls_text(keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| DIALOG_CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join("  ")
}

fn track_line(track: &Track) -> String {
    format!("{} - {}", track.title, artists_line(track))
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    if ui.now_playing_time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn status_text<T: Transport>(
    app: &App,
    player: &PlaybackController<T>,
    ui_settings: &UiSettings,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    let session = player.session();

    match (session.track(), player.state()) {
        (Some(track), state) => {
            let song = track_line(track);
            match now_playing_time_text(session.elapsed(), session.duration(), ui_settings) {
                Some(time) => parts.push(format!(" Song: {} [{}]", song, time)),
                None => parts.push(format!(" Song: {}", song)),
            }
            let state = if state == PlaybackState::Playing {
                "Playing"
            } else {
                "Paused"
            };
            parts.push(state.to_string());
        }
        (None, _) => parts.push(" Nothing playing".to_string()),
    }

    let mut nav = Vec::new();
    if player.can_advance(Direction::Previous) {
        nav.push("prev");
    }
    if player.can_advance(Direction::Next) {
        nav.push("next");
    }
    if let Some(i) = player.queue().index() {
        parts.push(format!("Queue: {}/{}", i + 1, player.queue().len()));
    }
    if !nav.is_empty() {
        parts.push(format!("Skip: {}", nav.join("/")));
    }

    let source = match app.source {
        CatalogSource::Service => "Source: service",
        CatalogSource::LocalLibrary => "Source: local library",
        CatalogSource::Empty => "Source: none",
    };
    parts.push(source.to_string());

    let mut text = parts.join(" • ");
    if let Some(err) = session.last_error() {
        text.push_str(&format!("\n Could not play: {}", err));
    }
    if let Some(msg) = app.status() {
        text.push_str(&format!("\n {}", msg));
    }
    text
}

fn dialog_text(app: &App, pipeline: &CapturePipeline) -> (String, String) {
    let session = pipeline.session();
    let mut lines: Vec<String> = Vec::new();

    let keys: &[&str] = match session.phase() {
        CapturePhase::Selection => {
            lines.push("Choose how you'd like to capture your photo for mood detection.".into());
            if pipeline.is_acquiring() {
                lines.push("Starting camera...".into());
            } else if pipeline.camera_allowed() {
                lines.push("Take Photo [c]  or  Upload Image [f]".into());
            } else {
                lines.push("Take Photo (unavailable)  or  Upload Image [f]".into());
            }
            &["c", "f", "x", "esc"]
        }
        CapturePhase::LiveCamera => {
            lines.push("Position yourself in the camera and capture when ready.".into());
            if pipeline.is_encoding() {
                lines.push("Capturing...".into());
            } else if pipeline.camera_ready() {
                let res = session
                    .device_resolution()
                    .map(|r| format!(" ({r})"))
                    .unwrap_or_default();
                lines.push(format!("Camera ready{res}"));
            } else {
                lines.push("Starting camera...".into());
            }
            &["c", "x", "esc"]
        }
        CapturePhase::FrozenPreview => {
            lines.push("Review your photo and analyze your mood.".into());
            if let Some(image) = session.pending_image() {
                lines.push(format!("Photo: {}", image.describe()));
            }
            if pipeline.can_retake() {
                &["a", "r", "x", "esc"]
            } else {
                &["a", "x", "esc"]
            }
        }
        CapturePhase::Uploading => {
            lines.push("Analyzing your mood...".into());
            &[]
        }
    };

    if let Some(err) = session.error() {
        lines.push(String::new());
        lines.push(format!("! {}", err));
    }

    if app.input_mode == InputMode::FilePath {
        lines.push(String::new());
        lines.push(format!("Image path: {}_", app.path_input()));
        return (lines.join("\n"), "[enter] upload  [esc] back".to_string());
    }

    (lines.join("\n"), dialog_controls_text(keys))
}

fn draw_capture_dialog(frame: &mut Frame, area: Rect, app: &App, pipeline: &CapturePipeline) {
    let popup_area = centered_rect_sized(68, 12, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" detect your mood ")
        .title_alignment(Alignment::Center)
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        });
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let (body, keys) = dialog_text(app, pipeline);
    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: true }), rows[0]);

    if let Some(progress) = pipeline.session().progress() {
        if pipeline.phase() == CapturePhase::Uploading {
            let ratio = f64::from(progress.clamp(0.0, 100.0)) / 100.0;
            let gauge = Gauge::default()
                .ratio(ratio)
                .label(format!("{:.0}%", progress))
                .gauge_style(Style::default().add_modifier(Modifier::BOLD));
            frame.render_widget(gauge, rows[1]);
        }
    }

    frame.render_widget(Paragraph::new(keys).dim(), rows[2]);
}

/// Render the entire UI into the provided `frame`.
pub fn draw<T: Transport>(
    frame: &mut Frame,
    app: &App,
    player: &PlaybackController<T>,
    pipeline: &CapturePipeline,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());
    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" moodplay ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_par = Paragraph::new(status_text(app, player, ui_settings))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        let entries = app.entries();
        let current = player.session().track();

        // Center the selected item when possible by creating a visible window.
        // Important: only build ListItems for the visible window (avoid allocating the entire list).
        let total = entries.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = entries[start..end]
            .iter()
            .map(|(mood, track)| {
                let marker = if current.is_some_and(|c| c.same_as(track)) {
                    "♪ "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}[{mood}] {}", track_line(track)))
            })
            .collect();

        let title = if total == 0 {
            " tracks (none yet, press m to detect your mood) ".to_string()
        } else {
            format!(" tracks ({total}) ")
        };
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    if pipeline.is_open() {
        draw_capture_dialog(frame, chunks[2], app, pipeline);
    }

    let footer_text = controls_text(controls_settings.scrub_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_text_includes_scrub_and_mood_keys() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] scrub -/+7s"));
        assert!(text.contains("[m] detect mood"));
        assert!(text.starts_with("[j/k] up/down"));
    }

    #[test]
    fn time_text_honors_field_order() {
        let ui = UiSettings {
            now_playing_time_fields: vec![TimeField::Remaining, TimeField::Elapsed],
            now_playing_time_separator: " | ".into(),
            ..UiSettings::default()
        };
        let text = now_playing_time_text(
            Duration::from_secs(30),
            Some(Duration::from_secs(90)),
            &ui,
        );
        assert_eq!(text.as_deref(), Some("-1:00 | 0:30"));
    }

    #[test]
    fn time_text_skips_unknown_total() {
        let ui = UiSettings::default();
        let text = now_playing_time_text(Duration::from_secs(5), None, &ui);
        assert_eq!(text.as_deref(), Some("0:05"));
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 40, 10);
        let r = centered_rect_sized(68, 12, area);
        assert!(r.width <= 38 && r.height <= 8);
        assert_eq!(r.x, 1);
    }
}
