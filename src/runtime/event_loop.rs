use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::{App, InputMode};
use crate::audio::{Transport, TransportEvent};
use crate::capture::{CaptureEvent, CapturePhase, CapturePipeline, SelectedFile};
use crate::config;
use crate::mood::Detection;
use crate::playback::{Direction, PlaybackController};
use crate::ui;

/// Everything the loop drains between frames.
pub struct Channels {
    pub transport: mpsc::Receiver<TransportEvent>,
    pub capture: UnboundedReceiver<CaptureEvent>,
    pub detected: mpsc::Receiver<Detection>,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Id of the active track as of the last frame; the cursor follows it
    /// when playback moves on by itself.
    last_track_id: Option<String>,
}

/// Main terminal event loop: drains background events, draws, and handles
/// input. Returns `Ok(())` when shutdown is requested.
pub fn run<T: Transport>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<T>,
    pipeline: &mut CapturePipeline,
    channels: &mut Channels,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = channels.transport.try_recv() {
            player.handle_transport_event(ev);
        }
        while let Ok(ev) = channels.capture.try_recv() {
            pipeline.handle_event(ev);
        }
        while let Ok(detection) = channels.detected.try_recv() {
            app.apply_detection(detection, player);
        }

        let current = player.session().track().map(|t| t.id.clone());
        if current != state.last_track_id {
            if let Some(track) = player.session().track() {
                app.follow(track);
            }
            state.last_track_id = current;
        }

        terminal.draw(|f| {
            ui::draw(f, app, player, pipeline, &settings.ui, &settings.controls)
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, pipeline) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns true when the user asked to quit.
fn handle_key_event<T: Transport>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<T>,
    pipeline: &mut CapturePipeline,
) -> bool {
    if app.input_mode == InputMode::FilePath {
        handle_path_input(key, app, pipeline);
        return false;
    }

    if pipeline.is_open() {
        handle_dialog_key(key, app, pipeline);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') => app.next(),
        KeyCode::Char('k') => app.prev(),
        KeyCode::Enter => app.activate_selected(player),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            player.toggle_playback();
        }
        KeyCode::Char('l') => {
            player.advance(Direction::Next);
        }
        KeyCode::Char('h') => {
            player.advance(Direction::Previous);
        }
        KeyCode::Char('L') => {
            let step = Duration::from_secs(settings.controls.scrub_seconds);
            let at = player.session().elapsed().saturating_add(step);
            player.seek(at);
        }
        KeyCode::Char('H') => {
            let step = Duration::from_secs(settings.controls.scrub_seconds);
            let at = player.session().elapsed().saturating_sub(step);
            player.seek(at);
        }
        KeyCode::Char('m') => {
            app.clear_status();
            pipeline.open();
        }
        _ => {}
    }

    false
}

fn handle_dialog_key(key: KeyEvent, app: &mut App, pipeline: &mut CapturePipeline) {
    match key.code {
        KeyCode::Char('c') => match pipeline.phase() {
            CapturePhase::Selection => {
                pipeline.start_camera();
            }
            CapturePhase::LiveCamera => {
                pipeline.capture();
            }
            _ => {}
        },
        KeyCode::Char('f') if pipeline.phase() == CapturePhase::Selection => {
            app.begin_path_input();
        }
        KeyCode::Char('r') => {
            pipeline.retake();
        }
        KeyCode::Char('a') => {
            pipeline.analyze();
        }
        KeyCode::Char('x') => {
            pipeline.cancel();
        }
        KeyCode::Esc | KeyCode::Char('q') => {
            pipeline.close();
        }
        _ => {}
    }
}

fn handle_path_input(key: KeyEvent, app: &mut App, pipeline: &mut CapturePipeline) {
    match key.code {
        KeyCode::Esc => app.cancel_path_input(),
        KeyCode::Backspace => app.pop_path_char(),
        KeyCode::Enter => {
            let Some(path) = app.take_path_input() else {
                return;
            };
            match SelectedFile::from_path(&path) {
                Ok(file) => {
                    pipeline.select_file(file);
                }
                Err(e) => {
                    log::warn!("cannot read {}: {e}", path.display());
                    app.set_status(format!("Cannot read {}: {e}", path.display()));
                }
            }
        }
        KeyCode::Char(c) if !c.is_control() => app.push_path_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use futures_util::future::BoxFuture;
    use tokio::runtime::Handle;

    use crate::app::CatalogSource;
    use crate::audio::Stamp;
    use crate::capture::NoCamera;
    use crate::library::Catalog;
    use crate::mood::{ClassificationError, MoodClassifier, Photo};

    struct SilentTransport;

    impl Transport for SilentTransport {
        fn load(&mut self, _locator: &str, _stamp: Stamp) {}
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn seek(&mut self, _position: Duration, _stamp: Stamp) {}
    }

    struct NeverAnswers;

    impl MoodClassifier for NeverAnswers {
        fn classify(&self, _photo: Photo) -> BoxFuture<'static, Result<Detection, ClassificationError>> {
            Box::pin(futures_util::future::pending())
        }
    }

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn q_in_dialog_closes_it_without_quitting() {
        let settings = config::Settings::default();
        let mut app = App::new(Catalog::new(), CatalogSource::Empty);
        let mut player = PlaybackController::new(SilentTransport);
        let (mut pipeline, _rx) = CapturePipeline::new(
            Handle::current(),
            Arc::new(NoCamera),
            Arc::new(NeverAnswers),
            settings.capture.clone(),
        );
        pipeline.open();

        let quit = handle_key_event(press('q'), &settings, &mut app, &mut player, &mut pipeline);
        assert!(!quit);
        assert!(!pipeline.is_open());

        // With the dialog gone, q quits.
        assert!(handle_key_event(press('q'), &settings, &mut app, &mut player, &mut pipeline));
    }
}
