use std::env;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::RodioTransport;
use crate::capture::{CapturePipeline, backend_from_settings};
use crate::mood::{Detection, HttpMoodService};
use crate::playback::PlaybackController;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub use logging::default_log_path;

/// Run the terminal player until the user quits.
///
/// An optional first argument names a local library directory, overriding
/// `library.dir` from the config.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut settings, fallback_reason) = settings::load_settings();
    if let Some(dir) = env::args_os().nth(1) {
        settings.library.dir = Some(dir.into());
    }

    let log_path = logging::init(&settings.logging)?;
    if let Some(reason) = fallback_reason {
        log::warn!("{reason}");
    }
    log::info!("moodplay starting, logging to {}", log_path.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("moodplay-worker")
        .enable_all()
        .build()?;

    let service = HttpMoodService::new(&settings.service)?;
    let (catalog, source) = startup::load_catalog(&runtime, &service, &settings.library);
    let mut app = App::new(catalog, source);

    let (transport, transport_rx) = RodioTransport::spawn();
    let mut player = PlaybackController::new(transport);

    let (mut pipeline, capture_rx) = CapturePipeline::new(
        runtime.handle().clone(),
        backend_from_settings(&settings.capture),
        Arc::new(service),
        settings.capture.clone(),
    );
    let (detected_tx, detected_rx) = mpsc::channel::<Detection>();
    pipeline.set_on_tracks_detected(move |detection| {
        let _ = detected_tx.send(detection);
    });

    let mut channels = event_loop::Channels {
        transport: transport_rx,
        capture: capture_rx,
        detected: detected_rx,
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut player,
            &mut pipeline,
            &mut channels,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(pipeline);
    drop(player);
    runtime.shutdown_timeout(Duration::from_millis(500));
    log::info!("moodplay stopped");

    run_result
}
