mod app;
mod config;
mod feed;
mod fetcher;
mod logging;
mod model;
mod schema;
mod scroll;
mod topics;
mod ui;

use anyhow::{Context, Result};
use app::{App, AppEvent};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fetcher::HttpSource;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = logging::init()?;

    let config = Config::load()?;
    tracing::info!(
        generator = config.generator.label(),
        page_size = config.page_size,
        "starting reelfeed"
    );
    tracing::debug!(
        schema = %schema::project_schema(&config.baas.project_id),
        "expected BaaS project schema"
    );

    let source = HttpSource::new(&config).context("Failed to build HTTP client")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, config, Arc::new(source)).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "reelfeed exited with an error");
    }
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    source: Arc<HttpSource>,
) -> Result<()> {
    let (tx_app_event, mut rx_app_event) = mpsc::channel::<AppEvent>(100);

    // Input loop
    let (tx_term_event, mut rx_term_event) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match event::poll(Duration::from_millis(50)) {
            Ok(true) => {
                if let Ok(evt) = event::read() {
                    if tx_term_event.send(evt).is_err() {
                        break;
                    }
                }
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "terminal poll failed");
                break;
            }
        }
    });

    // Tick loop
    let tx_tick = tx_app_event.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(80));
        loop {
            interval.tick().await;
            if tx_tick.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    let height = ui::feed_height(terminal.size()?.height);
    let mut app = App::new(config, source, tx_app_event, height);
    app.start();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, &app))?;

        tokio::select! {
            Some(event) = rx_app_event.recv() => app.handle_internal_event(event),
            Some(event) = rx_term_event.recv() => {
                match event {
                    Event::Key(key) => {
                        match key.code {
                            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                            _ => app.handle_key_event(key),
                        }
                    }
                    Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                    Event::Resize(_, height) => app.resize(ui::feed_height(height)),
                    _ => {}
                }
            }
            else => break,
        }
    }

    Ok(())
}
