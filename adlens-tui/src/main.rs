//! adlens-tui: terminal client for the adlens dashboard
//!
//! Settles the session before the first frame is drawn, then offers the
//! three dashboard views behind the sign-in guard.

mod app;
mod input;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, AppResult};
use crate::input::handle_key;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to file, stdout belongs to the terminal UI
    let log_file = dirs::cache_dir()
        .map(|d| d.join("adlens").join("tui.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("/tmp/adlens-tui.log"));

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        log_file.parent().unwrap_or(std::path::Path::new("/tmp")),
        log_file
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("adlens-tui.log")),
    );

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adlens_tui=debug,adlens_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(file_appender))
        .init();

    let config = adlens_core::Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to default config");
        adlens_core::Config::default()
    });
    let tick = Duration::from_millis(config.tui.tick_ms);

    // The lifecycle pass finishes before any view exists
    let mut app = App::new(config)?;
    app.seed_credentials();
    app.check_session().await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, tick).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.persist_credentials();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick: Duration,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                match handle_key(app, key).await {
                    AppResult::Continue => {}
                    AppResult::Quit => return Ok(()),
                }
            }
        }

        app.tick();
    }
}
