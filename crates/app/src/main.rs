//! keydrill binary: configuration, logging, terminal lifecycle, and the
//! main event/render loop.

use std::fs::OpenOptions;
use std::io::{Stdout, stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use services::{AppConfig, HttpScoreStore, QuizService};
use ui::UiApp;

const FRAME_DURATION: Duration = Duration::from_millis(33);
const LOG_FILE: &str = "keydrill.log";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = LOG_FILE, "logging initialized");
        }
        Err(_) => {
            // No log file: prefer silence over corrupting the TUI by
            // writing to stdout/stderr.
            tracing_subscriber::registry().with(env_filter).init();
        }
    }
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode, the alternate screen, and (where supported) keyboard
/// enhancement flags so modifier chords like shift+enter are reported.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    enhanced_keys: bool,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keys {
            let _ = execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            );
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self {
            terminal,
            enhanced_keys,
        })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.enhanced_keys {
            let _ = execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<()> {
    init_tracing();

    // Missing configuration is fatal before any terminal state changes.
    let config = AppConfig::from_env().context("keydrill is not configured")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let store = Arc::new(HttpScoreStore::new(
        config.store_url.clone(),
        config.store_key.clone(),
    ));
    let service = Arc::new(QuizService::new(store, config.access_password.clone()));
    let mut app = UiApp::new(service, runtime.handle().clone());

    let mut session = TerminalSession::new()?;
    let result = run(&mut session.terminal, &mut app);
    drop(session);
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut UiApp) -> Result<()> {
    while !app.should_quit() {
        app.tick();
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(FRAME_DURATION)?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(&key);
        }
    }
    Ok(())
}
