//! ayurcare-tui: Terminal UI for the AyurCare wellness assistant
//!
//! This crate provides the interactive session view, including:
//! - The chat screen with therapy sidebar and quick actions
//! - Help, quit and therapy detail overlays
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, Focus};
pub use ayurcare_engine;
pub use event::{Action, Event, EventHandler};

use ayurcare_engine::ResponseGateway;
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, buffer::Buffer, layout::Rect, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::info;

/// Tick rate for animations and notification expiry.
const TICK_RATE_MS: u64 = 250;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Options for an interactive session.
pub struct TuiOptions {
    /// Gateway answering chat messages.
    pub gateway: Arc<dyn ResponseGateway>,
    /// Model label shown in the header and status bar.
    pub model_label: String,
    /// Notification shown when the session opens.
    pub startup_notice: Option<String>,
}

/// Render the whole app: the chat screen plus any open overlay.
pub(crate) fn render_app(app: &App, area: Rect, buf: &mut Buffer) {
    screens::chat::ChatScreen.render(app, area, buf);
    screens::render_overlays(app, area, buf);
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop until the user quits, and
/// restores the terminal on exit.
pub async fn run_tui(options: TuiOptions) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options.gateway, options.model_label);
    if let Some(notice) = options.startup_notice {
        app.set_notification(notice);
    }
    info!(gateway = app.gateway_name(), "Session started");

    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;
    info!(messages = app.store.len(), "Session ended");

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.set_viewport_width(area.width);
            render_app(app, area, frame.buffer_mut());
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                    MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                    _ => {}
                },
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {}
            }
        }

        app.poll_response().await;

        if app.should_quit {
            app.abort_in_flight();
            break;
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
