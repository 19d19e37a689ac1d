//! Test utilities for ayurcare-tui render and interaction tests.

use crate::app::App;
pub use crate::headless::buffer_to_string;
use crate::screens::Screen as ScreenTrait;
use async_trait::async_trait;
use ayurcare_engine::{GatewayError, HistoryEntry, ResponseGateway};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{buffer::Buffer, layout::Rect};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 100;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 30;

/// Gateway that replays scripted outcomes in order, then empty replies.
#[derive(Default)]
pub struct ScriptedGateway {
    outcomes: Mutex<VecDeque<Result<Option<String>, GatewayError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(outcomes: Vec<Result<Option<String>, GatewayError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Messages received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseGateway for ScriptedGateway {
    async fn respond(
        &self,
        message: &str,
        _history: &[HistoryEntry],
    ) -> Result<Option<String>, GatewayError> {
        self.calls.lock().unwrap().push(message.to_string());
        self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Create a test app backed by a scripted gateway.
pub fn create_test_app(outcomes: Vec<Result<Option<String>, GatewayError>>) -> App {
    App::new(Arc::new(ScriptedGateway::new(outcomes)), "gemini-test")
}

/// A key press without modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Type a string into the app one character at a time.
pub fn press_str(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

/// Render a screen at the given size and return it as text.
pub fn render_screen_to_string_sized<S: ScreenTrait>(
    screen: &S,
    app: &App,
    width: u16,
    height: u16,
) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

/// Render a screen at the default test size and return it as text.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    render_screen_to_string_sized(screen, app, TEST_WIDTH, TEST_HEIGHT)
}
