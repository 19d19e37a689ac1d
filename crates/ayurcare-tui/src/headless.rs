//! Headless mode for the AyurCare TUI.
//!
//! Runs the real app and screen against a `TestBackend` so end-to-end
//! behavior can be driven without a terminal. Keys go in over a channel;
//! the rendered screen and a few state flags come back after every frame.

use crate::app::{App, Focus};
use crate::event::Action;
use crate::render_app;
use ayurcare_engine::ResponseGateway;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 100;
pub const DEFAULT_HEIGHT: u16 = 30;

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Whether the TUI should quit.
    pub should_quit: bool,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Number of messages in the conversation.
    pub message_count: usize,
    /// Whether a reply is pending.
    pub awaiting_response: bool,
    /// Current input text.
    pub input: String,
    /// Element receiving plain keys.
    pub focus: Focus,
}

enum Input {
    Key(KeyEvent),
    Action(Action),
}

/// Handle to control a headless TUI instance.
pub struct HeadlessHandle {
    input_tx: mpsc::UnboundedSender<Input>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send a key press. Returns `false` once the TUI has stopped.
    pub fn send_key(&self, key: KeyEvent) -> bool {
        self.input_tx.send(Input::Key(key)).is_ok()
    }

    /// Send a key code without modifiers.
    pub fn press(&self, code: KeyCode) -> bool {
        self.send_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Type text one character at a time.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars().all(|c| self.press(KeyCode::Char(c)))
    }

    /// Send an action directly, bypassing key mapping.
    pub fn send_action(&self, action: Action) -> bool {
        self.input_tx.send(Input::Action(action)).is_ok()
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            if tokio::time::timeout(remaining, self.state_rx.changed())
                .await
                .map_or(true, |changed| changed.is_err())
            {
                return None;
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen_contents.contains(text), timeout)
            .await
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: u16,
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
    /// Model label shown in the header.
    pub model_label: String,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 20,
            model_label: "headless".to_string(),
        }
    }
}

/// Run the TUI in headless mode against the given gateway.
///
/// Returns a handle to control the TUI and a join handle for the background task.
pub fn run_tui_headless(
    gateway: Arc<dyn ResponseGateway>,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(gateway, config, input_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    (HeadlessHandle { input_tx, state_rx }, task)
}

async fn run_headless_loop(
    gateway: Arc<dyn ResponseGateway>,
    config: HeadlessConfig,
    mut input_rx: mpsc::UnboundedReceiver<Input>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let backend = TestBackend::new(config.width, config.height);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(gateway, config.model_label);
    let tick_duration = Duration::from_millis(config.tick_rate_ms);

    loop {
        app.poll_response().await;

        terminal.draw(|frame| {
            let area = frame.area();
            app.set_viewport_width(area.width);
            render_app(&app, area, frame.buffer_mut());
        })?;

        let _ = state_tx.send(HeadlessState {
            screen_contents: buffer_to_string(terminal.backend().buffer()),
            should_quit: app.should_quit,
            show_help: app.show_help,
            message_count: app.store.len(),
            awaiting_response: app.is_typing(),
            input: app.input.content().to_string(),
            focus: app.focus,
        });

        if app.should_quit {
            app.abort_in_flight();
            break;
        }

        tokio::select! {
            input = input_rx.recv() => match input {
                Some(Input::Key(key)) => app.handle_key(key),
                Some(Input::Action(action)) => app.handle_action(action),
                None => {
                    app.abort_in_flight();
                    break;
                }
            },
            () = tokio::time::sleep(tick_duration) => app.tick(),
        }
    }

    Ok(())
}

/// Convert a terminal buffer to text, one line per row, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        let mut line = String::new();
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        result.push_str(line.trim_end());
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedGateway;
    use ayurcare_engine::GatewayError;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_headless_config_default() {
        let config = HeadlessConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
    }

    #[test]
    fn test_buffer_to_string() {
        use ratatui::layout::Rect;
        use ratatui::style::Style;

        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", Style::default());
        buffer.set_string(0, 1, "World", Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\nWorld");
    }

    #[tokio::test]
    async fn test_headless_exchange() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(Some(
            "Vata relates to air and space.".into(),
        ))]));
        let (mut handle, task) = run_tui_headless(gateway.clone(), HeadlessConfig::default());

        handle.wait_for_text("Namaste!", WAIT).await.unwrap();

        handle.type_text("What is Vata?");
        handle.press(KeyCode::Enter);

        let state = handle
            .wait_for_text("Vata relates to air and space.", WAIT)
            .await
            .unwrap();
        assert_eq!(state.message_count, 3);
        assert!(!state.awaiting_response);
        assert!(state.input.is_empty());
        assert_eq!(gateway.calls(), vec!["What is Vata?".to_string()]);

        handle.send_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        handle.press(KeyCode::Char('y'));
        handle.wait_for(|s| s.should_quit, WAIT).await.unwrap();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_headless_failure_shows_connectivity_error() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Err(GatewayError::Timeout(60))]));
        let (mut handle, _task) = run_tui_headless(gateway, HeadlessConfig::default());

        handle.type_text("hello");
        handle.press(KeyCode::Enter);

        let state = handle
            .wait_for(|s| s.message_count == 3 && !s.awaiting_response, WAIT)
            .await
            .unwrap();
        assert!(state.screen_contents.contains("trouble connecting"));
    }

    #[tokio::test]
    async fn test_headless_quick_action_then_send() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok(Some("Happy to help.".into()))]));
        let (mut handle, _task) = run_tui_headless(gateway.clone(), HeadlessConfig::default());

        handle.press(KeyCode::F(2));
        let state = handle
            .wait_for(|s| s.input.contains("Doshas"), WAIT)
            .await
            .unwrap();
        assert_eq!(state.message_count, 1);
        assert!(gateway.calls().is_empty());

        handle.press(KeyCode::Enter);
        handle.wait_for_text("Happy to help.", WAIT).await.unwrap();
        assert_eq!(
            gateway.calls(),
            vec!["Can you tell me more about Doshas and how to find mine?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_headless_narrow_terminal_never_focuses_sidebar() {
        let gateway = Arc::new(ScriptedGateway::default());
        let config = HeadlessConfig {
            width: 60,
            ..HeadlessConfig::default()
        };
        let (mut handle, _task) = run_tui_headless(gateway, config);
        handle.wait_for_text("Namaste!", WAIT).await.unwrap();

        handle.press(KeyCode::Tab);
        handle
            .wait_for(|s| s.focus == Focus::QuickActions, WAIT)
            .await
            .unwrap();
        handle.press(KeyCode::Tab);
        let state = handle
            .wait_for(|s| s.focus != Focus::QuickActions, WAIT)
            .await
            .unwrap();
        assert_eq!(state.focus, Focus::Input);
        assert!(!state.screen_contents.contains("THERAPIES"));
        assert!(!state.screen_contents.contains("Abhyanga"));
    }

    #[tokio::test]
    async fn test_headless_help_overlay() {
        let gateway = Arc::new(ScriptedGateway::default());
        let (mut handle, _task) = run_tui_headless(gateway, HeadlessConfig::default());

        handle.send_action(Action::Help);
        let state = handle.wait_for(|s| s.show_help, WAIT).await.unwrap();
        assert!(state.screen_contents.contains("Toggle this help"));

        handle.press(KeyCode::Esc);
        handle.wait_for(|s| !s.show_help, WAIT).await.unwrap();
    }
}
