//! Event handling for the AyurCare TUI.

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent,
};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Reads crossterm events on a dedicated thread and forwards them.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // crossterm polling blocks, so it gets its own thread
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                        Ok(CrosstermEvent::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                        Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    }
                } else {
                    Some(Event::Tick)
                };
                if let Some(e) = event {
                    if tx_clone.send(e).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, waiting until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    /// Pre-fill the input from the quick action at this index.
    QuickAction(usize),
    NextFocus,
    PrevFocus,
    ToggleSidebar,
    Back,
    Select,
    Up,
    Down,
    Left,
    Right,
    ScrollUp,
    ScrollDown,
    Confirm,
    Deny,
    None,
}

/// Map keys that mean the same thing regardless of focus.
///
/// Returns `None` for keys that belong to whichever element has focus,
/// such as printable characters while the input is focused.
pub fn global_action(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c' | 'd') => Some(Action::Quit),
            KeyCode::Char('b') => Some(Action::ToggleSidebar),
            _ => None,
        };
    }

    match key.code {
        KeyCode::F(n @ 1..=3) => Some(Action::QuickAction(usize::from(n) - 1)),
        KeyCode::F(5) => Some(Action::Help),
        KeyCode::Tab => Some(Action::NextFocus),
        KeyCode::BackTab => Some(Action::PrevFocus),
        KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::PageDown => Some(Action::ScrollDown),
        KeyCode::Esc => Some(Action::Back),
        _ => None,
    }
}

/// Convert a key event to an action when the input does not have focus.
pub fn key_to_action(key: KeyEvent) -> Action {
    if let Some(action) = global_action(key) {
        return action;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::Help,
        KeyCode::Char('y' | 'Y') => Action::Confirm,
        KeyCode::Char('n' | 'N') => Action::Deny,
        KeyCode::Enter => Action::Select,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_function_keys_map_to_quick_actions() {
        assert_eq!(global_action(key(KeyCode::F(1))), Some(Action::QuickAction(0)));
        assert_eq!(global_action(key(KeyCode::F(3))), Some(Action::QuickAction(2)));
        assert_eq!(global_action(key(KeyCode::F(4))), None);
        assert_eq!(global_action(key(KeyCode::F(5))), Some(Action::Help));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(global_action(ctrl_c), Some(Action::Quit));
        assert_eq!(key_to_action(ctrl_c), Action::Quit);
    }

    #[test]
    fn test_printable_keys_are_not_global() {
        assert_eq!(global_action(key(KeyCode::Char('q'))), None);
        assert_eq!(global_action(key(KeyCode::Enter)), None);
        assert_eq!(key_to_action(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Select);
    }
}
