//! Application state and update logic for the AyurCare TUI.

use crate::event::{global_action, key_to_action, Action};
use crate::ui::layout::sidebar_fits;
use crate::ui::widgets::TextInputState;
use ayurcare_engine::catalog::{QUICK_ACTIONS, THERAPIES};
use ayurcare_engine::{ConversationStore, GatewayError, ResponseGateway};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Display time for notifications: ~3 seconds at 4 Hz.
const NOTIFICATION_TICKS: usize = 12;

/// Lines moved per scroll step.
const SCROLL_STEP: usize = 3;

/// Which element receives plain keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    QuickActions,
    Sidebar,
}

type InFlight = JoinHandle<Result<Option<String>, GatewayError>>;

/// Application state.
#[allow(clippy::struct_excessive_bools)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Whether the quit confirmation is visible.
    pub show_quit_confirm: bool,

    /// Id of the therapy whose detail overlay is open.
    pub therapy_detail: Option<&'static str>,

    /// The session conversation.
    pub store: ConversationStore,

    /// Chat input.
    pub input: TextInputState,

    pub focus: Focus,

    /// User preference; narrow terminals hide the sidebar regardless.
    pub show_sidebar: bool,

    /// Highlighted therapy in the sidebar.
    pub selected_therapy: usize,

    /// Highlighted quick action chip.
    pub selected_action: usize,

    /// Transcript scroll, in lines up from the newest message.
    pub transcript_scroll: usize,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    notification_ttl: usize,

    /// Tick counter for animations.
    pub tick: u64,

    /// Width of the last drawn frame; `None` until the first draw.
    viewport_width: Option<u16>,

    /// Model label shown in the header.
    pub model_label: String,

    gateway: Arc<dyn ResponseGateway>,

    in_flight: Option<InFlight>,
}

impl App {
    /// Create the app with a greeting-seeded conversation.
    pub fn new(gateway: Arc<dyn ResponseGateway>, model_label: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            show_quit_confirm: false,
            therapy_detail: None,
            store: ConversationStore::with_greeting(),
            input: TextInputState::new(),
            focus: Focus::Input,
            show_sidebar: true,
            selected_therapy: 0,
            selected_action: 0,
            transcript_scroll: 0,
            notification: None,
            notification_ttl: 0,
            tick: 0,
            viewport_width: None,
            model_label: model_label.into(),
            gateway,
            in_flight: None,
        }
    }

    /// Name of the gateway serving this session.
    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Whether the sidebar is actually on screen.
    pub fn sidebar_visible(&self) -> bool {
        self.show_sidebar && self.viewport_width.map_or(true, sidebar_fits)
    }

    /// Record the frame width before drawing. Focus leaves a sidebar that
    /// no longer fits.
    pub fn set_viewport_width(&mut self, width: u16) {
        self.viewport_width = Some(width);
        if self.focus == Focus::Sidebar && !self.sidebar_visible() {
            self.focus = Focus::Input;
        }
    }

    /// Whether a reply is being awaited.
    pub fn is_typing(&self) -> bool {
        self.store.is_awaiting_response()
    }

    /// Route a key press: overlays first, then global keys, then focus.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_quit_confirm {
            match key_to_action(key) {
                Action::Confirm | Action::Select => self.should_quit = true,
                Action::Deny | Action::Back | Action::Quit => self.show_quit_confirm = false,
                _ => {}
            }
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.therapy_detail.is_some() {
            if matches!(
                key_to_action(key),
                Action::Back | Action::Select | Action::Quit
            ) {
                self.therapy_detail = None;
            }
            return;
        }

        if let Some(action) = global_action(key) {
            self.handle_action(action);
            return;
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::QuickActions | Focus::Sidebar => self.handle_action(key_to_action(key)),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Up => self.input.history_prev(),
            KeyCode::Down => self.input.history_next(),
            _ => {}
        }
    }

    /// Apply an action to the current focus.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.show_quit_confirm = true,
            Action::Help => self.show_help = !self.show_help,
            Action::QuickAction(index) => self.apply_quick_action(index),
            Action::NextFocus => self.cycle_focus(true),
            Action::PrevFocus => self.cycle_focus(false),
            Action::ToggleSidebar => {
                self.show_sidebar = !self.show_sidebar;
                if self.focus == Focus::Sidebar && !self.sidebar_visible() {
                    self.focus = Focus::Input;
                }
            }
            Action::Back => self.focus = Focus::Input,
            Action::ScrollUp => {
                self.transcript_scroll = self.transcript_scroll.saturating_add(SCROLL_STEP);
            }
            Action::ScrollDown => {
                self.transcript_scroll = self.transcript_scroll.saturating_sub(SCROLL_STEP);
            }
            Action::Select => match self.focus {
                Focus::QuickActions => self.apply_quick_action(self.selected_action),
                Focus::Sidebar if self.sidebar_visible() => {
                    self.therapy_detail = THERAPIES.get(self.selected_therapy).map(|t| t.id);
                }
                Focus::Sidebar => self.focus = Focus::Input,
                Focus::Input => self.submit_input(),
            },
            Action::Up if self.focus == Focus::Sidebar => {
                self.selected_therapy = self.selected_therapy.saturating_sub(1);
            }
            Action::Down if self.focus == Focus::Sidebar => {
                if self.selected_therapy + 1 < THERAPIES.len() {
                    self.selected_therapy += 1;
                }
            }
            Action::Left if self.focus == Focus::QuickActions => {
                self.selected_action = self.selected_action.saturating_sub(1);
            }
            Action::Right if self.focus == Focus::QuickActions => {
                if self.selected_action + 1 < QUICK_ACTIONS.len() {
                    self.selected_action += 1;
                }
            }
            _ => {}
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order: &[Focus] = if self.sidebar_visible() {
            &[Focus::Input, Focus::QuickActions, Focus::Sidebar]
        } else {
            &[Focus::Input, Focus::QuickActions]
        };
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Replace the input with a quick action's text. Never sends.
    fn apply_quick_action(&mut self, index: usize) {
        let Some(action) = QUICK_ACTIONS.get(index) else {
            return;
        };
        debug!(action = action.action.tag(), "Quick action selected");
        self.input.set(action.action.prefill());
        self.selected_action = index;
        self.focus = Focus::Input;
    }

    /// Submit the input through the store and issue the gateway call.
    ///
    /// Does nothing (and keeps the input) while a reply is pending or when
    /// the input is blank.
    pub fn submit_input(&mut self) {
        let Some(turn) = self.store.submit(self.input.content()) else {
            return;
        };
        self.input.submit();
        self.transcript_scroll = 0;

        let gateway = Arc::clone(&self.gateway);
        self.in_flight = Some(tokio::spawn(async move {
            gateway.respond(&turn.message, &turn.history).await
        }));
    }

    /// Settle the in-flight request if it has finished.
    pub async fn poll_response(&mut self) {
        let finished = self.in_flight.as_ref().is_some_and(JoinHandle::is_finished);
        if !finished {
            return;
        }
        if let Some(handle) = self.in_flight.take() {
            let outcome = handle.await.unwrap_or_else(|e| {
                warn!(error = %e, "Request task did not complete");
                Err(GatewayError::Other(e.to_string()))
            });
            self.store.settle(outcome);
            self.transcript_scroll = 0;
        }
    }

    /// Abort any outstanding request task.
    pub fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Advance animations and expire notifications.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, key, press_str};
    use ayurcare_engine::{Phase, Role, CONNECTIVITY_ERROR, GREETING};

    #[test]
    fn test_app_starts_with_greeting() {
        let app = create_test_app(vec![]);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.messages()[0].content(), GREETING);
        assert_eq!(app.focus, Focus::Input);
        assert!(!app.is_typing());
    }

    #[test]
    fn test_typing_goes_to_input() {
        let mut app = create_test_app(vec![]);
        press_str(&mut app, "quiet");
        assert_eq!(app.input.content(), "quiet");
        assert!(!app.show_quit_confirm);
    }

    #[test]
    fn test_quick_action_prefills_without_sending() {
        let mut app = create_test_app(vec![]);
        app.handle_key(key(KeyCode::F(1)));
        assert_eq!(
            app.input.content(),
            "I'd like to book an Ayurvedic therapy session."
        );
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.phase(), Phase::Idle);
    }

    #[test]
    fn test_quick_action_chip_selection() {
        let mut app = create_test_app(vec![]);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::QuickActions);
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.selected_action, 2);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Input);
        assert!(app.input.content().contains("treatment plan"));
    }

    #[test]
    fn test_focus_cycles_and_skips_hidden_sidebar() {
        let mut app = create_test_app(vec![]);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Sidebar);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Input);

        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Sidebar);

        app.handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert!(!app.show_sidebar);
        assert_eq!(app.focus, Focus::Input);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_therapy_detail_overlay() {
        let mut app = create_test_app(vec![]);
        app.focus = Focus::Sidebar;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_therapy, 2);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.therapy_detail, Some("3"));

        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.therapy_detail, Some("3"));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.therapy_detail, None);
    }

    #[test]
    fn test_narrow_viewport_skips_sidebar_focus() {
        let mut app = create_test_app(vec![]);
        app.set_viewport_width(60);
        assert!(app.show_sidebar);
        assert!(!app.sidebar_visible());

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::QuickActions);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_shrinking_viewport_moves_focus_off_sidebar() {
        let mut app = create_test_app(vec![]);
        app.set_viewport_width(120);
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Sidebar);

        app.set_viewport_width(60);
        assert_eq!(app.focus, Focus::Input);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.therapy_detail, None);
    }

    #[test]
    fn test_select_on_hidden_sidebar_opens_nothing() {
        let mut app = create_test_app(vec![]);
        app.set_viewport_width(60);
        app.focus = Focus::Sidebar;
        app.handle_action(Action::Select);
        assert_eq!(app.therapy_detail, None);
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = create_test_app(vec![]);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.show_quit_confirm);
        app.handle_key(key(KeyCode::Char('n')));
        assert!(!app.show_quit_confirm);
        assert!(!app.should_quit);

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        app.handle_key(key(KeyCode::Char('y')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_toggles_and_any_key_closes() {
        let mut app = create_test_app(vec![]);
        app.handle_key(key(KeyCode::F(5)));
        assert!(app.show_help);
        app.handle_key(key(KeyCode::Char('a')));
        assert!(!app.show_help);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_blank_enter_is_noop() {
        let mut app = create_test_app(vec![]);
        press_str(&mut app, "   ");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.input.content(), "   ");
    }

    #[test]
    fn test_notification_expires() {
        let mut app = create_test_app(vec![]);
        app.set_notification("Hello");
        for _ in 0..NOTIFICATION_TICKS - 1 {
            app.tick();
        }
        assert!(app.notification.is_some());
        app.tick();
        assert!(app.notification.is_none());
    }

    #[tokio::test]
    async fn test_submit_then_settle_reply() {
        let mut app = create_test_app(vec![Ok(Some("Pitta relates to fire.".into()))]);
        press_str(&mut app, "What is Pitta?");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.is_typing());
        assert!(app.input.is_empty());
        assert_eq!(app.store.len(), 2);

        while app.is_typing() {
            tokio::task::yield_now().await;
            app.poll_response().await;
        }
        let last = app.store.last().unwrap();
        assert_eq!(last.role(), Role::Assistant);
        assert_eq!(last.content(), "Pitta relates to fire.");
    }

    #[tokio::test]
    async fn test_enter_while_pending_keeps_input() {
        let mut app = create_test_app(vec![Err(GatewayError::Other("down".into()))]);
        press_str(&mut app, "first");
        app.handle_key(key(KeyCode::Enter));
        press_str(&mut app, "second");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.input.content(), "second");
        assert_eq!(app.store.len(), 2);

        while app.is_typing() {
            tokio::task::yield_now().await;
            app.poll_response().await;
        }
        assert_eq!(app.store.last().unwrap().content(), CONNECTIVITY_ERROR);
        assert_eq!(app.store.len(), 3);
    }
}
