//! Layout helpers for the AyurCare TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Sidebar width in columns when shown.
pub const SIDEBAR_WIDTH: u16 = 32;

/// Below this terminal width the sidebar is never drawn.
pub const SIDEBAR_MIN_TERMINAL_WIDTH: u16 = 80;

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Split off the status bar at the bottom.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Whether a terminal this wide has room for the sidebar.
pub fn sidebar_fits(width: u16) -> bool {
    width >= SIDEBAR_MIN_TERMINAL_WIDTH
}

/// Split the body into an optional sidebar and the chat column.
pub fn body_layout(area: Rect, show_sidebar: bool) -> (Option<Rect>, Rect) {
    if !show_sidebar || !sidebar_fits(area.width) {
        return (None, area);
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(area);
    (Some(chunks[0]), chunks[1])
}

/// Regions of the chat column, top to bottom.
#[derive(Debug, Clone, Copy)]
pub struct ChatAreas {
    pub header: Rect,
    pub transcript: Rect,
    pub actions: Rect,
    pub input: Rect,
    pub disclaimer: Rect,
}

/// Split the chat column into header, transcript, quick actions, input and
/// disclaimer.
pub fn chat_layout(area: Rect) -> ChatAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);
    ChatAreas {
        header: chunks[0],
        transcript: chunks[1],
        actions: chunks[2],
        input: chunks[3],
        disclaimer: chunks[4],
    }
}
