//! Colors and styles for the AyurCare TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette: deep forest background with saffron and leaf accents.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(24, 32, 28);
    pub const FG: Color = Color::Rgb(226, 230, 220);
    pub const DIM: Color = Color::Rgb(140, 152, 140);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(236, 170, 80);
    pub const LEAF: Color = Color::Rgb(120, 190, 130);

    // Message bubbles
    pub const USER_BUBBLE: Color = Color::Rgb(46, 82, 60);
    pub const ASSISTANT_BUBBLE: Color = Color::Rgb(36, 46, 40);

    // Status bar colors
    pub const STATUS_BG: Color = Color::Rgb(36, 48, 42);
    pub const STATUS_KEY_BG: Color = Color::Rgb(70, 110, 80);

    // Border colors
    pub const BORDER: Color = Color::Rgb(70, 88, 76);
    pub const BORDER_ACTIVE: Color = Color::Rgb(236, 170, 80);
}

/// Fixed glyphs.
pub struct Symbols;

impl Symbols {
    pub const LEAF: &'static str = "🌿";
    pub const LIVE: &'static str = "●";
    pub const SELECTED: &'static str = "▸";
    pub const TYPING: [&'static str; 4] = ["●∙∙", "∙●∙", "∙∙●", "∙●∙"];
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted/selected item.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// Live indicator and success text.
    pub fn leaf() -> Style {
        Style::default().fg(Palette::LEAF).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn user_bubble() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::USER_BUBBLE)
    }

    pub fn assistant_bubble() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::ASSISTANT_BUBBLE)
    }

    /// Key hint style (for status bar).
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}

/// Typing indicator frame for the given tick.
pub fn typing_frame(tick: u64) -> &'static str {
    let len = Symbols::TYPING.len() as u64;
    #[allow(clippy::cast_possible_truncation)]
    Symbols::TYPING[(tick % len) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_frame_cycles() {
        assert_eq!(typing_frame(0), Symbols::TYPING[0]);
        assert_eq!(typing_frame(5), Symbols::TYPING[1]);
        assert_eq!(typing_frame(4), typing_frame(0));
    }
}
