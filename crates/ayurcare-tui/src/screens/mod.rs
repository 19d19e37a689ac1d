//! Screen and overlay rendering for the AyurCare TUI.

pub mod chat;

use crate::app::App;
use crate::ui::centered_fixed;
use crate::ui::theme::Styles;
use ayurcare_engine::catalog::Therapy;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

fn overlay_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default())
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Chat
    Enter             Send message
    Up / Down         Input history
    PgUp / PgDn       Scroll transcript
    F1 / F2 / F3      Book Therapy / My Dosha / Treatment Plan

  Navigation
    Tab / Shift+Tab   Move focus
    Ctrl+B            Toggle sidebar
    Enter             Open therapy or use action
    Esc               Back to input
    Ctrl+C            Quit
    F5                Toggle this help

  [Press any key to close]
";

    let width = 64.min(area.width.saturating_sub(4));
    let height = 19.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);
    Paragraph::new(help_text)
        .block(overlay_block(" Help "))
        .style(Styles::default())
        .render(overlay_area, buf);
}

/// Render the quit confirmation.
pub fn render_quit_confirm(area: Rect, buf: &mut Buffer) {
    let width = 50.min(area.width.saturating_sub(2));
    let overlay_area = centered_fixed(width, 6, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Leave the session? The chat is not saved.",
            Styles::default(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [y] ", Styles::highlight()),
            Span::styled("Quit   ", Styles::default()),
            Span::styled("[n] ", Styles::highlight()),
            Span::styled("Stay", Styles::default()),
        ]),
    ];

    Clear.render(overlay_area, buf);
    Paragraph::new(lines)
        .block(overlay_block(" Quit "))
        .render(overlay_area, buf);
}

/// Render a therapy's detail card.
pub fn render_therapy_detail(therapy: &Therapy, area: Rect, buf: &mut Buffer) {
    let width = 60.min(area.width.saturating_sub(4));
    let height = (10 + u16::try_from(therapy.benefits.len()).unwrap_or(0))
        .min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(therapy.category.label(), Styles::leaf()),
            Span::styled("  ·  ", Styles::dim()),
            Span::styled(therapy.duration, Styles::dim()),
        ]),
        Line::from(""),
        Line::from(Span::styled(therapy.description, Styles::default())),
        Line::from(""),
        Line::from(Span::styled("Benefits", Styles::highlight())),
    ];
    lines.extend(
        therapy
            .benefits
            .iter()
            .map(|b| Line::from(Span::styled(format!("  • {b}"), Styles::default()))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("[Esc] Close", Styles::dim())));

    let title = format!(" {} ", therapy.name);
    Clear.render(overlay_area, buf);
    Paragraph::new(lines)
        .block(overlay_block(&title))
        .wrap(Wrap { trim: false })
        .render(overlay_area, buf);
}

/// Draw whichever overlay is open on top of the screen.
pub fn render_overlays(app: &App, area: Rect, buf: &mut Buffer) {
    if let Some(therapy) = app.therapy_detail.and_then(ayurcare_engine::catalog::therapy) {
        render_therapy_detail(therapy, area, buf);
    }
    if app.show_help {
        render_help_overlay(area, buf);
    }
    if app.show_quit_confirm {
        render_quit_confirm(area, buf);
    }
}
