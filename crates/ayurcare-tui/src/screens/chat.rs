//! The chat screen: sidebar, header, transcript, quick actions, input,
//! disclaimer and status bar.

use crate::app::{App, Focus};
use crate::screens::Screen;
use crate::ui::theme::{typing_frame, Styles, Symbols};
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::{body_layout, chat_layout, main_layout};
use ayurcare_engine::catalog::{
    DISCLAIMER, HEADER_STATUS, HEADER_TITLE, INPUT_PLACEHOLDER, NAV_ITEMS, QUICK_ACTIONS,
    THERAPIES, TRIAL_CARD,
};
use ayurcare_engine::{Message, Role};
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

const INPUT_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter", "Send"),
    KeyHint::new("F1-F3", "Actions"),
    KeyHint::new("Tab", "Focus"),
    KeyHint::new("F5", "Help"),
    KeyHint::new("^C", "Quit"),
];

const ACTION_HINTS: &[KeyHint] = &[
    KeyHint::new("←→", "Choose"),
    KeyHint::new("Enter", "Use"),
    KeyHint::new("Esc", "Input"),
];

const SIDEBAR_HINTS: &[KeyHint] = &[
    KeyHint::new("↑↓", "Therapy"),
    KeyHint::new("Enter", "Details"),
    KeyHint::new("^B", "Hide"),
    KeyHint::new("Esc", "Input"),
];

/// The one and only screen.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        Block::default().style(Styles::default()).render(area, buf);

        let (main_area, status_area) = main_layout(area);
        let (sidebar_area, chat_area) = body_layout(main_area, app.show_sidebar);

        if let Some(sidebar_area) = sidebar_area {
            render_sidebar(app, sidebar_area, buf);
        }

        let areas = chat_layout(chat_area);
        render_header(app, areas.header, buf);
        render_transcript(app, areas.transcript, buf);
        render_quick_actions(app, areas.actions, buf);
        render_input(app, areas.input, buf);
        Paragraph::new(Span::styled(DISCLAIMER, Styles::dim()))
            .alignment(Alignment::Center)
            .render(areas.disclaimer, buf);

        let (mode, hints) = match app.focus {
            Focus::Input => ("CHAT", INPUT_HINTS),
            Focus::QuickActions => ("ACTIONS", ACTION_HINTS),
            Focus::Sidebar => ("THERAPIES", SIDEBAR_HINTS),
        };
        let right = app.notification.as_deref().unwrap_or(app.model_label.as_str());
        StatusBar::new(mode).hints(hints).right(right).render(status_area, buf);
    }
}

fn render_sidebar(app: &App, area: Rect, buf: &mut Buffer) {
    let focused = app.focus == Focus::Sidebar;
    let block = Block::default()
        .title(format!(" {} AyurCare ", Symbols::LEAF))
        .title_style(Styles::title())
        .borders(Borders::RIGHT)
        .border_style(if focused {
            Styles::border_active()
        } else {
            Styles::border()
        })
        .style(Styles::default());
    let inner = block.inner(area);
    block.render(area, buf);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(u16::try_from(NAV_ITEMS.len()).unwrap_or(4) + 2),
            Constraint::Min(3),
            Constraint::Length(6),
        ])
        .split(inner);

    let nav: Vec<Line<'_>> = std::iter::once(Line::from(""))
        .chain(NAV_ITEMS.iter().enumerate().map(|(i, label)| {
            if i == 0 {
                Line::from(Span::styled(format!(" {} {label}", Symbols::SELECTED), Styles::highlight()))
            } else {
                Line::from(Span::styled(format!("   {label}"), Styles::dim()))
            }
        }))
        .collect();
    Paragraph::new(nav).render(chunks[0], buf);

    let mut therapies = vec![Line::from(Span::styled(" Therapies", Styles::title()))];
    for (i, therapy) in THERAPIES.iter().enumerate() {
        let selected = i == app.selected_therapy;
        let marker = if selected && focused { Symbols::SELECTED } else { " " };
        let name_style = if selected && focused {
            Styles::highlight()
        } else {
            Styles::default()
        };
        therapies.push(Line::from(vec![
            Span::styled(format!(" {marker} {}", therapy.name), name_style),
            Span::styled(format!("  {}", therapy.duration), Styles::dim()),
        ]));
    }
    Paragraph::new(therapies).render(chunks[1], buf);

    let card = vec![
        Line::from(Span::styled(TRIAL_CARD.title, Styles::leaf())),
        Line::from(Span::styled(TRIAL_CARD.body, Styles::dim())),
        Line::from(Span::styled(format!("[ {} ]", TRIAL_CARD.button), Styles::active())),
    ];
    Paragraph::new(card)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border()),
        )
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Styles::border())
        .style(Styles::default());
    let inner = block.inner(area);
    block.render(area, buf);

    let line = Line::from(vec![
        Span::styled(format!(" {HEADER_TITLE} "), Styles::title()),
        Span::styled(format!("{} ", Symbols::LIVE), Styles::leaf()),
        Span::styled(HEADER_STATUS, Styles::leaf()),
    ]);
    Paragraph::new(line).render(inner, buf);

    Paragraph::new(Span::styled(format!("{} ", app.model_label), Styles::dim()))
        .alignment(Alignment::Right)
        .render(inner, buf);
}

/// Lines for one message, wrapped to `width`.
fn message_lines(message: &Message, width: usize) -> Vec<Line<'static>> {
    let time = message.timestamp().with_timezone(&Local).format("%H:%M");
    let bubble_width = (width * 3 / 4).max(10);

    let (label, alignment, style, label_style): (String, Alignment, Style, Style) =
        match message.role() {
            Role::User => (
                format!("You · {time}"),
                Alignment::Right,
                Styles::user_bubble(),
                Styles::highlight(),
            ),
            Role::Assistant => (
                format!("{} AyurCare · {time}", Symbols::LEAF),
                Alignment::Left,
                Styles::assistant_bubble(),
                Styles::leaf(),
            ),
            Role::System => (
                format!("System · {time}"),
                Alignment::Left,
                Styles::dim(),
                Styles::dim(),
            ),
        };

    let mut lines = vec![Line::from(Span::styled(label, label_style)).alignment(alignment)];
    for paragraph in message.content().split('\n') {
        if paragraph.is_empty() {
            lines.push(Line::from(""));
            continue;
        }
        for wrapped in textwrap::wrap(paragraph, bubble_width) {
            lines.push(
                Line::from(Span::styled(format!(" {wrapped} "), style)).alignment(alignment),
            );
        }
    }
    lines.push(Line::from(""));
    lines
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    if area.height == 0 || area.width < 4 {
        return;
    }
    let inner = Rect::new(area.x + 1, area.y, area.width - 2, area.height);
    let width = usize::from(inner.width);

    let mut lines: Vec<Line<'static>> = app
        .store
        .messages()
        .iter()
        .flat_map(|m| message_lines(m, width))
        .collect();

    if app.is_typing() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", Symbols::LEAF), Styles::leaf()),
            Span::styled(typing_frame(app.tick), Styles::leaf()),
        ]));
    }

    let height = usize::from(inner.height);
    let max_scroll = lines.len().saturating_sub(height);
    let offset = app.transcript_scroll.min(max_scroll);
    let start = lines.len().saturating_sub(height + offset);
    let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();

    Paragraph::new(visible)
        .style(Styles::default())
        .render(inner, buf);
}

fn render_quick_actions(app: &App, area: Rect, buf: &mut Buffer) {
    let focused = app.focus == Focus::QuickActions;
    let mut spans = vec![Span::raw(" ")];
    for (i, action) in QUICK_ACTIONS.iter().enumerate() {
        let style = if focused && i == app.selected_action {
            Styles::highlight()
        } else {
            Styles::dim()
        };
        spans.push(Span::styled(
            format!("[F{}] {} {}", i + 1, action.icon, action.title),
            style,
        ));
        spans.push(Span::raw("  "));
    }
    Paragraph::new(Line::from(spans))
        .style(Styles::default())
        .render(area, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let focused = app.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Styles::border_active()
        } else {
            Styles::border()
        })
        .style(Styles::default());

    app.input
        .widget()
        .block(block)
        .focused(focused)
        .placeholder(INPUT_PLACEHOLDER)
        .render(area, buf);
}
