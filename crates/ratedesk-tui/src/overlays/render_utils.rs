use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::common::text::truncate_start_with_ellipsis;
use crate::common::{FormFields, TextField};

/// Calculates a centered overlay area within `area`.
pub fn calculate_overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));

    let overlay_x = area.x + (area.width.saturating_sub(width)) / 2;
    let overlay_y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(overlay_x, overlay_y, width, height)
}

/// Renders the base container for an overlay (clears background, draws border and title).
pub fn render_overlay_container(frame: &mut Frame, area: Rect, title: &str, border_color: Color) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);
}

pub struct OverlayConfig<'a> {
    pub title: &'a str,
    pub border_color: Color,
    pub width: u16,
    pub height: u16,
    pub hints: &'a [InputHint<'a>],
}

pub struct OverlayLayout {
    pub popup: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Render a standard overlay container and return its layout.
pub fn render_overlay(frame: &mut Frame, area: Rect, config: &OverlayConfig<'_>) -> OverlayLayout {
    let popup = calculate_overlay_area(area, config.width, config.height);
    render_overlay_container(frame, popup, config.title, config.border_color);

    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );

    if !config.hints.is_empty() {
        render_hints(frame, inner, config.hints, config.border_color);
    }

    let footer_height = u16::from(!config.hints.is_empty());
    let body_height = inner.height.saturating_sub(footer_height);
    let footer = Rect::new(inner.x, inner.y + body_height, inner.width, footer_height);
    let body = Rect::new(inner.x, inner.y, inner.width, body_height);

    OverlayLayout {
        popup,
        body,
        footer,
    }
}

/// Helper struct for keyboard hints.
pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// Renders a line of keyboard hints on the last row of `area`.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[InputHint], highlight_color: Color) {
    if area.height == 0 {
        return;
    }
    let hints_y = area.y + area.height.saturating_sub(1);
    let hints_area = Rect::new(area.x, hints_y, area.width, 1);

    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(highlight_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(para, hints_area);
}

/// Rows used by one field: label line plus input line.
pub const FIELD_HEIGHT: u16 = 2;

/// Renders a field as `Label (hint)` over `> value█`.
pub fn render_field(frame: &mut Frame, area: Rect, field: &TextField, focused: bool) {
    if area.height < FIELD_HEIGHT {
        return;
    }
    let accent = if focused { Color::Cyan } else { Color::DarkGray };

    let mut label = vec![Span::styled(
        field.label,
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    )];
    if let Some(hint) = field.hint {
        label.push(Span::styled(
            format!("  {hint}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(label)),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let prompt = "> ";
    let max_text_width = area.width.saturating_sub(prompt.len() as u16 + 1) as usize;
    let text = truncate_start_with_ellipsis(&field.display(), max_text_width);
    let mut spans = vec![
        Span::styled(prompt, Style::default().fg(accent)),
        Span::styled(text, Style::default().fg(Color::White)),
    ];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect::new(area.x, area.y + 1, area.width, 1),
    );
}

/// Renders every field of `form` top to bottom. `active` is false when the
/// form is visible but not receiving keys.
pub fn render_form(frame: &mut Frame, area: Rect, form: &FormFields, active: bool) -> u16 {
    render_fields(frame, area, form, active, |_| true)
}

/// Like [`render_form`] but skips fields for which `visible` is false.
pub fn render_fields(
    frame: &mut Frame,
    area: Rect,
    form: &FormFields,
    active: bool,
    visible: impl Fn(usize) -> bool,
) -> u16 {
    let mut y = area.y;
    for (index, field) in form.fields.iter().enumerate() {
        if !visible(index) {
            continue;
        }
        if y + FIELD_HEIGHT > area.y + area.height {
            break;
        }
        let row = Rect::new(area.x, y, area.width, FIELD_HEIGHT);
        render_field(frame, row, field, active && form.focus == index);
        y += FIELD_HEIGHT;
    }
    y - area.y
}

/// One line of colored status text (errors, notices, empty states).
pub fn render_message(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    if area.height == 0 {
        return;
    }
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(color),
        ))),
        Rect::new(area.x, area.y, area.width, 1),
    );
}
