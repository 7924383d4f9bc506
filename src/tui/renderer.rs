use std::collections::HashMap;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::runtime::Focus;
use super::theme::Theme;
use super::widgets::TextInputState;
use crate::dialog::{DialogView, FieldView, InputKind, TextField};

const MODAL_WIDTH: u16 = 72;
const LABEL_WIDTH: u16 = 24;
const CURSOR: char = '│';

const HINTS: &str = "Tab next · Shift-Tab previous · ←/→ change · Enter confirm · Esc cancel · Ctrl-D dismiss error";

/// Draw the dialog as a centered modal over whatever is already on screen
pub fn render_dialog(
    frame: &mut Frame,
    view: &DialogView,
    focus: Focus,
    inputs: &mut HashMap<TextField, TextInputState>,
    theme: &Theme,
) {
    let banner_height = if view.error_banner.is_some() { 2 } else { 0 };
    let fields_height: u16 = view.fields.iter().map(field_height).sum();
    // borders + banner + fields + spacer + buttons + hints
    let height = 2 + banner_height + fields_height + 1 + 1 + 2;

    let area = centered_rect(MODAL_WIDTH, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(true))
        .title(Span::styled(format!(" {} ", view.title), theme.title_style()))
        .style(Style::default().bg(theme.base));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = Vec::with_capacity(view.fields.len() + 4);
    constraints.push(Constraint::Length(banner_height));
    constraints.extend(view.fields.iter().map(|f| Constraint::Length(field_height(f))));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(inner);

    if let Some(message) = &view.error_banner {
        let banner = Paragraph::new(message.as_str())
            .style(theme.error_style())
            .wrap(Wrap { trim: true });
        frame.render_widget(banner, rows[0]);
    }

    for (i, field) in view.fields.iter().enumerate() {
        let focused = focus == Focus::Field(field.id);
        render_field(frame, rows[i + 1], field, focused, inputs, theme);
    }

    let footer = rows.len() - 3;
    render_buttons(frame, rows[footer + 1], view, focus, theme);

    let hints = Paragraph::new(HINTS)
        .style(theme.label_style())
        .wrap(Wrap { trim: true });
    frame.render_widget(hints, rows[footer + 2]);
}

fn field_height(field: &FieldView) -> u16 {
    if field.error.is_some() { 2 } else { 1 }
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    field: &FieldView,
    focused: bool,
    inputs: &mut HashMap<TextField, TextInputState>,
    theme: &Theme,
) {
    let [line_area, error_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    let [label_area, input_area] =
        Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Min(0)]).areas(line_area);

    let marker = if focused { "› " } else { "  " };
    let label_style = if focused {
        theme.label_style().fg(theme.lavender)
    } else {
        theme.label_style()
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.lavender)),
            Span::styled(field.label, label_style),
        ])),
        label_area,
    );

    let input_line = match &field.input {
        InputKind::ReadOnly(value) => Line::from(Span::styled(value.as_str(), Style::default().fg(theme.subtext0))),
        InputKind::Select { options, selected } => {
            let current = options.get(*selected).copied().unwrap_or_default();
            let style = if focused {
                Style::default().fg(theme.text).bg(theme.surface0)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled("‹ ", Style::default().fg(theme.overlay0)),
                Span::styled(current, style),
                Span::styled(" ›", Style::default().fg(theme.overlay0)),
            ])
        }
        InputKind::Text { value, placeholder, secret } => {
            let state = field
                .id
                .text_field()
                .map(|text_field| inputs.entry(text_field).or_default());
            text_line(value, placeholder, *secret, focused, state, input_area.width as usize, theme)
        }
    };
    frame.render_widget(Paragraph::new(input_line), input_area);

    if let Some(error) = field.error {
        let [_, message_area] =
            Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Min(0)]).areas(error_area);
        frame.render_widget(Paragraph::new(error.message()).style(theme.error_style()), message_area);
    }
}

fn text_line<'a>(
    value: &'a str,
    placeholder: &'a str,
    secret: bool,
    focused: bool,
    state: Option<&mut TextInputState>,
    width: usize,
    theme: &Theme,
) -> Line<'a> {
    if value.is_empty() && !focused {
        return Line::from(Span::styled(placeholder, theme.placeholder_style()));
    }

    let Some(state) = state else {
        return Line::from(value);
    };

    // One column reserved for the cursor
    let visible_width = width.saturating_sub(1);
    state.update_scroll(visible_width, value);
    let mut chars: Vec<char> = state.visible_text(value, visible_width, secret).chars().collect();

    if focused {
        let cursor = state.cursor_pos().saturating_sub(state.scroll_offset()).min(chars.len());
        chars.insert(cursor, CURSOR);
    }

    let style = if focused {
        Style::default().fg(theme.text).bg(theme.surface0)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(Span::styled(chars.into_iter().collect::<String>(), style))
}

fn render_buttons(frame: &mut Frame, area: Rect, view: &DialogView, focus: Focus, theme: &Theme) {
    let save_label = if view.saving { " Saving… " } else { " Save " };
    let line = Line::from(vec![
        Span::styled(" Cancel ", theme.button_style(focus == Focus::Cancel, true)),
        Span::raw("   "),
        Span::styled(save_label, theme.button_style(focus == Focus::Save, view.confirm_enabled)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

fn centered_rect(width: u16, height: u16, container: Rect) -> Rect {
    let width = width.min(container.width);
    let height = height.min(container.height);
    Rect {
        x: container.x + (container.width - width) / 2,
        y: container.y + (container.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_clamps_to_container() {
        let container = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(72, 20, container);
        assert_eq!(rect, container);

        let rect = centered_rect(20, 4, Rect::new(0, 0, 40, 10));
        assert_eq!(rect, Rect::new(10, 3, 20, 4));
    }
}
