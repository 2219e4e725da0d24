use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::form::Form;
use crate::tui::theme;

const LABEL_INDENT: u16 = 2;

/// Draws the fields two lines each and places the terminal cursor in the focused one.
pub fn render(frame: &mut Frame, area: Rect, title: &str, subtitle: &str, form: &Form) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled("بِسْمِ ٱللَّٰهِ", theme::gold().add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center),
        Line::from(Span::styled(subtitle.to_string(), theme::dim())).alignment(Alignment::Center),
        Line::from(""),
    ];
    let header_rows = lines.len() as u16;

    let indent = " ".repeat(LABEL_INDENT as usize);
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            theme::gold().add_modifier(Modifier::BOLD)
        } else {
            theme::dim()
        };
        let value_style = if focused {
            theme::bold()
        } else {
            theme::base()
        };
        lines.push(Line::from(Span::styled(format!("{}{}", indent, field.label), label_style)));
        lines.push(Line::from(vec![
            Span::styled(format!("{}› ", indent), label_style),
            Span::styled(field.display(form.reveal), value_style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);

    if let Some(field) = form.fields.get(form.focus) {
        let typed = UnicodeWidthStr::width(field.display(form.reveal).as_str()) as u16;
        // "› " prefix is two cells wide
        let x = inner.x + LABEL_INDENT + 2 + typed;
        let y = inner.y + header_rows + form.focus as u16 * 2 + 1;
        if x < inner.right() && y < inner.bottom() {
            frame.set_cursor_position((x, y));
        }
    }
}
