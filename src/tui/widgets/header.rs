use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    subtitle: &str,
    date: NaiveDate,
    hijri: Option<&str>,
) {
    let gregorian = date.format("%A, %B %-d, %Y").to_string();

    let title_line = Line::from(Span::styled(
        title.to_string(),
        theme::gold().add_modifier(Modifier::BOLD),
    ));

    let mut date_spans = vec![Span::styled(gregorian, theme::dim().add_modifier(Modifier::ITALIC))];
    if let Some(h) = hijri {
        date_spans.push(Span::styled("  ·  ", theme::dim()));
        date_spans.push(Span::styled(h.to_string(), theme::orange()));
    }

    let text = vec![
        title_line,
        Line::from(Span::styled(subtitle.to_string(), theme::bold())),
        Line::from(date_spans),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
