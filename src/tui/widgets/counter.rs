use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::counter::Counter;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, counter: &Counter) {
    let accent = theme::accent(counter.accent());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // value
            Constraint::Length(4), // info
        ])
        .split(area);

    let block = Block::default()
        .title(Span::styled(" Counter ", accent.add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(accent)
        .style(theme::surface());
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    let digits = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(theme::bold())
        .lines(vec![Line::from(counter.value().to_string())])
        .alignment(Alignment::Center)
        .build();

    // Vertically centre the glyphs (quadrant pixels are 4 rows tall).
    let glyph_area = Rect {
        y: inner.y + inner.height.saturating_sub(4) / 2,
        height: inner.height.min(4),
        ..inner
    };
    frame.render_widget(digits, glyph_area);

    let info = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Current Value  ", theme::dim()),
            Span::styled(counter.value().to_string(), theme::bold()),
            Span::styled("     Status  ", theme::dim()),
            Span::styled(counter.status().label(), accent),
        ]),
        Line::from(Span::styled(
            if counter.user_id().is_some() { "synced to your account" } else { "not synced" },
            theme::dim(),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(info, chunks[1]);
}
