use chrono::NaiveTime;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Schedule;
use crate::prayer_times::NextPrayer;
use crate::tui::theme;
use crate::utils::format::{format_clock, format_countdown};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    now: NaiveTime,
    schedule: &Schedule,
    next: Option<&NextPrayer>,
) {
    let block = Block::default()
        .title(Span::styled(" Current Time ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format_clock(now),
            theme::bold().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match next.and_then(|n| schedule.get(n.index).map(|p| (n, p))) {
        Some((next, prayer)) => {
            let when = if next.wraps { " (tomorrow)" } else { "" };
            content.push(Line::from(vec![
                Span::styled("Next Prayer: ", theme::dim()),
                Span::styled(
                    prayer.name.display_name(),
                    theme::gold().add_modifier(Modifier::BOLD),
                ),
                Span::styled(" in ", theme::dim()),
                Span::styled(
                    format_countdown(next.remaining),
                    theme::orange().add_modifier(Modifier::BOLD),
                ),
                Span::styled(when, theme::dim()),
            ]));
        }
        None => content.push(Line::from(Span::styled("No data", theme::dim()))),
    }

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
