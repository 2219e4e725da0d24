use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::models::Schedule;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, schedule: &Schedule, current_idx: usize) {
    let block = Block::default()
        .title(Span::styled(" Prayers ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let items: Vec<ListItem> = schedule
        .entries()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let is_current = i == current_idx;

            let (marker, name_style, time_style) = if is_current {
                (
                    "▶ ",
                    theme::gold().add_modifier(Modifier::BOLD),
                    theme::gold().add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", theme::bold(), theme::dim())
            };

            let line = Line::from(vec![
                Span::styled(marker, theme::gold()),
                Span::styled(format!("{}  ", p.name.icon()), theme::prayer(p.name)),
                Span::styled(format!("{:<9}", p.name.display_name()), name_style),
                Span::styled(format!("{:<8}", p.name.arabic()), theme::prayer(p.name)),
                Span::styled(p.display_time(), time_style),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
