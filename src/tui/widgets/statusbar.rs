use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::navigation::Route;
use crate::tui::theme;

fn hints(route: Route) -> &'static [(&'static str, &'static str)] {
    match route {
        Route::SignIn => &[
            ("[Tab]", " next field  "),
            ("[Enter]", " sign in  "),
            ("[F3]", " show password  "),
            ("[Ctrl+N]", " create account  "),
            ("[Esc]", " quit"),
        ],
        Route::CreateAccount => &[
            ("[Tab]", " next field  "),
            ("[Enter]", " create  "),
            ("[F3]", " show password  "),
            ("[Esc]", " back"),
        ],
        Route::Landing => &[
            ("[+]", " increment  "),
            ("[-]", " decrement  "),
            ("[0]", " reset  "),
            ("[p]", " prayer times  "),
            ("[o]", " sign out  "),
            ("[Esc]", " quit"),
        ],
        Route::PrayerTimes => &[("[r]", " refresh  "), ("[Esc]", " back  "), ("[q]", " quit")],
    }
}

pub fn render(frame: &mut Frame, area: Rect, route: Route) {
    let mut spans = Vec::new();
    for (key, label) in hints(route) {
        spans.push(Span::styled(*key, theme::gold()));
        spans.push(Span::styled(*label, theme::dim()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
