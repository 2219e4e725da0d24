use ratatui::style::{Color, Modifier, Style};

use crate::counter::ACCENT_COUNT;
use crate::models::PrayerName;

pub const BG: Color = Color::Rgb(15, 76, 58);
pub const SURFACE: Color = Color::Rgb(26, 71, 42);
pub const BORDER: Color = Color::Rgb(46, 139, 87);
pub const TEXT: Color = Color::Rgb(255, 255, 255);
pub const TEXT_DIM: Color = Color::Rgb(189, 195, 199);
pub const GOLD: Color = Color::Rgb(255, 215, 0);
pub const ORANGE: Color = Color::Rgb(255, 165, 0);
pub const GREEN: Color = Color::Rgb(50, 205, 50);
pub const RED: Color = Color::Rgb(255, 107, 107);

/// Counter frame colours, cycled on every increment.
pub const ACCENTS: [Color; ACCENT_COUNT] = [
    Color::Rgb(0xff, 0xd7, 0x00), // gold
    Color::Rgb(0xff, 0x6b, 0x6b),
    Color::Rgb(0x4e, 0xcd, 0xc4),
    Color::Rgb(0x45, 0xb7, 0xd1),
    Color::Rgb(0x96, 0xce, 0xb4),
    Color::Rgb(0xff, 0xea, 0xa7),
    Color::Rgb(0xfd, 0x79, 0xa8),
    Color::Rgb(0xfd, 0xcb, 0x6e),
    Color::Rgb(0x6c, 0x5c, 0xe7),
    Color::Rgb(0xa2, 0x9b, 0xfe),
    Color::Rgb(0xfd, 0x79, 0xa8),
    Color::Rgb(0x00, 0xb8, 0x94),
];

pub fn accent(index: usize) -> Style {
    Style::default().fg(ACCENTS[index % ACCENT_COUNT])
}

pub fn prayer(name: PrayerName) -> Style {
    let (r, g, b) = name.color();
    Style::default().fg(Color::Rgb(r, g, b))
}

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn orange() -> Style {
    Style::default().fg(ORANGE)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}
