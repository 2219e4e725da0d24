pub mod app;
pub mod events;
pub mod form;
pub mod navigation;
pub mod theme;
pub mod widgets;
