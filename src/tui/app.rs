use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    backend::Backend,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use rusqlite::Connection;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::auth::{IdentityProvider, LocalIdentity, SessionEvent};
use crate::config::AppConfig;
use crate::counter::{Counter, CounterOp, SqliteCounterStore};
use crate::models::{Schedule, User};
use crate::prayer_times::{current_index, load_schedule, NextPrayer, ScheduleSource};
use crate::tui::events::{Event, EventHandler};
use crate::tui::form::{Form, FormAction};
use crate::tui::navigation::{Navigator, Route};
use crate::tui::theme;
use crate::tui::widgets::{counter, form, header, next_prayer, prayers, statusbar};
use crate::utils::hijri::hijri_string;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// The schedule shown on the prayer-times screen and its latest evaluation.
#[derive(Debug, Clone)]
pub struct PrayerView {
    pub schedule: Schedule,
    pub source: ScheduleSource,
    pub date: NaiveDate,
    pub next: Option<NextPrayer>,
}

pub struct App<'a> {
    pub config: AppConfig,
    pub nav: Navigator,
    pub should_quit: bool,
    pub alert: Option<Alert>,
    pub login_form: Form,
    pub signup_form: Form,
    pub counter: Counter,
    pub user: Option<User>,
    pub prayer: Option<PrayerView>,
    pub now: NaiveDateTime,
    pub hijri: Option<String>,

    identity: LocalIdentity<'a>,
    store: SqliteCounterStore<'a>,
    session_rx: Receiver<SessionEvent>,
}

impl<'a> App<'a> {
    pub fn new(conn: &'a Connection, config: AppConfig) -> Result<Self> {
        let mut identity = LocalIdentity::new(conn);
        let session_rx = identity.subscribe();
        let store = SqliteCounterStore::new(conn);

        let user = identity.current_user()?;
        let mut counter = Counter::new();
        counter.attach(user.as_ref(), &store);

        let initial = if user.is_some() {
            Route::Landing
        } else {
            Route::SignIn
        };

        let now = Local::now().naive_local();
        let hijri = hijri_string(now.date(), config.prayer_times.hijri_offset);

        Ok(App {
            config,
            nav: Navigator::new(initial),
            should_quit: false,
            alert: None,
            login_form: Form::login(),
            signup_form: Form::signup(),
            counter,
            user,
            prayer: None,
            now,
            hijri,
            identity,
            store,
            session_rx,
        })
    }

    fn show_alert(&mut self, title: &str, message: impl Into<String>) {
        self.alert = Some(Alert {
            title: title.to_string(),
            message: message.into(),
        });
    }

    pub fn tick(&mut self) {
        let now = Local::now().naive_local();
        self.set_now(now);
    }

    /// Advance the clock: follow session changes, roll over the day, re-evaluate.
    pub fn set_now(&mut self, now: NaiveDateTime) {
        let day_changed = now.date() != self.now.date();
        self.now = now;
        self.drain_session_events();

        if day_changed {
            self.hijri = hijri_string(now.date(), self.config.prayer_times.hijri_offset);
        }

        let stale = self.prayer.as_ref().is_some_and(|p| p.date != now.date());
        if stale && self.nav.current() == Route::PrayerTimes {
            self.refresh_schedule();
        }
        self.reevaluate();
    }

    fn reevaluate(&mut self) {
        let now = self.now.time();
        if let Some(view) = &mut self.prayer {
            view.next = Some(view.schedule.next_prayer(now));
        }
    }

    pub fn refresh_schedule(&mut self) {
        let date = self.now.date();
        match load_schedule(&self.config, date) {
            Ok((schedule, source)) => {
                self.prayer = Some(PrayerView {
                    schedule,
                    source,
                    date,
                    next: None,
                });
                self.reevaluate();
            }
            Err(e) => {
                log::error!("Error loading prayer times: {:#}", e);
                self.show_alert("Error", "Unable to load prayer times");
            }
        }
    }

    fn drain_session_events(&mut self) {
        while let Ok(SessionEvent::UserChanged(user)) = self.session_rx.try_recv() {
            self.counter.attach(user.as_ref(), &self.store);
            match &user {
                Some(_) => {
                    if matches!(self.nav.current(), Route::SignIn | Route::CreateAccount) {
                        self.nav.reset_to(Route::Landing);
                    }
                }
                None => self.nav.reset_to(Route::SignIn),
            }
            self.user = user;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        // Alerts are blocking: any key dismisses.
        if self.alert.take().is_some() {
            return;
        }

        match self.nav.current() {
            Route::SignIn => self.handle_sign_in_key(key),
            Route::CreateAccount => self.handle_create_account_key(key),
            Route::Landing => self.handle_landing_key(key),
            Route::PrayerTimes => self.handle_prayer_times_key(key),
        }
    }

    fn handle_sign_in_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('n') {
            self.nav.navigate(Route::CreateAccount);
            return;
        }
        match self.login_form.handle_key(key) {
            FormAction::Submit => self.submit_sign_in(),
            FormAction::Cancel => self.should_quit = true,
            FormAction::None => {}
        }
    }

    fn handle_create_account_key(&mut self, key: KeyEvent) {
        match self.signup_form.handle_key(key) {
            FormAction::Submit => self.submit_create_account(),
            FormAction::Cancel => {
                self.nav.go_back();
            }
            FormAction::None => {}
        }
    }

    fn submit_sign_in(&mut self) {
        let email = self.login_form.value(0).trim().to_string();
        let password = self.login_form.value(1).to_string();
        match self.identity.sign_in(&email, &password) {
            Ok(_) => {
                self.login_form.clear();
                self.show_alert("Success", "Logged in successfully!");
            }
            Err(e) => self.show_alert("Error", e.to_string()),
        }
        self.drain_session_events();
    }

    fn submit_create_account(&mut self) {
        let form = self.signup_form.to_signup();
        match self.identity.sign_up(&form) {
            Ok(_) => {
                self.signup_form.clear();
                self.show_alert("Success", "Account created successfully!");
            }
            Err(e) => self.show_alert("Error", e.to_string()),
        }
        self.drain_session_events();
    }

    fn handle_landing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('k') | KeyCode::Up => {
                self.counter.apply(CounterOp::Increment, &self.store);
            }
            KeyCode::Char('-') | KeyCode::Char('j') | KeyCode::Down => {
                self.counter.apply(CounterOp::Decrement, &self.store);
            }
            KeyCode::Char('0') | KeyCode::Char('r') => {
                self.counter.apply(CounterOp::Reset, &self.store);
            }
            KeyCode::Char('p') => {
                self.refresh_schedule();
                self.nav.navigate(Route::PrayerTimes);
            }
            KeyCode::Char('o') => {
                if let Err(e) = self.identity.sign_out() {
                    self.show_alert("Sign out failed", e.to_string());
                }
                self.drain_session_events();
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_prayer_times_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.refresh_schedule(),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b') => {
                self.nav.go_back();
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let route = self.nav.current();
        match route {
            Route::SignIn => self.draw_auth(
                frame,
                &outer,
                "مَرْحَبًا",
                "Welcome back to the community",
                "Sign in to continue",
                &self.login_form,
            ),
            Route::CreateAccount => self.draw_auth(
                frame,
                &outer,
                "ٱلسَّلَامُ عَلَيْكُمْ",
                "Join our blessed community of believers",
                "Begin your blessed journey with us",
                &self.signup_form,
            ),
            Route::Landing => self.draw_landing(frame, &outer),
            Route::PrayerTimes => self.draw_prayer_times(frame, &outer),
        }
        statusbar::render(frame, outer[2], route);

        if let Some(alert) = &self.alert {
            draw_alert(frame, alert);
        }
    }

    fn draw_auth(
        &self,
        frame: &mut Frame,
        outer: &[Rect],
        title: &str,
        subtitle: &str,
        form_subtitle: &str,
        form: &Form,
    ) {
        header::render(
            frame,
            outer[0],
            title,
            subtitle,
            self.now.date(),
            self.hijri.as_deref(),
        );

        let body = outer[1];
        let width = body.width.min(60);
        let height = body.height.min(3 + form.fields.len() as u16 * 2 + 2);
        let card = Rect {
            x: body.x + (body.width - width) / 2,
            y: body.y + 1.min(body.height),
            width,
            height,
        };
        let title = self.nav.current().title();
        form::render(frame, card, title, form_subtitle, form);
    }

    fn draw_landing(&self, frame: &mut Frame, outer: &[Rect]) {
        let subtitle = match &self.user {
            Some(u) => format!("Signed in as {}", u.display_name()),
            None => "Guest".to_string(),
        };
        header::render(
            frame,
            outer[0],
            "Counter",
            &subtitle,
            self.now.date(),
            self.hijri.as_deref(),
        );

        let body = outer[1];
        let width = body.width.min(50);
        let card = Rect {
            x: body.x + (body.width - width) / 2,
            width,
            ..body
        };
        counter::render(frame, card, &self.counter);
    }

    fn draw_prayer_times(&self, frame: &mut Frame, outer: &[Rect]) {
        let Some(view) = &self.prayer else {
            header::render(
                frame,
                outer[0],
                "🕌 Prayer Times",
                "Loading Prayer Times...",
                self.now.date(),
                self.hijri.as_deref(),
            );
            return;
        };

        let mut subtitle = self.config.location.to_location().label();
        if view.source.is_fallback() {
            subtitle.push_str("  ·  offline schedule");
        }
        header::render(
            frame,
            outer[0],
            "🕌 Prayer Times",
            &subtitle,
            view.date,
            self.hijri.as_deref(),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // current time
                Constraint::Length(7), // prayers
                Constraint::Min(0),    // quote
            ])
            .split(outer[1]);

        next_prayer::render(
            frame,
            chunks[0],
            self.now.time(),
            &view.schedule,
            view.next.as_ref(),
        );

        let current = current_index(view.schedule.entries(), self.now.time()).unwrap_or(0);
        prayers::render(frame, chunks[1], &view.schedule, current);

        let quote = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "\"And establish prayer for My remembrance\"",
                theme::bold().add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled("- Quran 20:14", theme::dim())),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(quote, chunks[2]);
    }
}

fn draw_alert(frame: &mut Frame, alert: &Alert) {
    let area = frame.area();
    let popup_area = Rect {
        x: area.width / 4,
        y: area.height / 3,
        width: area.width / 2,
        height: 7.min(area.height),
    };

    frame.render_widget(Clear, popup_area);

    let border = if alert.title == "Success" {
        theme::green()
    } else {
        theme::red()
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(alert.message.clone(), theme::bold())),
        Line::from(""),
        Line::from(Span::styled("[any key] OK", theme::dim())),
    ];

    let block = Block::default()
        .title(Span::styled(format!(" {} ", alert.title), border))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(theme::surface());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let mut app = App::new(&conn, config)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(Duration::from_secs(1));

    let result = event_loop(&mut terminal, &mut app, || Ok(events.next()?));

    ratatui::restore();
    result
}

/// Draw, wait for the next event, dispatch; until quit or an error.
fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut next_event: impl FnMut() -> Result<Event>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match next_event()? {
            Event::Key(key) => {
                app.handle_key(key);
                if app.should_quit {
                    return Ok(());
                }
            }
            Event::Resize => {}
            Event::Tick => app.tick(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::db::migrations::run_migrations;
    use crate::db::repository::MetaRepo;
    use chrono::NaiveTime;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn offline_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.prayer_times.provider = ProviderKind::Offline;
        config
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn sign_up(app: &mut App) {
        app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert_eq!(app.nav.current(), Route::CreateAccount);
        for value in ["Ali", "Talib", "ali@example.com", "", "zulfiqar", "zulfiqar"] {
            type_str(app, value);
            press(app, KeyCode::Enter);
        }
    }

    fn at(date: (i32, u32, u32), hhmm: &str) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_time(NaiveTime::parse_from_str(hhmm, "%H:%M").unwrap())
    }

    #[test]
    fn event_loop_returns_input_errors() {
        let conn = conn();
        let mut app = App::new(&conn, offline_config()).unwrap();
        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(80, 30)).unwrap();

        let mut events = vec![Err(anyhow::anyhow!("input closed")), Ok(Event::Tick)];
        let result = event_loop(&mut terminal, &mut app, || events.pop().unwrap());

        assert_eq!(result.unwrap_err().to_string(), "input closed");
    }

    #[test]
    fn event_loop_stops_on_quit() {
        let conn = conn();
        let mut app = App::new(&conn, offline_config()).unwrap();
        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(80, 30)).unwrap();

        let mut events = vec![Ok(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))];
        event_loop(&mut terminal, &mut app, || events.pop().unwrap()).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn starts_on_sign_in_without_session() {
        let conn = conn();
        let app = App::new(&conn, offline_config()).unwrap();
        assert_eq!(app.nav.current(), Route::SignIn);
    }

    #[test]
    fn invalid_login_shows_alert_and_stays() {
        let conn = conn();
        let mut app = App::new(&conn, offline_config()).unwrap();
        type_str(&mut app, "nobody");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "123456");
        press(&mut app, KeyCode::Enter);

        let alert = app.alert.clone().unwrap();
        assert_eq!(alert.message, "Please enter a valid email address");
        assert_eq!(app.nav.current(), Route::SignIn);

        press(&mut app, KeyCode::Char('x'));
        assert!(app.alert.is_none());
    }

    #[test]
    fn sign_up_lands_on_counter_and_persists() {
        let conn = conn();
        let mut app = App::new(&conn, offline_config()).unwrap();
        sign_up(&mut app);

        assert_eq!(app.nav.current(), Route::Landing);
        assert_eq!(app.alert.as_ref().unwrap().title, "Success");
        press(&mut app, KeyCode::Enter); // dismiss

        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.counter.value(), 2);

        // A fresh app for the same session reads the mirrored value.
        let again = App::new(&conn, offline_config()).unwrap();
        assert_eq!(again.nav.current(), Route::Landing);
        assert_eq!(again.counter.value(), 2);
    }

    #[test]
    fn sign_out_returns_to_sign_in() {
        let conn = conn();
        let mut app = App::new(&conn, offline_config()).unwrap();
        sign_up(&mut app);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.nav.current(), Route::SignIn);
        assert_eq!(app.counter.value(), 0);
        assert!(app.user.is_none());
    }

    #[test]
    fn sign_out_failure_is_surfaced() {
        let conn = conn();
        let mut app = App::new(&conn, offline_config()).unwrap();
        sign_up(&mut app);
        press(&mut app, KeyCode::Enter);

        MetaRepo::delete(&conn, "session_user").unwrap();
        press(&mut app, KeyCode::Char('o'));
        let alert = app.alert.clone().unwrap();
        assert_eq!(alert.title, "Sign out failed");
        assert_eq!(alert.message, "No user is signed in");
    }

    #[test]
    fn prayer_times_tick_reevaluates_and_back_returns() {
        let conn = conn();
        let mut app = App::new(&conn, offline_config()).unwrap();
        sign_up(&mut app);
        press(&mut app, KeyCode::Enter);

        app.set_now(at((2025, 1, 10), "13:00"));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.nav.current(), Route::PrayerTimes);
        let view = app.prayer.clone().unwrap();
        assert_eq!(view.date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert!(view.next.is_some());

        app.set_now(at((2025, 1, 10), "23:30"));
        let next = app.prayer.as_ref().unwrap().next.unwrap();
        assert_eq!(next.index, 0);
        assert!(next.wraps);

        app.set_now(at((2025, 1, 11), "00:01"));
        let view = app.prayer.as_ref().unwrap();
        assert_eq!(view.date, NaiveDate::from_ymd_opt(2025, 1, 11).unwrap());
        assert!(!view.next.unwrap().wraps);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.nav.current(), Route::Landing);
    }
}
