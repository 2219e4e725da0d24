use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;
use serde::Serialize;
use std::io::{self, BufRead, Write};

use crate::auth::{IdentityProvider, LocalIdentity, SignupForm};
use crate::cli::args::CounterCommands;
use crate::config::AppConfig;
use crate::counter::{Counter, CounterOp, SqliteCounterStore};
use crate::models::{Location, PrayerTime, Schedule};
use crate::prayer_times::{load_schedule, ScheduleSource};
use crate::utils::format::format_countdown;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;255;215;0m";

// ─── Times ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TimesOutput<'a> {
    date: String,
    location: String,
    fallback: bool,
    prayers: &'a [PrayerTime],
    next: &'static str,
    next_in_minutes: i64,
}

fn times_output<'a>(
    schedule: &'a Schedule,
    source: ScheduleSource,
    now: NaiveDateTime,
    location: &Location,
) -> Result<TimesOutput<'a>> {
    let next = schedule.next_prayer(now.time());
    let next_prayer = schedule
        .get(next.index)
        .ok_or_else(|| anyhow!("Schedule has no entry {}", next.index))?;
    Ok(TimesOutput {
        date: now.date().format("%Y-%m-%d").to_string(),
        location: location.label(),
        fallback: source.is_fallback(),
        prayers: schedule.entries(),
        next: next_prayer.name.display_name(),
        next_in_minutes: next.remaining.num_minutes(),
    })
}

pub fn handle_times(config: &AppConfig, json: bool) -> Result<()> {
    let now = Local::now().naive_local();
    let (schedule, source) = load_schedule(config, now.date())?;
    let location = config.location.to_location();

    if json {
        let out = times_output(&schedule, source, now, &location)?;
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let next = schedule.next_prayer(now.time());
    let next_prayer = schedule
        .get(next.index)
        .ok_or_else(|| anyhow!("Schedule has no entry {}", next.index))?;

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({})",
        location.label(),
        now.date().format("%A, %B %-d, %Y")
    );
    if source.is_fallback() {
        println_colored!(DIM, "  (could not reach the prayer-times service; showing default times)");
    }
    println!();

    for (i, p) in schedule.entries().iter().enumerate() {
        let line = format!("  {:<10} {:<8} {}", p.name.display_name(), p.name.arabic(), p.display_time());
        if i == next.index {
            println_colored!(AMBER, "{}  ◀", line);
        } else {
            println_colored!(BOLD, "{}", line);
        }
    }

    println!();
    println_colored!(
        AMBER,
        "  Next: {} in {}{}",
        next_prayer.name.display_name(),
        format_countdown(next.remaining),
        if next.wraps { " (tomorrow)" } else { "" }
    );
    println!();
    Ok(())
}

// ─── Accounts ────────────────────────────────────────────────────────────────

pub fn handle_signup(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: Option<&str>,
) -> Result<()> {
    let password = prompt("  Password: ")?;
    let confirm_password = prompt("  Confirm password: ")?;
    let form = SignupForm {
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        email: email.trim().to_string(),
        phone: phone.unwrap_or_default().trim().to_string(),
        password,
        confirm_password,
    };

    let mut identity = LocalIdentity::new(conn);
    let user = identity.sign_up(&form)?;
    println_colored!(GREEN, "  ✓ Account created successfully! Signed in as {}", user.email);
    Ok(())
}

pub fn handle_login(conn: &Connection, email: &str) -> Result<()> {
    let password = prompt("  Password: ")?;
    let mut identity = LocalIdentity::new(conn);
    let user = identity.sign_in(email.trim(), &password)?;
    println_colored!(GREEN, "  ✓ Logged in successfully as {}", user.display_name());
    Ok(())
}

pub fn handle_logout(conn: &Connection) -> Result<()> {
    let mut identity = LocalIdentity::new(conn);
    identity
        .sign_out()
        .map_err(|e| anyhow!("Sign out failed: {}", e))?;
    println_colored!(GREEN, "  ✓ Signed out");
    Ok(())
}

pub fn handle_whoami(conn: &Connection) -> Result<()> {
    let identity = LocalIdentity::new(conn);
    match identity.current_user()? {
        Some(user) => {
            println!("  {} <{}>", user.display_name(), user.email);
            if let Some(phone) = &user.phone {
                println_colored!(DIM, "  {}", phone);
            }
        }
        None => println_colored!(DIM, "  Not signed in"),
    }
    Ok(())
}

// ─── Counter ─────────────────────────────────────────────────────────────────

pub fn handle_counter(conn: &Connection, action: CounterCommands) -> Result<()> {
    let identity = LocalIdentity::new(conn);
    let Some(user) = identity.current_user()? else {
        bail!("Not signed in. Run `miqat login <email>` first");
    };

    let store = SqliteCounterStore::new(conn);
    let mut counter = Counter::new();
    counter.attach(Some(&user), &store);

    let op = match action {
        CounterCommands::Show => None,
        CounterCommands::Inc => Some(CounterOp::Increment),
        CounterCommands::Dec => Some(CounterOp::Decrement),
        CounterCommands::Reset => Some(CounterOp::Reset),
    };

    if let Some(op) = op {
        if !counter.apply(op, &store) {
            println_colored!(AMBER, "  Could not save; value unchanged");
        }
    }

    println!("  {}  {}({}){}", counter.value(), DIM, counter.status().label(), "\x1b[0m");
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').to_string())
}
