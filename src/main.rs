mod auth;
mod cli;
mod config;
mod counter;
mod db;
mod models;
mod prayer_times;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

fn main() -> Result<()> {
    let cli = Cli::parse();
    AppConfig::ensure_data_dir()?;

    // The TUI owns stderr while it runs, so its logs go to a file.
    if cli.command.is_none() {
        utils::logging::init_file(&AppConfig::log_path()?)?;
    } else {
        env_logger::init();
    }

    let config = load_or_init_config()?;

    // Open DB
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Times { json }) => handlers::handle_times(&config, json)?,
        Some(Commands::Signup {
            first_name,
            last_name,
            email,
            phone,
        }) => handlers::handle_signup(&conn, &first_name, &last_name, &email, phone.as_deref())?,
        Some(Commands::Login { email }) => handlers::handle_login(&conn, &email)?,
        Some(Commands::Logout) => handlers::handle_logout(&conn)?,
        Some(Commands::Whoami) => handlers::handle_whoami(&conn)?,
        Some(Commands::Counter { action }) => handlers::handle_counter(&conn, action)?,

        // No subcommand → launch TUI
        None => tui::app::run(conn, config)?,
    }

    Ok(())
}

/// Load config.toml, writing the defaults on first start.
fn load_or_init_config() -> Result<AppConfig> {
    let path = AppConfig::config_path()?;
    let config = AppConfig::load_from(&path).context("Loading config")?;
    if !path.exists() {
        if let Err(e) = config.save_to(&path) {
            log::warn!("Could not write default config to {:?}: {:#}", path, e);
        }
    }
    Ok(config)
}
