use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{User, UserDoc};

// ─── Users ───────────────────────────────────────────────────────────────────

/// A user row together with its stored credentials.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_salt: String,
    pub password_hash: String,
}

fn stored_user_from_row(row: &Row<'_>) -> rusqlite::Result<StoredUser> {
    Ok(StoredUser {
        user: User {
            id: row.get(0)?,
            email: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            phone: row.get(4)?,
        },
        password_salt: row.get(5)?,
        password_hash: row.get(6)?,
    })
}

pub struct UserRepo;

impl UserRepo {
    pub fn insert(conn: &Connection, stored: &StoredUser) -> Result<()> {
        let u = &stored.user;
        conn.execute(
            "INSERT INTO users (id, email, password_salt, password_hash, first_name, last_name, phone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                u.id,
                u.email,
                stored.password_salt,
                stored.password_hash,
                u.first_name,
                u.last_name,
                u.phone,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<StoredUser>> {
        conn.query_row(
            "SELECT id, email, first_name, last_name, phone, password_salt, password_hash
             FROM users WHERE email = ?1",
            params![email],
            stored_user_from_row,
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
        conn.query_row(
            "SELECT id, email, first_name, last_name, phone, password_salt, password_hash
             FROM users WHERE id = ?1",
            params![id],
            stored_user_from_row,
        )
        .optional()
        .map(|row| row.map(|s| s.user))
        .map_err(anyhow::Error::from)
    }
}

// ─── Per-user documents ──────────────────────────────────────────────────────

pub struct UserDocRepo;

impl UserDocRepo {
    pub fn get(conn: &Connection, user_id: &str) -> Result<Option<UserDoc>> {
        conn.query_row(
            "SELECT user_id, counter, updated_at FROM user_docs WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(UserDoc {
                    user_id: row.get(0)?,
                    counter: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    /// Merge-upsert: only `counter` and `updated_at` are touched.
    pub fn merge_counter(conn: &Connection, user_id: &str, counter: i64) -> Result<()> {
        conn.execute(
            "INSERT INTO user_docs (user_id, counter, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(user_id) DO UPDATE SET counter = ?2, updated_at = datetime('now')",
            params![user_id, counter],
        )?;
        Ok(())
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, key: &str) -> Result<()> {
        conn.execute("DELETE FROM app_meta WHERE key = ?1", params![key])?;
        Ok(())
    }
}
