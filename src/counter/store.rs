use anyhow::Result;
use rusqlite::Connection;

use crate::db::repository::UserDocRepo;

/// Remote mirror of a user's counter value.
pub trait CounterStore {
    fn get(&self, user_id: &str) -> Result<i64>;
    fn set(&self, user_id: &str, value: i64) -> Result<()>;
}

pub struct SqliteCounterStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCounterStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl CounterStore for SqliteCounterStore<'_> {
    fn get(&self, user_id: &str) -> Result<i64> {
        Ok(UserDocRepo::get(self.conn, user_id)?
            .map(|doc| doc.counter)
            .unwrap_or(0))
    }

    fn set(&self, user_id: &str, value: i64) -> Result<()> {
        UserDocRepo::merge_counter(self.conn, user_id, value)
    }
}
