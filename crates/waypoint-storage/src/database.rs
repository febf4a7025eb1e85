//! Database connection and key/value operations

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::Result;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;

        // WAL mode so readers in other processes don't block on writes
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        tracing::debug!(path = %path.as_ref().display(), "Opened settings database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| get_setting_in(conn, key))
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.with_connection(|conn| set_setting_in(conn, key, value))
    }

    /// Remove a key. Returns whether a value was stored under it.
    pub fn delete_setting(&self, key: &str) -> Result<bool> {
        self.with_connection(|conn| delete_setting_in(conn, key))
    }

    pub fn has_setting(&self, key: &str) -> Result<bool> {
        self.with_connection(|conn| {
            let found: Option<i32> = conn
                .query_row("SELECT 1 FROM settings WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(found.is_some())
        })
    }
}

/// Key/value helpers usable inside [`Database::transaction`].
pub fn get_setting_in(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

pub fn set_setting_in(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![key, value, updated_at],
    )?;
    Ok(())
}

pub fn delete_setting_in(conn: &Connection, key: &str) -> Result<bool> {
    let removed = conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
    Ok(removed > 0)
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            let count: i32 =
                conn.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_settings() {
        let db = Database::open_in_memory().unwrap();

        assert_eq!(db.get_setting("access_token").unwrap(), None);
        assert!(!db.has_setting("access_token").unwrap());

        db.set_setting("access_token", "abc").unwrap();
        db.set_setting("access_token", "def").unwrap();
        assert_eq!(db.get_setting("access_token").unwrap().as_deref(), Some("def"));
        assert!(db.has_setting("access_token").unwrap());

        assert!(db.delete_setting("access_token").unwrap());
        assert!(!db.delete_setting("access_token").unwrap());
        assert_eq!(db.get_setting("access_token").unwrap(), None);
    }

    #[test]
    fn test_transaction_writes_together() {
        let db = Database::open_in_memory().unwrap();

        db.transaction(|conn| {
            set_setting_in(conn, "a", "1")?;
            set_setting_in(conn, "b", "2")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(db.get_setting("a").unwrap().as_deref(), Some("1"));
        assert_eq!(db.get_setting("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_clones_share_connection() {
        let db = Database::open_in_memory().unwrap();
        let other = db.clone();

        db.set_setting("theme", "dark").unwrap();
        assert_eq!(other.get_setting("theme").unwrap().as_deref(), Some("dark"));
    }
}
